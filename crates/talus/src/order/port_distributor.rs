//! Port distributor (§4.6.3): once a layer's node order is fixed, sorts the
//! ports on the side facing the just-processed neighbour layer by the mean
//! index of the ports they connect to over there.

use rustc_hash::FxHashMap;
use talus_graph::{Graph, NodeId, PortId, PortSide};

fn neighbor_port_positions(g: &Graph, neighbor_order: &[NodeId]) -> FxHashMap<PortId, usize> {
    let mut map = FxHashMap::default();
    let mut pos = 0usize;
    for &n in neighbor_order {
        for p in g.node(n).iter_ports() {
            map.insert(p, pos);
            pos += 1;
        }
    }
    map
}

/// Redistributes `side`-facing ports of every node in `layer_order`,
/// skipping nodes whose port order is pinned
/// (`PortConstraints::is_order_fixed`).
pub fn redistribute(g: &mut Graph, layer_order: &[NodeId], neighbor_order: &[NodeId], side: PortSide) {
    let neighbor_pos = neighbor_port_positions(g, neighbor_order);

    for &n in layer_order {
        if g.node(n).port_constraints.is_order_fixed() {
            continue;
        }
        let ports = g.node(n).ports_on(side).to_vec();
        if ports.len() <= 1 {
            continue;
        }

        let fallback = neighbor_pos.len() as f64;
        let mut keyed: Vec<(f64, usize, PortId)> = ports
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let connected: Vec<usize> = g
                    .port(p)
                    .incoming()
                    .iter()
                    .chain(g.port(p).outgoing())
                    .filter_map(|&e| {
                        let edge = g.edge(e);
                        let other = if edge.source() == p { edge.target() } else { edge.source() };
                        neighbor_pos.get(&other).copied()
                    })
                    .collect();
                let key = if connected.is_empty() {
                    fallback
                } else {
                    connected.iter().sum::<usize>() as f64 / connected.len() as f64
                };
                (key, i, p)
            })
            .collect();

        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then(a.1.cmp(&b.1)));
        let new_order: Vec<PortId> = keyed.into_iter().map(|(_, _, p)| p).collect();
        g.reorder_ports_on_side(n, side, new_order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, NodeType, PortConstraints, PortDirection};

    #[test]
    fn ports_reorder_to_match_neighbor_positions() {
        let mut g = Graph::new(LayoutConfig::default());
        let n = g.add_node(NodeType::Normal);
        let far = g.add_node(NodeType::Normal);
        let near = g.add_node(NodeType::Normal);

        let p_far = g.add_port(n, PortSide::East, PortDirection::Output);
        let p_near = g.add_port(n, PortSide::East, PortDirection::Output);
        let q_far = g.add_port(far, PortSide::West, PortDirection::Input);
        let q_near = g.add_port(near, PortSide::West, PortDirection::Input);
        g.add_edge(p_far, q_far).unwrap();
        g.add_edge(p_near, q_near).unwrap();

        // Neighbor order puts `near` before `far`; ports should follow suit.
        redistribute(&mut g, &[n], &[near, far], PortSide::East);

        assert_eq!(g.node(n).ports_on(PortSide::East), &[p_near, p_far]);
    }

    #[test]
    fn fixed_order_ports_are_left_alone() {
        let mut g = Graph::new(LayoutConfig::default());
        let n = g.add_node(NodeType::Normal);
        g.node_mut(n).port_constraints = PortConstraints::FixedOrder;
        let far = g.add_node(NodeType::Normal);
        let near = g.add_node(NodeType::Normal);

        let p_far = g.add_port(n, PortSide::East, PortDirection::Output);
        let p_near = g.add_port(n, PortSide::East, PortDirection::Output);
        let q_far = g.add_port(far, PortSide::West, PortDirection::Input);
        let q_near = g.add_port(near, PortSide::West, PortDirection::Input);
        g.add_edge(p_far, q_far).unwrap();
        g.add_edge(p_near, q_near).unwrap();

        redistribute(&mut g, &[n], &[near, far], PortSide::East);

        assert_eq!(g.node(n).ports_on(PortSide::East), &[p_far, p_near]);
    }
}
