//! C5 long-edge splitter and C10 long-edge joiner / reversed-edge restorer.
//!
//! Both halves operate on the same LONG_EDGE dummy mechanism (insertion here,
//! removal there), so they share a module the way the reference's
//! `normalize`/`parentDummyChains` pairing does.

use talus_graph::{
    EdgeId, Graph, LabelPlacement, LayerId, NodeId, NodeType, PortDirection, PortSide,
};

/// For every edge whose endpoints lie more than one layer apart, repeatedly
/// inserts a LONG_EDGE dummy in the next layer until the whole chain is
/// layer-adjacent hop by hop.
pub fn split_long_edges(g: &mut Graph) {
    let edges: Vec<EdgeId> = g.edge_ids().collect();
    for e in edges {
        if g.is_edge_alive(e) {
            split_one(g, e);
        }
    }
}

fn origin_of(g: &Graph, node: NodeId, end: Endpoint) -> NodeId {
    if g.node(node).node_type == NodeType::LongEdge {
        match end {
            Endpoint::Source => g.node(node).long_edge_source.unwrap_or(node),
            Endpoint::Target => g.node(node).long_edge_target.unwrap_or(node),
        }
    } else {
        node
    }
}

#[derive(Clone, Copy)]
enum Endpoint {
    Source,
    Target,
}

fn split_one(g: &mut Graph, mut e: EdgeId) {
    loop {
        let edge = g.edge(e);
        let src_node = edge.source_node();
        let tgt_node = edge.target_node();
        if src_node == tgt_node {
            return;
        }
        let (Some(sl), Some(tl)) = (g.layer_index_of(src_node), g.layer_index_of(tgt_node)) else {
            return;
        };
        if tl <= sl + 1 {
            return;
        }

        let thickness = edge.thickness();
        let old_target_port = edge.target();
        let long_edge_source = Some(origin_of(g, src_node, Endpoint::Source));
        let long_edge_target = Some(origin_of(g, tgt_node, Endpoint::Target));
        let has_label_dummies = (g.node(src_node).node_type == NodeType::LongEdge
            && g.node(src_node).has_label_dummies)
            || (g.node(tgt_node).node_type == NodeType::LongEdge
                && g.node(tgt_node).has_label_dummies);

        let dummy = g.add_node(NodeType::LongEdge);
        {
            let n = g.node_mut(dummy);
            n.size.height = thickness;
            n.long_edge_source = long_edge_source;
            n.long_edge_target = long_edge_target;
            n.has_label_dummies = has_label_dummies;
        }
        let west = g.add_port(dummy, PortSide::West, PortDirection::Input);
        let east = g.add_port(dummy, PortSide::East, PortDirection::Output);
        g.port_mut(west).position.y = thickness / 2.0;
        g.port_mut(east).position.y = thickness / 2.0;

        g.push_node_to_layer(dummy, LayerId(sl as u32 + 1));

        // Retarget the current edge to the dummy's WEST port.
        g.set_target_at_index(e, west, 0);

        // New trailing edge from the dummy's EAST port to the original
        // target, inheriting thickness and any head label.
        let new_e = g.add_edge(east, old_target_port).expect("freshly created ports can't self-loop unexpectedly");
        g.set_edge_thickness(new_e, thickness)
            .expect("thickness copied from an already-validated edge");
        g.edge_mut(new_e).priority = g.edge(e).priority;

        let mut migrated = Vec::new();
        g.edge_mut(e).labels.retain(|l| {
            if l.placement == LabelPlacement::Head {
                migrated.push(l.clone());
                false
            } else {
                true
            }
        });
        g.edge_mut(new_e).labels.extend(migrated);

        e = new_e;
    }
}

/// Splices every LONG_EDGE dummy chain back into a single edge and un-reverses
/// every edge C2/C3 flipped, restoring user-visible source-to-target
/// direction and bend-point order.
pub fn join_long_edges_and_restore(g: &mut Graph) {
    let dummies: Vec<NodeId> =
        g.node_ids().filter(|&n| g.node(n).node_type == NodeType::LongEdge).collect();

    for dummy in dummies {
        let west_ports = g.node(dummy).ports_on(PortSide::West).to_vec();
        let east_ports = g.node(dummy).ports_on(PortSide::East).to_vec();
        let Some(&west) = west_ports.first() else { continue };
        let Some(&east) = east_ports.first() else { continue };
        let Some(&e_in) = g.port(west).incoming().first() else { continue };
        let Some(&e_out) = g.port(east).outgoing().first() else { continue };

        let new_target = g.edge(e_out).target();
        let idx = g
            .port(new_target)
            .incoming()
            .iter()
            .position(|&x| x == e_out)
            .expect("e_out is recorded as incoming on its own target port");

        g.set_target_at_index(e_in, new_target, idx);

        if g.config.unnecessary_bendpoints {
            g.edge_mut(e_in).bend_points.push(g.node(dummy).position);
        }
        let (mut bends, mut labels, mut junctions) = {
            let out = g.edge(e_out);
            (out.bend_points.clone(), out.labels.clone(), out.junction_points.clone())
        };
        g.edge_mut(e_in).bend_points.append(&mut bends);
        g.edge_mut(e_in).labels.append(&mut labels);
        g.edge_mut(e_in).junction_points.append(&mut junctions);

        g.remove_edge(e_out);
        g.remove_node(dummy);
    }

    let reversed: Vec<EdgeId> = g.edges().filter(|e| e.reversed).map(|e| e.id()).collect();
    for e in reversed {
        g.reverse_edge(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::LayoutConfig;

    fn make_chain(g: &mut Graph, span: usize) -> (NodeId, NodeId, EdgeId) {
        let layers: Vec<_> = (0..span).map(|_| g.push_layer()).collect();
        let src = g.add_node(NodeType::Normal);
        let tgt = g.add_node(NodeType::Normal);
        g.push_node_to_layer(src, layers[0]);
        g.push_node_to_layer(tgt, layers[span - 1]);
        let ps = g.add_port(src, PortSide::East, PortDirection::Output);
        let pt = g.add_port(tgt, PortSide::West, PortDirection::Input);
        let e = g.add_edge(ps, pt).unwrap();
        (src, tgt, e)
    }

    #[test]
    fn long_edge_gets_one_dummy_per_intermediate_layer() {
        let mut g = Graph::new(LayoutConfig::default());
        let (_, _, _) = make_chain(&mut g, 4);

        split_long_edges(&mut g);

        let dummies =
            g.node_ids().filter(|&n| g.node(n).node_type == NodeType::LongEdge).count();
        assert_eq!(dummies, 2);
    }

    #[test]
    fn split_then_join_restores_a_single_direct_edge() {
        let mut g = Graph::new(LayoutConfig::default());
        let (src, tgt, _) = make_chain(&mut g, 4);

        split_long_edges(&mut g);
        join_long_edges_and_restore(&mut g);

        let remaining: Vec<_> = g.edges().collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].source_node(), src);
        assert_eq!(remaining[0].target_node(), tgt);
        let dummies =
            g.node_ids().filter(|&n| g.node(n).node_type == NodeType::LongEdge).count();
        assert_eq!(dummies, 0);
    }

    #[test]
    fn adjacent_layers_are_left_unsplit() {
        let mut g = Graph::new(LayoutConfig::default());
        let (_, _, e) = make_chain(&mut g, 2);

        split_long_edges(&mut g);

        assert!(g.is_edge_alive(e));
        let dummies =
            g.node_ids().filter(|&n| g.node(n).node_type == NodeType::LongEdge).count();
        assert_eq!(dummies, 0);
    }
}
