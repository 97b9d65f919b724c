//! Barycenter heuristic (§4.6.1) plus the TOP/BOTTOM in-layer-constraint
//! collapse §4.6.2 describes as a simplified "Forster" merge.

use rustc_hash::FxHashMap;
use talus_graph::{Graph, InLayerConstraint, NodeId};

/// Mean index, in the fixed layer's order, of each free-layer node's
/// cross-layer neighbours. `None` when a node has no such neighbour.
pub fn compute(g: &Graph, free: &[NodeId], fixed_index: &FxHashMap<NodeId, usize>) -> Vec<Option<f64>> {
    free.iter()
        .map(|&v| {
            let mut positions = Vec::new();
            for e in g.node(v).iter_ports().flat_map(|p| {
                g.port(p).incoming().iter().chain(g.port(p).outgoing()).copied()
            }) {
                let edge = g.edge(e);
                let other = if edge.source_node() == v { edge.target_node() } else { edge.source_node() };
                if let Some(&idx) = fixed_index.get(&other) {
                    positions.push(idx as f64);
                }
            }
            if positions.is_empty() {
                None
            } else {
                Some(positions.iter().sum::<f64>() / positions.len() as f64)
            }
        })
        .collect()
}

/// Fills in `None` entries by linear interpolation between the nearest
/// known neighbours on either side; nodes with no known value anywhere in
/// the layer fall back to their current position (keeps them in place).
pub fn interpolate(values: &mut [Option<f64>]) {
    let n = values.len();
    let known: Vec<usize> = (0..n).filter(|&i| values[i].is_some()).collect();
    if known.is_empty() {
        for (i, v) in values.iter_mut().enumerate() {
            *v = Some(i as f64);
        }
        return;
    }
    for i in 0..n {
        if values[i].is_some() {
            continue;
        }
        let before = known.iter().rev().find(|&&k| k < i).copied();
        let after = known.iter().find(|&&k| k > i).copied();
        values[i] = Some(match (before, after) {
            (Some(b), Some(a)) => {
                let vb = values[b].unwrap();
                let va = values[a].unwrap();
                vb + (va - vb) * ((i - b) as f64 / (a - b) as f64)
            }
            (Some(b), None) => values[b].unwrap(),
            (None, Some(a)) => values[a].unwrap(),
            (None, None) => unreachable!("known is non-empty"),
        });
    }
}

/// Re-sorts `free` in place by `(inLayerConstraint sort key, barycenter +
/// jitter, original index)`. The jitter is drawn from the graph's seeded RNG
/// so repeated calls with the same seed reproduce the same order (P9); it is
/// the only source of non-determinism across distinct seeds (§4.6.1).
pub fn sort_layer(g: &mut Graph, free: &mut Vec<NodeId>, fixed_index: &FxHashMap<NodeId, usize>) {
    let mut bary = compute(g, free, fixed_index);
    interpolate(&mut bary);

    let mut keyed: Vec<(u8, f64, usize, NodeId)> = free
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let jitter = g.rng.next_f64() * 1e-6;
            let key = g.node(n).in_layer_constraint.sort_key();
            (key, bary[i] + jitter, i, n)
        })
        .collect();

    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .then(a.2.cmp(&b.2))
    });

    *free = keyed.into_iter().map(|(_, _, _, n)| n).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, NodeType, PortDirection, PortSide};

    #[test]
    fn crossed_pair_uncrosses_toward_matching_barycenter() {
        let mut g = Graph::new(LayoutConfig::default());
        let top_a = g.add_node(NodeType::Normal);
        let top_b = g.add_node(NodeType::Normal);
        let bot_a = g.add_node(NodeType::Normal);
        let bot_b = g.add_node(NodeType::Normal);

        // top order: [a, b]; edges a->bot_b, b->bot_a (crossed).
        let pa = g.add_port(top_a, PortSide::South, PortDirection::Output);
        let pb = g.add_port(top_b, PortSide::South, PortDirection::Output);
        let qa = g.add_port(bot_a, PortSide::North, PortDirection::Input);
        let qb = g.add_port(bot_b, PortSide::North, PortDirection::Input);
        g.add_edge(pa, qb).unwrap();
        g.add_edge(pb, qa).unwrap();

        let fixed_index: FxHashMap<NodeId, usize> =
            [(top_a, 0usize), (top_b, 1usize)].into_iter().collect();
        let mut free = vec![bot_a, bot_b];
        sort_layer(&mut g, &mut free, &fixed_index);

        // bot_b connects to top_a (index 0) so it should sort first.
        assert_eq!(free, vec![bot_b, bot_a]);
    }
}
