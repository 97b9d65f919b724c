//! Constraint resolver (§4.6.2, "Forster"): merges nodes that must move
//! together during in-layer sorting into super-nodes before the barycenter
//! sort runs, then expands them back out afterwards.
//!
//! A node's `in_layer_layout_unit` (§3) names the node it's tied to; nodes
//! sharing a unit form one super-node whose barycenter is the unweighted
//! mean of its members' barycenters and whose in-layer-constraint sort key
//! is the strictest (lowest) key among them, so a single `TOP` member pins
//! the whole unit to the top of the layer.

use rustc_hash::FxHashMap;
use talus_graph::{Graph, NodeId};

use super::barycenter;

struct SuperNode {
    members: Vec<NodeId>,
    sort_key: u8,
    barycenter: f64,
    first_index: usize,
}

/// Sorts `free` by merging same-unit nodes into super-nodes, sorting those,
/// then expanding each super-node back into its members (in their original
/// relative order within `free`).
pub fn sort_layer(g: &mut Graph, free: &mut Vec<NodeId>, fixed_index: &FxHashMap<NodeId, usize>) {
    let mut bary = barycenter::compute(g, free, fixed_index);
    barycenter::interpolate(&mut bary);

    let mut groups: FxHashMap<NodeId, Vec<usize>> = FxHashMap::default();
    for (i, &n) in free.iter().enumerate() {
        let unit = g.node(n).in_layer_layout_unit;
        groups.entry(unit).or_default().push(i);
    }

    let mut supers: Vec<SuperNode> = Vec::with_capacity(groups.len());
    for (_, member_indices) in groups {
        let members: Vec<NodeId> = member_indices.iter().map(|&i| free[i]).collect();
        let sort_key = members
            .iter()
            .map(|&n| g.node(n).in_layer_constraint.sort_key())
            .min()
            .unwrap_or(1);
        let barycenter_sum: f64 = member_indices.iter().map(|&i| bary[i]).sum();
        let barycenter = barycenter_sum / member_indices.len() as f64;
        let first_index = *member_indices.iter().min().unwrap();
        supers.push(SuperNode { members, sort_key, barycenter, first_index });
    }

    supers.sort_by(|a, b| {
        a.sort_key
            .cmp(&b.sort_key)
            .then(a.barycenter.partial_cmp(&b.barycenter).unwrap_or(std::cmp::Ordering::Equal))
            .then(a.first_index.cmp(&b.first_index))
    });

    let mut out = Vec::with_capacity(free.len());
    for s in supers {
        out.extend(s.members);
    }
    *free = out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, NodeType, PortDirection, PortSide};

    #[test]
    fn paired_unit_moves_together() {
        let mut g = Graph::new(LayoutConfig::default());
        let top_a = g.add_node(NodeType::Normal);
        let top_b = g.add_node(NodeType::Normal);
        let bot_a = g.add_node(NodeType::Normal);
        let bot_b = g.add_node(NodeType::Normal);
        // bot_a and bot_b are tied together; only bot_b has a cross-layer
        // edge, pulling the whole unit toward top_a's position.
        g.node_mut(bot_b).in_layer_layout_unit = bot_a;

        let pa = g.add_port(top_a, PortSide::South, PortDirection::Output);
        let _pb = g.add_port(top_b, PortSide::South, PortDirection::Output);
        let qb = g.add_port(bot_b, PortSide::North, PortDirection::Input);
        g.add_edge(pa, qb).unwrap();

        let fixed_index: FxHashMap<NodeId, usize> =
            [(top_a, 0usize), (top_b, 1usize)].into_iter().collect();
        let mut free = vec![bot_b, bot_a];
        sort_layer(&mut g, &mut free, &fixed_index);

        assert_eq!(free, vec![bot_b, bot_a]);
    }
}
