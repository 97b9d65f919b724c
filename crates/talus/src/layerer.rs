//! C4: layerer (MinWidth).
//!
//! Assigns each node an integer layer via a bottom-up greedy construction
//! that balances drawing height (fewer, wider layers) against width (more,
//! narrower layers), trying every `(upperBoundOnWidth, compensator)` pair in
//! the configured ranges and keeping the cheapest result.
//!
//! "Successor" here means the *effective* post-cycle-breaking direction:
//! since [`talus_graph::Graph::reverse_edge`] physically swaps an edge's
//! endpoints rather than just flipping a direction bit, `target_node()` /
//! `source_node()` already report the effective direction C3 established,
//! so no separate "reversed" bookkeeping is needed here (see DESIGN.md for
//! why this differs from the reference's port-direction-based formulation
//! of the same rule).

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use talus_graph::{Graph, NodeId, NodeType};

struct Adjacency {
    successors: FxHashMap<NodeId, Vec<NodeId>>,
    predecessors: FxHashMap<NodeId, Vec<NodeId>>,
}

fn build_adjacency(g: &Graph) -> Adjacency {
    let mut successors: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    let mut predecessors: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    for node in g.node_ids() {
        successors.entry(node).or_default();
        predecessors.entry(node).or_default();
    }
    for e in g.edges() {
        let (src, dst) = (e.source_node(), e.target_node());
        if src == dst {
            continue;
        }
        successors.entry(src).or_default().push(dst);
        predecessors.entry(dst).or_default().push(src);
    }
    Adjacency { successors, predecessors }
}

struct LayeringResult {
    layers_bottom_up: Vec<Vec<NodeId>>,
    max_width: f64,
}

#[allow(clippy::too_many_arguments)]
fn build_layering(
    nodes_by_outdeg_desc: &[NodeId],
    adj: &Adjacency,
    norm_height: &FxHashMap<NodeId, f64>,
    dummy_size: f64,
    avg_size: f64,
    ubw: u32,
    compensator: u32,
) -> LayeringResult {
    let mut not_inserted: Vec<NodeId> = nodes_by_outdeg_desc.to_vec();
    let mut already_placed_below: FxHashSet<NodeId> = FxHashSet::default();
    let mut layers_bottom_up: Vec<Vec<NodeId>> = Vec::new();

    let mut current_layer: Vec<NodeId> = Vec::new();
    let mut width_current = 0.0f64;
    let mut width_up_scaled = 0.0f64;
    let mut real_width = 0.0f64;
    let mut indeg_sum_layer = 0.0f64;
    let mut outdeg_sum_layer = 0.0f64;
    let mut spanning_edges_count = 0.0f64;
    let mut max_width = 0.0f64;

    let out_degree = |v: NodeId| adj.successors.get(&v).map_or(0, |s| s.len());
    let in_degree = |v: NodeId| adj.predecessors.get(&v).map_or(0, |p| p.len());

    let mut finalize_layer =
        |current_layer: &mut Vec<NodeId>,
         width_current: &mut f64,
         width_up_scaled: &mut f64,
         real_width: &mut f64,
         indeg_sum_layer: &mut f64,
         outdeg_sum_layer: &mut f64,
         spanning_edges_count: &mut f64,
         max_width: &mut f64,
         layers_bottom_up: &mut Vec<Vec<NodeId>>,
         already_placed_below: &mut FxHashSet<NodeId>| {
            *max_width = max_width.max(*spanning_edges_count * dummy_size + *real_width);
            *spanning_edges_count += *indeg_sum_layer - *outdeg_sum_layer;
            already_placed_below.extend(current_layer.iter().copied());
            layers_bottom_up.push(std::mem::take(current_layer));
            *width_current = 0.0;
            *width_up_scaled = 0.0;
            *real_width = 0.0;
            *indeg_sum_layer = 0.0;
            *outdeg_sum_layer = 0.0;
        };

    loop {
        if not_inserted.is_empty() {
            if !current_layer.is_empty() {
                finalize_layer(
                    &mut current_layer,
                    &mut width_current,
                    &mut width_up_scaled,
                    &mut real_width,
                    &mut indeg_sum_layer,
                    &mut outdeg_sum_layer,
                    &mut spanning_edges_count,
                    &mut max_width,
                    &mut layers_bottom_up,
                    &mut already_placed_below,
                );
            }
            break;
        }

        let pos = not_inserted.iter().position(|&v| {
            adj.successors
                .get(&v)
                .is_none_or(|succ| succ.iter().all(|s| already_placed_below.contains(s)))
        });

        let Some(pos) = pos else {
            if current_layer.is_empty() {
                // Defensive: shouldn't happen on an acyclic graph.
                break;
            }
            finalize_layer(
                &mut current_layer,
                &mut width_current,
                &mut width_up_scaled,
                &mut real_width,
                &mut indeg_sum_layer,
                &mut outdeg_sum_layer,
                &mut spanning_edges_count,
                &mut max_width,
                &mut layers_bottom_up,
                &mut already_placed_below,
            );
            continue;
        };

        let v = not_inserted.remove(pos);
        let nh = norm_height.get(&v).copied().unwrap_or(1.0);
        let od = out_degree(v) as f64;
        let id = in_degree(v) as f64;

        if !current_layer.is_empty() {
            let cond_c = width_current >= ubw as f64 * avg_size && nh > od * dummy_size;
            let cond_d = width_up_scaled >= compensator as f64 * ubw as f64 * avg_size;
            if cond_c || cond_d {
                finalize_layer(
                    &mut current_layer,
                    &mut width_current,
                    &mut width_up_scaled,
                    &mut real_width,
                    &mut indeg_sum_layer,
                    &mut outdeg_sum_layer,
                    &mut spanning_edges_count,
                    &mut max_width,
                    &mut layers_bottom_up,
                    &mut already_placed_below,
                );
            }
        }

        width_current += nh - od * dummy_size;
        width_up_scaled += id * dummy_size;
        real_width += nh;
        indeg_sum_layer += id;
        outdeg_sum_layer += od;
        current_layer.push(v);
    }

    LayeringResult { layers_bottom_up, max_width }
}

pub fn run(g: &mut Graph) {
    let nodes: Vec<NodeId> = g.node_ids().collect();
    if nodes.is_empty() {
        return;
    }

    let adj = build_adjacency(g);

    let min_height = nodes
        .iter()
        .map(|&n| g.node(n).size.height)
        .filter(|&h| h > 0.0)
        .fold(f64::INFINITY, f64::min);
    let min_height = if min_height.is_finite() { min_height } else { 1.0 };

    let mut norm_height: FxHashMap<NodeId, f64> = FxHashMap::default();
    for &n in &nodes {
        let ratio = g.node(n).size.height / min_height;
        let nh = if ratio == 0.0 { 1.0 } else { ratio };
        g.node_mut(n).norm_height = nh;
        norm_height.insert(n, nh);
    }
    let avg_size = norm_height.values().sum::<f64>() / nodes.len() as f64;
    let dummy_size = g.config.spacings.intra(NodeType::LongEdge).vertical / min_height;

    let mut nodes_by_outdeg_desc = nodes.clone();
    nodes_by_outdeg_desc.sort_by(|&a, &b| {
        let da = adj.successors.get(&a).map_or(0, |s| s.len());
        let db = adj.successors.get(&b).map_or(0, |s| s.len());
        db.cmp(&da)
    });

    let mut best: Option<LayeringResult> = None;
    for ubw in g.config.upper_bound_on_width_range() {
        for compensator in g.config.compensator_range() {
            let candidate = build_layering(
                &nodes_by_outdeg_desc,
                &adj,
                &norm_height,
                dummy_size,
                avg_size,
                ubw,
                compensator,
            );
            let better = match &best {
                None => true,
                Some(b) => {
                    (candidate.max_width, candidate.layers_bottom_up.len())
                        < (b.max_width, b.layers_bottom_up.len())
                }
            };
            if better {
                best = Some(candidate);
            }
        }
    }

    let best = best.expect("at least one (ubw, compensator) pair is always configured");
    for layer_nodes in best.layers_bottom_up.into_iter().rev() {
        let layer_id = g.push_layer();
        for node in layer_nodes {
            g.push_node_to_layer(node, layer_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, PortDirection, PortSide};

    fn edge(g: &mut Graph, a: NodeId, b: NodeId) {
        let pa = g.add_port(a, PortSide::East, PortDirection::Output);
        let pb = g.add_port(b, PortSide::West, PortDirection::Input);
        g.add_edge(pa, pb).unwrap();
    }

    #[test]
    fn chain_gets_monotonically_increasing_layers() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let c = g.add_node(NodeType::Normal);
        edge(&mut g, a, b);
        edge(&mut g, b, c);

        run(&mut g);

        let la = g.layer_index_of(a).unwrap();
        let lb = g.layer_index_of(b).unwrap();
        let lc = g.layer_index_of(c).unwrap();
        assert!(la < lb);
        assert!(lb < lc);
    }

    #[test]
    fn every_node_lands_in_exactly_one_layer() {
        let mut g = Graph::new(LayoutConfig::default());
        let nodes: Vec<_> = (0..6).map(|_| g.add_node(NodeType::Normal)).collect();
        edge(&mut g, nodes[0], nodes[1]);
        edge(&mut g, nodes[0], nodes[2]);
        edge(&mut g, nodes[1], nodes[3]);
        edge(&mut g, nodes[2], nodes[3]);
        edge(&mut g, nodes[3], nodes[4]);
        edge(&mut g, nodes[4], nodes[5]);

        run(&mut g);

        for &n in &nodes {
            assert!(g.layer_index_of(n).is_some());
        }
        let total: usize = g.layers().iter().map(|l| l.len()).sum();
        assert_eq!(total, nodes.len());
    }
}
