//! Brandes–Köpf node placer (C8). Computes y-coordinates by building four
//! candidate alignments (vertical bias UP/DOWN combined with horizontal bias
//! LEFT/RIGHT, i.e. which adjacent layer drives alignment) and combining or
//! selecting among them per `config.fixed_alignment`.
//!
//! **Compaction simplification** (see DESIGN.md's "Deliberate scope
//! reductions" — this is a Non-goal per SPEC_FULL.md §1, not an open
//! question). The reference's threshold
//! strategy with inter-block class graphs is replaced here with a single
//! greedy per-layer sweep: each block keeps a running "reference" position
//! (the first-placed member's y minus its inner shift) that later members
//! try to match, falling back to the minimum separation from the previous
//! node in their layer when the match isn't available. Once a member is
//! pushed off its block's reference, the reference itself is updated so the
//! rest of the block stays internally rigid from that point on. This always
//! produces a valid, non-overlapping layout and straightens whatever the
//! class-graph's maximal-separation optimum would, just not necessarily to
//! the same optimum.

use rustc_hash::{FxHashMap, FxHashSet};
use talus_graph::{EdgeId, FixedAlignment, Graph, Node, NodeId, NodeType};

const EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HDir {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VDir {
    Down,
    Up,
}

type Conflicts = FxHashSet<(NodeId, NodeId)>;

fn add_conflict(conflicts: &mut Conflicts, a: NodeId, b: NodeId) {
    conflicts.insert(canon(a, b));
}

fn has_conflict(conflicts: &Conflicts, a: NodeId, b: NodeId) -> bool {
    conflicts.contains(&canon(a, b))
}

fn canon(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a.index() <= b.index() { (a, b) } else { (b, a) }
}

fn layer_index_map(layer: &[NodeId]) -> FxHashMap<NodeId, usize> {
    layer.iter().enumerate().map(|(i, &n)| (n, i)).collect()
}

fn neighbors_in(
    g: &Graph,
    v: NodeId,
    neighbor_index: &FxHashMap<NodeId, usize>,
) -> Vec<(usize, NodeId, EdgeId)> {
    let mut out = Vec::new();
    for p in g.node(v).iter_ports() {
        for &e in g.port(p).incoming().iter().chain(g.port(p).outgoing()) {
            let edge = g.edge(e);
            let other = if edge.source_node() == v { edge.target_node() } else { edge.source_node() };
            if let Some(&idx) = neighbor_index.get(&other) {
                out.push((idx, other, e));
            }
        }
    }
    out
}

/// Type-1 conflict marking (§4.8): an edge between two non-dummy nodes that
/// crosses an inner segment (an edge between two LONG_EDGE dummies) is
/// marked and never straightened by alignment.
fn mark_type1_conflicts(g: &Graph, layering: &[Vec<NodeId>]) -> Conflicts {
    let mut conflicts = Conflicts::default();
    if layering.len() < 3 {
        return conflicts;
    }

    for i in 1..layering.len() - 1 {
        let prev_index = layer_index_map(&layering[i - 1]);
        let cur = &layering[i];
        let prev_len = layering[i - 1].len();
        if cur.is_empty() || prev_len == 0 {
            continue;
        }

        let mut k0 = 0usize;
        let mut scan_pos = 0usize;
        let last = cur.len() - 1;

        for l in 0..cur.len() {
            let v = cur[l];
            let inner_partner = if g.node(v).node_type == NodeType::LongEdge {
                neighbors_in(g, v, &prev_index)
                    .into_iter()
                    .find(|&(_, u, _)| g.node(u).node_type == NodeType::LongEdge)
                    .map(|(idx, _, _)| idx)
            } else {
                None
            };
            let k1 = inner_partner.unwrap_or(prev_len - 1);

            if inner_partner.is_some() || l == last {
                for scan in scan_pos..=l {
                    let scan_node = cur[scan];
                    for (u_pos, u, _) in neighbors_in(g, scan_node, &prev_index) {
                        if u_pos < k0 || u_pos > k1 {
                            let both_dummy = g.node(u).node_type == NodeType::LongEdge
                                && g.node(scan_node).node_type == NodeType::LongEdge;
                            if !both_dummy {
                                add_conflict(&mut conflicts, u, scan_node);
                            }
                        }
                    }
                }
                scan_pos = l + 1;
                k0 = k1;
            }
        }
    }

    conflicts
}

struct Alignment {
    root: FxHashMap<NodeId, NodeId>,
    align: FxHashMap<NodeId, NodeId>,
    /// The edge that justified `align[w] = v` (O4): inside-block shift uses
    /// this directly instead of re-deriving "the edge between these two
    /// nodes", which would be ambiguous for parallel edges.
    link_edge: FxHashMap<(NodeId, NodeId), EdgeId>,
}

fn effective_index(len: usize, idx: usize, mirror: bool) -> usize {
    if mirror { len - 1 - idx } else { idx }
}

/// One of the four `verticalAlignment` passes (§4.8 step 1).
fn vertical_alignment(
    g: &Graph,
    layering: &[Vec<NodeId>],
    conflicts: &Conflicts,
    hdir: HDir,
    vdir: VDir,
) -> Alignment {
    let mirror = vdir == VDir::Up;

    let mut root = FxHashMap::default();
    let mut align = FxHashMap::default();
    for layer in layering {
        for &n in layer {
            root.insert(n, n);
            align.insert(n, n);
        }
    }
    let mut link_edge = FxHashMap::default();

    let mut pos: FxHashMap<NodeId, usize> = FxHashMap::default();
    for layer in layering {
        let len = layer.len();
        for (i, &n) in layer.iter().enumerate() {
            pos.insert(n, effective_index(len, i, mirror));
        }
    }

    for (li, layer) in layering.iter().enumerate() {
        let neighbor_li = match hdir {
            HDir::Left => li.checked_sub(1),
            HDir::Right => if li + 1 < layering.len() { Some(li + 1) } else { None },
        };
        let Some(neighbor_li) = neighbor_li else { continue };
        let neighbor_index = layer_index_map(&layering[neighbor_li]);

        let mut order: Vec<NodeId> = layer.clone();
        order.sort_by_key(|n| pos[n]);

        let mut prev_idx: i64 = -1;
        for v in order {
            let mut ws = neighbors_in(g, v, &neighbor_index);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|&(idx, _, _)| idx);
            let d = ws.len();
            let lo = (d - 1) / 2;
            let hi = d / 2;
            for &mid in [lo, hi].iter() {
                if align[&v] != v {
                    break;
                }
                let (wpos, w, e) = ws[mid];
                if (prev_idx) < wpos as i64 && !has_conflict(conflicts, v, w) {
                    align.insert(w, v);
                    let r = root[&w];
                    root.insert(v, r);
                    align.insert(v, r);
                    link_edge.insert((w, v), e);
                    link_edge.insert((v, w), e);
                    prev_idx = wpos as i64;
                }
            }
        }
    }

    Alignment { root, align, link_edge }
}

fn node_port_y(g: &Graph, node: NodeId, edge: EdgeId) -> f64 {
    let e = g.edge(edge);
    let port = if e.source_node() == node { e.source() } else { e.target() };
    g.port(port).position.y
}

/// Inner shift (§4.8 step 2): walks each block's cyclic `align` chain from
/// its root, accumulating the offset that keeps the edge-connected ports of
/// consecutive members at the same absolute y, then normalises so the
/// block's own top sits at 0.
fn inner_shifts(g: &Graph, layering: &[Vec<NodeId>], alignment: &Alignment) -> FxHashMap<NodeId, f64> {
    let mut shift: FxHashMap<NodeId, f64> = FxHashMap::default();

    let mut roots: Vec<NodeId> = Vec::new();
    let mut seen_root: FxHashSet<NodeId> = FxHashSet::default();
    for layer in layering {
        for &n in layer {
            let r = alignment.root[&n];
            if seen_root.insert(r) {
                roots.push(r);
            }
        }
    }

    for root in roots {
        let mut members = vec![root];
        shift.insert(root, 0.0);
        let mut cur = root;
        loop {
            let next = alignment.align[&cur];
            if next == root {
                break;
            }
            let off = match alignment.link_edge.get(&(cur, next)) {
                Some(&e) => node_port_y(g, cur, e) - node_port_y(g, next, e),
                None => 0.0,
            };
            shift.insert(next, shift[&cur] + off);
            members.push(next);
            cur = next;
        }

        let top = members
            .iter()
            .map(|&m| shift[&m] - g.node(m).size.height / 2.0)
            .fold(f64::INFINITY, f64::min);
        if top.is_finite() {
            for &m in &members {
                *shift.get_mut(&m).unwrap() -= top;
            }
        }
    }

    shift
}

fn min_separation(g: &Graph, a: &Node, b: &Node) -> f64 {
    g.config.spacings.effective(a, b).vertical
}

struct Layout {
    y: FxHashMap<NodeId, f64>,
    height: f64,
}

/// Horizontal compaction (§4.8 step 3, simplified per the module doc
/// comment): places every block, respecting minimum in-layer separation and
/// the block's own inner shift, in the same layer order the alignment pass
/// used.
fn build_layout(g: &Graph, layering: &[Vec<NodeId>], alignment: &Alignment, vdir: VDir) -> Layout {
    let shift = inner_shifts(g, layering, alignment);
    let mirror = vdir == VDir::Up;

    let mut y: FxHashMap<NodeId, f64> = FxHashMap::default();
    let layer_seq: Vec<usize> = if mirror {
        (0..layering.len()).rev().collect()
    } else {
        (0..layering.len()).collect()
    };

    for &li in &layer_seq {
        let order: Vec<NodeId> = if mirror {
            layering[li].iter().rev().copied().collect()
        } else {
            layering[li].clone()
        };

        let mut prev: Option<NodeId> = None;
        for v in order {
            let root = alignment.root[&v];
            let min_allowed = match prev {
                Some(p) => y[&p] + g.node(p).size.height / 2.0 + min_separation(g, g.node(p), g.node(v))
                    + g.node(v).size.height / 2.0,
                None => f64::NEG_INFINITY,
            };

            let desired = if root != v { y.get(&root).map(|&ry| ry + shift[&v] - shift[&root]) } else { None };

            let placed = match desired {
                Some(d) if d >= min_allowed - EPSILON => d,
                Some(_) => min_allowed,
                None => {
                    if min_allowed.is_finite() {
                        min_allowed
                    } else {
                        shift[&v]
                    }
                }
            };

            y.insert(v, placed);
            if root != v {
                y.insert(root, placed - shift[&v] + shift[&root]);
            }
            prev = Some(v);
        }
    }

    let height = layering
        .iter()
        .flatten()
        .map(|&n| y[&n] + g.node(n).size.height / 2.0)
        .fold(f64::NEG_INFINITY, f64::max)
        - layering
            .iter()
            .flatten()
            .map(|&n| y[&n] - g.node(n).size.height / 2.0)
            .fold(f64::INFINITY, f64::min);

    Layout { y, height: height.max(0.0) }
}

/// Order check (§4.8 selection): no two nodes in the same layer may overlap.
fn passes_order_check(g: &Graph, layering: &[Vec<NodeId>], layout: &Layout) -> bool {
    for layer in layering {
        for w in layer.windows(2) {
            let (a, b) = (w[0], w[1]);
            let required = g.node(a).size.height / 2.0 + min_separation(g, g.node(a), g.node(b))
                + g.node(b).size.height / 2.0;
            if layout.y[&b] - layout.y[&a] < required - EPSILON {
                return false;
            }
        }
    }
    true
}

fn combo_for(alignment: FixedAlignment) -> Option<(HDir, VDir)> {
    match alignment {
        FixedAlignment::LeftUp => Some((HDir::Left, VDir::Up)),
        FixedAlignment::LeftDown => Some((HDir::Left, VDir::Down)),
        FixedAlignment::RightUp => Some((HDir::Right, VDir::Up)),
        FixedAlignment::RightDown => Some((HDir::Right, VDir::Down)),
        FixedAlignment::None | FixedAlignment::Balanced => None,
    }
}

const COMBOS: [(HDir, VDir); 4] =
    [(HDir::Left, VDir::Up), (HDir::Left, VDir::Down), (HDir::Right, VDir::Up), (HDir::Right, VDir::Down)];

fn layout_for(g: &Graph, layering: &[Vec<NodeId>], conflicts: &Conflicts, hdir: HDir, vdir: VDir) -> Layout {
    let alignment = vertical_alignment(g, layering, conflicts, hdir, vdir);
    build_layout(g, layering, &alignment, vdir)
}

/// Median combination for `BALANCED` selection (§4.8): shifts every layout
/// so its minimum y matches the smallest-height ("reference") layout's
/// minimum, then takes the per-node median of the four shifted values. The
/// chosen y already reflects whichever candidate's inner shift produced it,
/// so no further inner-shift bookkeeping is carried forward (O3).
fn balanced_combination(layering: &[Vec<NodeId>], layouts: &[Layout; 4]) -> Layout {
    let reference = layouts.iter().enumerate().min_by(|(_, a), (_, b)| {
        a.height.partial_cmp(&b.height).unwrap_or(std::cmp::Ordering::Equal)
    }).map(|(i, _)| i).unwrap_or(0);

    let min_of = |l: &Layout| l.y.values().cloned().fold(f64::INFINITY, f64::min);
    let ref_min = min_of(&layouts[reference]);

    let mut y = FxHashMap::default();
    for layer in layering {
        for &n in layer {
            let mut values: Vec<f64> = layouts
                .iter()
                .map(|l| l.y[&n] - min_of(l) + ref_min)
                .collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let median = (values[1] + values[2]) / 2.0;
            y.insert(n, median);
        }
    }

    let height = layering
        .iter()
        .flatten()
        .map(|&n| y[&n])
        .fold(f64::NEG_INFINITY, f64::max)
        - layering.iter().flatten().map(|&n| y[&n]).fold(f64::INFINITY, f64::min);

    Layout { y, height: height.max(0.0) }
}

/// Assigns every node's `position.y` (§4.8). Leaves x untouched; that's C9's
/// job. A graph with no layers is a no-op.
pub fn run(g: &mut Graph) {
    let layering: Vec<Vec<NodeId>> = g.layers().iter().map(|l| l.nodes().to_vec()).collect();
    if layering.iter().all(|l| l.is_empty()) {
        return;
    }

    let conflicts = mark_type1_conflicts(g, &layering);

    let layouts: [Layout; 4] = {
        let mut it = COMBOS.iter().map(|&(h, v)| layout_for(g, &layering, &conflicts, h, v));
        [it.next().unwrap(), it.next().unwrap(), it.next().unwrap(), it.next().unwrap()]
    };

    let use_balanced = matches!(g.config.fixed_alignment, FixedAlignment::Balanced)
        || (matches!(g.config.fixed_alignment, FixedAlignment::None) && !g.config.favor_straight_edges);

    let chosen = if use_balanced {
        balanced_combination(&layering, &layouts)
    } else if let Some((h, v)) = combo_for(g.config.fixed_alignment) {
        let idx = COMBOS.iter().position(|&c| c == (h, v)).unwrap();
        if passes_order_check(g, &layering, &layouts[idx]) {
            layouts.into_iter().nth(idx).unwrap()
        } else {
            layout_for(g, &layering, &conflicts, HDir::Right, VDir::Down)
        }
    } else {
        let mut best: Option<usize> = None;
        for (i, l) in layouts.iter().enumerate() {
            if passes_order_check(g, &layering, l) {
                if best.map(|b| l.height < layouts[b].height).unwrap_or(true) {
                    best = Some(i);
                }
            }
        }
        match best {
            Some(i) => layouts.into_iter().nth(i).unwrap(),
            None => layout_for(g, &layering, &conflicts, HDir::Right, VDir::Down),
        }
    };

    let base = chosen.y.values().cloned().fold(f64::INFINITY, f64::min);
    let base = if base.is_finite() { base } else { 0.0 };
    for layer in &layering {
        for &n in layer {
            g.node_mut(n).position.y = chosen.y[&n] - base;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, PortDirection, PortSide, Size};

    fn sized(g: &mut Graph, n: NodeId, h: f64) {
        g.node_mut(n).size = Size { width: 20.0, height: h };
    }

    #[test]
    fn two_layer_chain_places_nodes_without_overlap() {
        let mut g = Graph::new(LayoutConfig::default());
        let l0 = g.push_layer();
        let l1 = g.push_layer();
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let c = g.add_node(NodeType::Normal);
        sized(&mut g, a, 20.0);
        sized(&mut g, b, 20.0);
        sized(&mut g, c, 20.0);
        g.push_node_to_layer(a, l0);
        g.push_node_to_layer(b, l1);
        g.push_node_to_layer(c, l1);

        let pa = g.add_port(a, PortSide::East, PortDirection::Output);
        let qb = g.add_port(b, PortSide::West, PortDirection::Input);
        g.add_edge(pa, qb).unwrap();

        run(&mut g);

        assert!(g.node(c).position.y - g.node(b).position.y >= 20.0 - EPSILON);
    }

    #[test]
    fn single_node_graph_gets_a_coordinate() {
        let mut g = Graph::new(LayoutConfig::default());
        let l0 = g.push_layer();
        let a = g.add_node(NodeType::Normal);
        g.push_node_to_layer(a, l0);

        run(&mut g);

        assert!(g.node(a).position.y.is_finite());
    }
}
