//! C9: orthogonal edge router and x-coordinate assignment.
//!
//! Runs gap by gap (a "gap" is the space between two adjacent layers, plus
//! the space before the first and after the last). Each gap's crossing edges
//! are grouped into hypernodes (Sander's technique: every port transitively
//! joined by a crossing edge is one hypernode, so a fan-out from a single
//! port is one unit, not one per edge), the hypernodes are assigned a
//! left-to-right rank via a small dependency DAG, and that rank becomes the
//! hypernode's bend-point x inside the gap. Node x-coordinates fall out of
//! the accumulated gap widths.
//!
//! **Dependency-graph simplification** (see DESIGN.md's "Deliberate scope
//! reductions" — this is a Non-goal per SPEC_FULL.md §1, not an open
//! question). The reference's corner case analysis for the conflict/crossing
//! cost of an ordered pair of hypernodes is replaced with a direct overlap
//! test: ordering `a` before `b` costs `CONFLICT_PENALTY` when `a`'s
//! target-side extent overlaps `b`'s
//! source-side extent (its rightward run would cut across `b`'s incoming
//! column), plus a symmetric crossing term when the two hypernodes' relative
//! vertical order flips between the source and target side. This keeps the
//! same shape (conflict cost + crossing cost, cheaper direction wins, a
//! zero-weight reverse edge when both directions are costly) without the
//! reference's separate class-graph bookkeeping.

use rustc_hash::{FxHashMap, FxHashSet};
use talus_graph::{EdgeId, Graph, NodeId, NodeType, PortId, PortSide};

const CONFLICT_PENALTY: i64 = 16;

fn absolute_port_y(g: &Graph, port: PortId) -> f64 {
    let p = g.port(port);
    let n = g.node(p.node());
    n.position.y - n.size.height / 2.0 + p.position.y
}

struct Hypernode {
    edges: Vec<EdgeId>,
    source_extent: (f64, f64),
    target_extent: (f64, f64),
    rank: usize,
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

/// Groups every edge crossing from `left` into `right` into hypernodes by
/// the transitive closure of shared ports.
fn build_hypernodes(g: &Graph, left: &[NodeId], right: &[NodeId]) -> Vec<Hypernode> {
    let left_set: FxHashSet<NodeId> = left.iter().copied().collect();
    let right_set: FxHashSet<NodeId> = right.iter().copied().collect();

    let mut crossing: Vec<EdgeId> = Vec::new();
    for e in g.edges() {
        let sn = e.source_node();
        let tn = e.target_node();
        if (left_set.contains(&sn) && right_set.contains(&tn))
            || (left_set.contains(&tn) && right_set.contains(&sn))
        {
            crossing.push(e.id());
        }
    }
    if crossing.is_empty() {
        return Vec::new();
    }

    let mut port_slot: FxHashMap<PortId, usize> = FxHashMap::default();
    let mut slot_port: Vec<PortId> = Vec::new();
    let mut slot_of = |p: PortId, port_slot: &mut FxHashMap<PortId, usize>, slot_port: &mut Vec<PortId>| -> usize {
        *port_slot.entry(p).or_insert_with(|| {
            slot_port.push(p);
            slot_port.len() - 1
        })
    };

    let mut edge_slots: Vec<(EdgeId, usize, usize)> = Vec::new();
    for &e in &crossing {
        let edge = g.edge(e);
        let (left_port, right_port) = if left_set.contains(&edge.source_node()) {
            (edge.source(), edge.target())
        } else {
            (edge.target(), edge.source())
        };
        let ls = slot_of(left_port, &mut port_slot, &mut slot_port);
        let rs = slot_of(right_port, &mut port_slot, &mut slot_port);
        edge_slots.push((e, ls, rs));
    }

    let mut uf = UnionFind::new(slot_port.len());
    for &(_, ls, rs) in &edge_slots {
        uf.union(ls, rs);
    }

    let mut groups: FxHashMap<usize, Vec<EdgeId>> = FxHashMap::default();
    for &(e, ls, _) in &edge_slots {
        let root = uf.find(ls);
        groups.entry(root).or_default().push(e);
    }

    groups
        .into_values()
        .map(|edges| {
            let mut source_ys: Vec<f64> = Vec::new();
            let mut target_ys: Vec<f64> = Vec::new();
            for &e in &edges {
                let edge = g.edge(e);
                let (sp, tp) = if left_set.contains(&edge.source_node()) {
                    (edge.source(), edge.target())
                } else {
                    (edge.target(), edge.source())
                };
                source_ys.push(absolute_port_y(g, sp));
                target_ys.push(absolute_port_y(g, tp));
            }
            let source_extent =
                (source_ys.iter().cloned().fold(f64::INFINITY, f64::min), source_ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
            let target_extent =
                (target_ys.iter().cloned().fold(f64::INFINITY, f64::min), target_ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
            Hypernode { edges, source_extent, target_extent, rank: 0 }
        })
        .collect()
}

fn overlaps(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

fn mean(extent: (f64, f64)) -> f64 {
    (extent.0 + extent.1) / 2.0
}

/// Conflict + crossing cost of ordering `a` before `b`; see this module's
/// doc comment for the substitution this implements instead of §4.9's exact
/// cost analysis.
fn cost_before(a: &Hypernode, b: &Hypernode) -> i64 {
    let mut cost = 0;
    if overlaps(a.target_extent, b.source_extent) {
        cost += CONFLICT_PENALTY;
    }
    if (mean(a.source_extent) < mean(b.source_extent)) != (mean(a.target_extent) < mean(b.target_extent)) {
        cost += 1;
    }
    cost
}

struct Dep {
    from: usize,
    to: usize,
    weight: i64,
}

fn build_dependencies(nodes: &[Hypernode]) -> Vec<Dep> {
    let mut deps = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let cost_ij = cost_before(&nodes[i], &nodes[j]);
            let cost_ji = cost_before(&nodes[j], &nodes[i]);
            if cost_ij <= cost_ji {
                deps.push(Dep { from: i, to: j, weight: cost_ji - cost_ij });
                if cost_ij > 0 && cost_ji > 0 {
                    deps.push(Dep { from: j, to: i, weight: 0 });
                }
            } else {
                deps.push(Dep { from: j, to: i, weight: cost_ij - cost_ji });
            }
        }
    }
    deps
}

/// Greedily removes the lightest edge of every cycle found until the
/// dependency graph is acyclic (mirrors the greedy spirit of the cycle
/// breaker in `cycle_breaker.rs`, just weighted).
fn break_cycles(deps: &mut Vec<Dep>, n: usize) {
    loop {
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, d) in deps.iter().enumerate() {
            adj[d.from].push(i);
        }

        let mut color = vec![0u8; n]; // 0 = white, 1 = gray, 2 = black
        let mut path: Vec<usize> = Vec::new();
        let mut found: Option<Vec<usize>> = None;

        fn visit(
            v: usize,
            adj: &[Vec<usize>],
            deps: &[Dep],
            color: &mut [u8],
            path: &mut Vec<usize>,
            found: &mut Option<Vec<usize>>,
        ) {
            if found.is_some() {
                return;
            }
            color[v] = 1;
            for &edge_idx in &adj[v] {
                if found.is_some() {
                    return;
                }
                let to = deps[edge_idx].to;
                if color[to] == 1 {
                    let start = path.iter().position(|&e| deps[e].from == to).unwrap_or(0);
                    let mut cyc = path[start..].to_vec();
                    cyc.push(edge_idx);
                    *found = Some(cyc);
                    return;
                }
                if color[to] == 0 {
                    path.push(edge_idx);
                    visit(to, adj, deps, color, path, found);
                    path.pop();
                }
            }
            color[v] = 2;
        }

        for v in 0..n {
            if color[v] == 0 {
                visit(v, &adj, deps, &mut color, &mut path, &mut found);
            }
            if found.is_some() {
                break;
            }
        }

        match found {
            Some(cycle) => {
                let min_idx = cycle.iter().copied().min_by_key(|&i| deps[i].weight).unwrap();
                deps.remove(min_idx);
            }
            None => break,
        }
    }
}

fn longest_path_ranks(deps: &[Dep], n: usize) -> Vec<usize> {
    let mut indeg = vec![0usize; n];
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut outdeg = vec![0usize; n];
    for d in deps {
        adj[d.from].push(d.to);
        indeg[d.to] += 1;
        outdeg[d.from] += 1;
    }

    let mut queue: Vec<usize> = (0..n).filter(|&v| indeg[v] == 0).collect();
    let mut rank = vec![0usize; n];
    let mut remaining = indeg.clone();
    let mut head = 0;
    while head < queue.len() {
        let v = queue[head];
        head += 1;
        for &to in &adj[v] {
            rank[to] = rank[to].max(rank[v] + 1);
            remaining[to] -= 1;
            if remaining[to] == 0 {
                queue.push(to);
            }
        }
    }

    let max_rank = rank.iter().copied().max().unwrap_or(0);
    for v in 0..n {
        if outdeg[v] == 0 {
            rank[v] = max_rank;
        }
    }
    rank
}

/// Routes one gap, laying hypernodes' bends between `start_x` and the
/// returned x (the next gap's `start_x`).
fn route_gap(g: &mut Graph, left: &[NodeId], right: &[NodeId], start_x: f64) -> f64 {
    let mut hypernodes = build_hypernodes(g, left, right);

    let edge_edge = g.config.spacings.intra(NodeType::LongEdge).horizontal;
    let edge_node = g.config.spacings.inter(NodeType::Normal, NodeType::LongEdge).horizontal;
    let node_node = g.config.spacings.intra(NodeType::Normal).horizontal;

    if hypernodes.is_empty() {
        return start_x + node_node;
    }

    let mut deps = build_dependencies(&hypernodes);
    break_cycles(&mut deps, hypernodes.len());
    let ranks = longest_path_ranks(&deps, hypernodes.len());
    for (h, r) in hypernodes.iter_mut().zip(ranks.iter()) {
        h.rank = *r;
    }

    let num_slots = ranks.iter().copied().max().map(|m| m + 1).unwrap_or(0);
    let bend_x = |rank: usize| start_x + edge_node + rank as f64 * edge_edge;

    for h in &hypernodes {
        let x = bend_x(h.rank);
        let span = (h.source_extent.0.min(h.target_extent.0), h.source_extent.1.max(h.target_extent.1));
        let mut seen_ys: FxHashSet<u64> = FxHashSet::default();
        for &e in &h.edges {
            let edge = g.edge(e);
            let source_y = absolute_port_y(g, edge.source());
            let target_y = absolute_port_y(g, edge.target());

            let edge = g.edge_mut(e);
            if (source_y - target_y).abs() > 1e-4 {
                edge.bend_points.push(talus_graph::Point::new(x, source_y));
                edge.bend_points.push(talus_graph::Point::new(x, target_y));
            }

            for y in [source_y, target_y] {
                let strictly_inside = y > span.0 + 1e-4 && y < span.1 - 1e-4;
                let bits = y.to_bits();
                let shared = !seen_ys.insert(bits);
                if strictly_inside || shared {
                    g.edge_mut(e).junction_points.push(talus_graph::Point::new(x, y));
                }
            }
        }
    }

    bend_x(num_slots.saturating_sub(1).max(0)) + edge_edge.max(0.0) + edge_node
}

/// Assigns every node's `position.x` and every cross-gap edge's bend and
/// junction points (§4.9). Runs after C8 (so port y-offsets are final) and
/// before C10's long-edge joiner.
pub fn run(g: &mut Graph) {
    let layering: Vec<Vec<NodeId>> = g.layers().iter().map(|l| l.nodes().to_vec()).collect();
    if layering.is_empty() {
        return;
    }

    let node_node = g.config.spacings.intra(NodeType::Normal).horizontal;

    let mut x = 0.0_f64;
    for (i, layer) in layering.iter().enumerate() {
        let width = layer.iter().map(|&n| g.node(n).size.width).fold(0.0_f64, f64::max);
        let center = x + width / 2.0;
        for &n in layer {
            g.node_mut(n).position.x = center;
        }
        x += width;

        if i + 1 < layering.len() {
            x = route_gap(g, layer, &layering[i + 1], x);
        } else {
            x += node_node;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, PortDirection, Size};

    #[test]
    fn crossed_edges_get_distinct_bend_points() {
        let mut g = Graph::new(LayoutConfig::default());
        let l0 = g.push_layer();
        let l1 = g.push_layer();

        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let c = g.add_node(NodeType::Normal);
        let d = g.add_node(NodeType::Normal);
        for n in [a, b, c, d] {
            g.node_mut(n).size = Size { width: 20.0, height: 20.0 };
        }
        g.push_node_to_layer(a, l0);
        g.push_node_to_layer(b, l0);
        g.push_node_to_layer(c, l1);
        g.push_node_to_layer(d, l1);
        g.node_mut(a).position.y = 0.0;
        g.node_mut(b).position.y = 40.0;
        g.node_mut(c).position.y = 0.0;
        g.node_mut(d).position.y = 40.0;

        let pa = g.add_port(a, PortSide::East, PortDirection::Output);
        let pb = g.add_port(b, PortSide::East, PortDirection::Output);
        let qc = g.add_port(c, PortSide::West, PortDirection::Input);
        let qd = g.add_port(d, PortSide::West, PortDirection::Input);
        let e1 = g.add_edge(pa, qd).unwrap();
        let e2 = g.add_edge(pb, qc).unwrap();

        run(&mut g);

        assert_eq!(g.edge(e1).bend_points.len(), 2);
        assert_eq!(g.edge(e2).bend_points.len(), 2);
        assert!(g.node(c).position.x > g.node(a).position.x);
    }

    #[test]
    fn straight_edge_gets_no_bend_points() {
        let mut g = Graph::new(LayoutConfig::default());
        let l0 = g.push_layer();
        let l1 = g.push_layer();
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        g.node_mut(a).size = Size { width: 20.0, height: 20.0 };
        g.node_mut(b).size = Size { width: 20.0, height: 20.0 };
        g.push_node_to_layer(a, l0);
        g.push_node_to_layer(b, l1);

        let pa = g.add_port(a, PortSide::East, PortDirection::Output);
        let qb = g.add_port(b, PortSide::West, PortDirection::Input);
        let e = g.add_edge(pa, qb).unwrap();

        run(&mut g);

        assert!(g.edge(e).bend_points.is_empty());
    }

    #[test]
    fn empty_graph_is_a_no_op() {
        let mut g = Graph::new(LayoutConfig::default());
        run(&mut g);
        assert_eq!(g.layer_count(), 0);
    }
}
