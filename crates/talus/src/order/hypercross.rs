//! Hyperedge crossing counter (§4.6.4, hyperedge case).
//!
//! When a layer gap has ports of combined degree > 1 (a port fanning out to
//! or in from several ports on the other side), the ordinary pairwise
//! straight-edge count undercounts: a bundle of parallel connections behaves
//! as one wide "hyperedge" for crossing purposes, not as independent lines.
//! This groups ports into hyperedges via union-find, assigns each hyperedge
//! its upper/lower index extents, and estimates crossings from the
//! straight-line component (compressed BIT count between representative
//! endpoints) plus a corner-sweep term for bundles whose extents overlap.
//!
//! The corner-sweep here is a deliberate simplification of the Sponemann
//! (2014) formulation's exact overlap accounting — a Non-goal per
//! SPEC_FULL.md §1, see DESIGN.md's "Deliberate scope reductions" — instead
//! of separate per-side corner event classes, two hyperedges' overlap
//! contribution is counted once per side whose extents actually overlap,
//! which is exact for the non-overlapping and fully-nested cases and a
//! conservative estimate for partial overlaps.

use rustc_hash::FxHashMap;
use talus_graph::{Graph, NodeId, PortId};

struct BinaryIndexedTree {
    tree: Vec<u32>,
}

impl BinaryIndexedTree {
    fn new(size: usize) -> Self {
        Self { tree: vec![0; size + 2] }
    }

    fn update(&mut self, mut i: usize, delta: u32) {
        i += 1;
        while i < self.tree.len() {
            self.tree[i] += delta;
            i += i & i.wrapping_neg();
        }
    }

    fn query_prefix(&self, mut i: usize) -> u32 {
        i += 1;
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }
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

#[derive(Debug, Clone, Copy)]
struct Extent {
    left: usize,
    right: usize,
}

impl Extent {
    fn overlaps(&self, other: &Extent) -> bool {
        self.left <= other.right && other.left <= self.right
    }
}

struct Hyperedge {
    upper: Option<Extent>,
    lower: Option<Extent>,
}

fn port_index_map(g: &Graph, layer: &[NodeId]) -> FxHashMap<PortId, usize> {
    let mut map = FxHashMap::default();
    let mut pos = 0usize;
    for &n in layer {
        for p in g.node(n).iter_ports() {
            map.insert(p, pos);
            pos += 1;
        }
    }
    map
}

fn build_hyperedges(
    g: &Graph,
    upper: &[NodeId],
    lower: &[NodeId],
) -> (Vec<Hyperedge>, u64) {
    let upper_pos = port_index_map(g, upper);
    let lower_pos = port_index_map(g, lower);

    let mut port_ids: Vec<PortId> = Vec::new();
    let mut port_slot: FxHashMap<PortId, usize> = FxHashMap::default();
    let mut slot_of = |p: PortId, port_ids: &mut Vec<PortId>, port_slot: &mut FxHashMap<PortId, usize>| -> usize {
        *port_slot.entry(p).or_insert_with(|| {
            port_ids.push(p);
            port_ids.len() - 1
        })
    };

    let mut links: Vec<(usize, usize)> = Vec::new();
    let mut straight_pairs: Vec<(usize, usize)> = Vec::new();

    for e in g.edges() {
        let (s, t) = (e.source(), e.target());
        let (up_port, lo_port) = if upper_pos.contains_key(&s) && lower_pos.contains_key(&t) {
            (s, t)
        } else if upper_pos.contains_key(&t) && lower_pos.contains_key(&s) {
            (t, s)
        } else {
            continue;
        };
        let su = slot_of(up_port, &mut port_ids, &mut port_slot);
        let sl = slot_of(lo_port, &mut port_ids, &mut port_slot);
        links.push((su, sl));
        straight_pairs.push((upper_pos[&up_port], lower_pos[&lo_port]));
    }

    if links.is_empty() {
        return (Vec::new(), 0);
    }

    let mut uf = UnionFind::new(port_ids.len());
    for &(a, b) in &links {
        uf.union(a, b);
    }

    let mut groups: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for slot in 0..port_ids.len() {
        let root = uf.find(slot);
        groups.entry(root).or_default().push(slot);
    }

    let mut hyperedges = Vec::with_capacity(groups.len());
    for (_, slots) in groups {
        let mut upper_idx = Vec::new();
        let mut lower_idx = Vec::new();
        for &slot in &slots {
            let p = port_ids[slot];
            if let Some(&ui) = upper_pos.get(&p) {
                upper_idx.push(ui);
            }
            if let Some(&li) = lower_pos.get(&p) {
                lower_idx.push(li);
            }
        }
        let upper = if upper_idx.is_empty() {
            None
        } else {
            Some(Extent { left: *upper_idx.iter().min().unwrap(), right: *upper_idx.iter().max().unwrap() })
        };
        let lower = if lower_idx.is_empty() {
            None
        } else {
            Some(Extent { left: *lower_idx.iter().min().unwrap(), right: *lower_idx.iter().max().unwrap() })
        };
        hyperedges.push(Hyperedge { upper, lower });
    }

    // Straight-line component: compress lower positions actually used, then
    // count inversions against upper order via a bit-indexed tree, matching
    // the ordinary between-layer counter but at port granularity.
    let mut compressed: Vec<usize> = straight_pairs.iter().map(|&(_, l)| l).collect();
    compressed.sort_unstable();
    compressed.dedup();
    let rank_of = |l: usize| compressed.binary_search(&l).unwrap();

    let mut pairs: Vec<(usize, usize)> =
        straight_pairs.iter().map(|&(u, l)| (u, rank_of(l))).collect();
    pairs.sort_by_key(|&(u, _)| u);

    let mut bit = BinaryIndexedTree::new(compressed.len());
    let mut straight: u64 = 0;
    let mut inserted: u64 = 0;
    for &(_, l) in &pairs {
        let not_larger = bit.query_prefix(l) as u64;
        straight += inserted - not_larger;
        bit.update(l, 1);
        inserted += 1;
    }

    (hyperedges, straight)
}

/// Crossing estimate for one layer gap, accounting for hyperedges (ports of
/// combined degree > 1). Falls back to the straight-line-only component when
/// no hyperedge has overlapping extents on both sides.
pub fn hyperedge_cross_count(g: &Graph, upper: &[NodeId], lower: &[NodeId]) -> u64 {
    let (hyperedges, straight) = build_hyperedges(g, upper, lower);
    if hyperedges.len() < 2 {
        return straight;
    }

    let mut overlap_term: u64 = 0;
    for i in 0..hyperedges.len() {
        for j in (i + 1)..hyperedges.len() {
            let a = &hyperedges[i];
            let b = &hyperedges[j];
            let upper_overlap = match (a.upper, b.upper) {
                (Some(au), Some(bu)) => au.overlaps(&bu),
                _ => false,
            };
            let lower_overlap = match (a.lower, b.lower) {
                (Some(al), Some(bl)) => al.overlaps(&bl),
                _ => false,
            };
            if upper_overlap && lower_overlap {
                overlap_term += 1;
            }
        }
    }

    straight + overlap_term
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, NodeType, PortDirection, PortSide};

    #[test]
    fn fanout_port_does_not_cross_itself() {
        let mut g = Graph::new(LayoutConfig::default());
        let top = g.add_node(NodeType::Normal);
        let b0 = g.add_node(NodeType::Normal);
        let b1 = g.add_node(NodeType::Normal);
        let b2 = g.add_node(NodeType::Normal);

        let out = g.add_port(top, PortSide::South, PortDirection::Output);
        let in0 = g.add_port(b0, PortSide::North, PortDirection::Input);
        let in1 = g.add_port(b1, PortSide::North, PortDirection::Input);
        let in2 = g.add_port(b2, PortSide::North, PortDirection::Input);
        g.add_edge(out, in0).unwrap();
        g.add_edge(out, in1).unwrap();
        g.add_edge(out, in2).unwrap();

        let count = hyperedge_cross_count(&g, &[top], &[b0, b1, b2]);
        assert_eq!(count, 0);
    }

    #[test]
    fn two_independent_straight_edges_do_not_cross() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let c = g.add_node(NodeType::Normal);
        let d = g.add_node(NodeType::Normal);

        let pa = g.add_port(a, PortSide::South, PortDirection::Output);
        let pb = g.add_port(b, PortSide::South, PortDirection::Output);
        let qc = g.add_port(c, PortSide::North, PortDirection::Input);
        let qd = g.add_port(d, PortSide::North, PortDirection::Input);
        g.add_edge(pa, qc).unwrap();
        g.add_edge(pb, qd).unwrap();

        assert_eq!(hyperedge_cross_count(&g, &[a, b], &[c, d]), 0);
    }
}
