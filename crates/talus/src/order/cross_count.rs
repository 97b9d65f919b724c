//! Between-layer crossing counter (§4.6.4, ordinary case): a
//! bit-indexed-tree accumulator over one pair of adjacent layers at a time.
//!
//! The hyperedge-specific corner-sweep refinement and in-layer edge
//! crossings are out of scope here (see DESIGN.md); this counts ordinary
//! two-endpoint cross-layer edges only, which is what the sweep driver
//! needs to decide whether an attempt improved on the previous one.

use rustc_hash::FxHashMap;
use talus_graph::{Graph, NodeId};

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

    /// Count of inserted positions `<= i`.
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

/// Number of edge crossings between two adjacent, fully ordered layers.
/// Self-loops never contribute (an edge's endpoints can't sit in two
/// different layers at once).
pub fn two_layer_cross_count(g: &Graph, upper: &[NodeId], lower: &[NodeId]) -> u64 {
    let upper_index: FxHashMap<NodeId, usize> =
        upper.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let lower_index: FxHashMap<NodeId, usize> =
        lower.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for e in g.edges() {
        let (s, t) = (e.source_node(), e.target_node());
        if let (Some(&up), Some(&lp)) = (upper_index.get(&s), lower_index.get(&t)) {
            pairs.push((up, lp));
        } else if let (Some(&up), Some(&lp)) = (upper_index.get(&t), lower_index.get(&s)) {
            pairs.push((up, lp));
        }
    }
    pairs.sort_by_key(|&(up, _)| up);

    let mut bit = BinaryIndexedTree::new(lower.len());
    let mut crossings: u64 = 0;
    let mut inserted: u64 = 0;
    for &(_, lp) in &pairs {
        let not_larger = bit.query_prefix(lp) as u64;
        crossings += inserted - not_larger;
        bit.update(lp, 1);
        inserted += 1;
    }
    crossings
}

/// Sum of crossings across every adjacent layer pair in `order`.
pub fn total_crossings(g: &Graph, order: &[Vec<NodeId>]) -> u64 {
    order
        .windows(2)
        .map(|w| two_layer_cross_count(g, &w[0], &w[1]))
        .sum()
}
