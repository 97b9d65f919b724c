//! C3: cycle breaker.
//!
//! Greedy sinks-and-sources heuristic (Eades/Lin/Smyth): repeatedly peel off
//! sinks and sources from the remaining graph, assigning them ranks from the
//! two ends inward; when neither is available, peel the node maximising
//! `outdeg - indeg`. Edges running against the resulting rank order are
//! reversed, producing an acyclic graph (I5 / P2).

use std::collections::VecDeque;
use talus_graph::{EdgeId, Graph, NodeId};

struct Degrees {
    out_degree: Vec<i64>,
    in_degree: Vec<i64>,
    predecessors: Vec<Vec<usize>>,
    successors: Vec<Vec<usize>>,
    removed: Vec<bool>,
}

fn build_degrees(g: &Graph, nodes: &[NodeId]) -> Degrees {
    let n = nodes.len();
    let mut index_of = rustc_hash::FxHashMap::default();
    for (i, &node) in nodes.iter().enumerate() {
        index_of.insert(node, i);
    }

    let mut out_degree = vec![0i64; n];
    let mut in_degree = vec![0i64; n];
    let mut predecessors = vec![Vec::new(); n];
    let mut successors = vec![Vec::new(); n];

    for e in g.edges() {
        let src = e.source_node();
        let dst = e.target_node();
        if src == dst {
            continue;
        }
        let (Some(&si), Some(&di)) = (index_of.get(&src), index_of.get(&dst)) else {
            continue;
        };
        out_degree[si] += 1;
        in_degree[di] += 1;
        successors[si].push(di);
        predecessors[di].push(si);
    }

    Degrees {
        out_degree,
        in_degree,
        predecessors,
        successors,
        removed: vec![false; n],
    }
}

/// Assigns every node a `mark` (cycle breaker rank) and reverses every edge
/// whose source rank exceeds its target rank.
pub fn run(g: &mut Graph) {
    let nodes: Vec<NodeId> = g.node_ids().collect();
    let n = nodes.len();
    if n == 0 {
        return;
    }

    let mut d = build_degrees(g, &nodes);
    for i in 0..n {
        g.node_mut(nodes[i]).in_degree = d.in_degree[i] as usize;
        g.node_mut(nodes[i]).out_degree = d.out_degree[i] as usize;
    }

    let mut marks = vec![0i64; n];
    let mut next_left: i64 = 0;
    let mut next_right: i64 = -1;

    let mut sink_queue: VecDeque<usize> = (0..n).filter(|&i| d.out_degree[i] == 0).collect();
    let mut source_queue: VecDeque<usize> = (0..n).filter(|&i| d.in_degree[i] == 0).collect();

    let mut remove = |d: &mut Degrees,
                       sink_queue: &mut VecDeque<usize>,
                       source_queue: &mut VecDeque<usize>,
                       v: usize| {
        d.removed[v] = true;
        for &u in &d.predecessors[v].clone() {
            if d.removed[u] {
                continue;
            }
            d.out_degree[u] -= 1;
            if d.out_degree[u] == 0 {
                sink_queue.push_back(u);
            }
        }
        for &w in &d.successors[v].clone() {
            if d.removed[w] {
                continue;
            }
            d.in_degree[w] -= 1;
            if d.in_degree[w] == 0 {
                source_queue.push_back(w);
            }
        }
    };

    let mut remaining = n;
    while remaining > 0 {
        while let Some(v) = sink_queue.pop_front() {
            if d.removed[v] {
                continue;
            }
            marks[v] = next_right;
            next_right -= 1;
            remove(&mut d, &mut sink_queue, &mut source_queue, v);
            remaining -= 1;
        }
        while let Some(v) = source_queue.pop_front() {
            if d.removed[v] {
                continue;
            }
            marks[v] = next_left;
            next_left += 1;
            remove(&mut d, &mut sink_queue, &mut source_queue, v);
            remaining -= 1;
        }
        if sink_queue.is_empty() && source_queue.is_empty() && remaining > 0 {
            // Tie-break: largest (outdeg - indeg), ties broken by largest
            // insertion index (node array position).
            let mut best: Option<(i64, usize)> = None;
            for i in 0..n {
                if d.removed[i] {
                    continue;
                }
                let key = (d.out_degree[i] - d.in_degree[i], i);
                if best.is_none_or(|b| key > b) {
                    best = Some(key);
                }
            }
            let (_, v) = best.expect("remaining > 0 implies an unremoved node exists");
            marks[v] = next_left;
            next_left += 1;
            remove(&mut d, &mut sink_queue, &mut source_queue, v);
            remaining -= 1;
        }
    }

    for mark in &mut marks {
        if *mark < 0 {
            *mark += n as i64 + 1;
        }
    }

    for (i, &node) in nodes.iter().enumerate() {
        g.node_mut(node).mark = marks[i];
    }

    let mut index_of = rustc_hash::FxHashMap::default();
    for (i, &node) in nodes.iter().enumerate() {
        index_of.insert(node, i);
    }

    let offending: Vec<EdgeId> = g
        .edges()
        .filter(|e| {
            let src = e.source_node();
            let dst = e.target_node();
            if src == dst {
                return false;
            }
            let (Some(&si), Some(&di)) = (index_of.get(&src), index_of.get(&dst)) else {
                return false;
            };
            marks[si] > marks[di]
        })
        .map(|e| e.id())
        .collect();

    for e in offending {
        g.reverse_edge(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, NodeType, PortDirection, PortSide};

    fn edge(g: &mut Graph, a: NodeId, b: NodeId) -> EdgeId {
        let pa = g.add_port(a, PortSide::East, PortDirection::Output);
        let pb = g.add_port(b, PortSide::West, PortDirection::Input);
        g.add_edge(pa, pb).unwrap()
    }

    #[test]
    fn direct_cycle_breaks_to_exactly_one_reversed_edge() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let ab = edge(&mut g, a, b);
        let ba = edge(&mut g, b, a);

        run(&mut g);

        let reversed_count = [ab, ba].iter().filter(|&&e| g.edge(e).reversed).count();
        assert_eq!(reversed_count, 1);
        for &e in &[ab, ba] {
            let src_ports_has = g.port(g.edge(e).source()).outgoing().contains(&e);
            let dst_ports_has = g.port(g.edge(e).target()).incoming().contains(&e);
            assert!(src_ports_has && dst_ports_has);
        }
    }

    #[test]
    fn acyclic_graph_is_untouched() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let c = g.add_node(NodeType::Normal);
        edge(&mut g, a, b);
        edge(&mut g, b, c);

        run(&mut g);

        assert!(g.edges().all(|e| !e.reversed));
    }

    #[test]
    fn self_loop_is_never_reversed() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let out = g.add_port(a, PortSide::East, PortDirection::Output);
        let inp = g.add_port(a, PortSide::West, PortDirection::Input);
        let e = g.add_edge(out, inp).unwrap();

        run(&mut g);

        assert!(!g.edge(e).reversed);
    }
}
