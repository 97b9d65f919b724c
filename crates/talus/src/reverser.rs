//! C2: edge & layer-constraint reverser.
//!
//! Normalises edge direction around nodes pinned to FIRST/LAST layers, and
//! around fixed-port-side nodes whose net port flow indicates they sit
//! backwards relative to the rest of the graph.

use rustc_hash::FxHashSet;
use talus_graph::{EdgeId, Graph, LayerConstraint, NodeId, PortSide};

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Out,
    In,
}

fn desired_direction(c: LayerConstraint) -> Option<Dir> {
    match c {
        LayerConstraint::First | LayerConstraint::FirstSeparate => Some(Dir::Out),
        LayerConstraint::Last | LayerConstraint::LastSeparate => Some(Dir::In),
        LayerConstraint::None => None,
    }
}


fn incident_edges(g: &Graph, node: NodeId) -> Vec<EdgeId> {
    let mut out = Vec::new();
    for &side in &PortSide::CLOCKWISE {
        for &port in g.node(node).ports_on(side) {
            out.extend(g.port(port).incoming().iter().copied());
            out.extend(g.port(port).outgoing().iter().copied());
        }
    }
    out
}

/// Reverses `e` unless doing so would leave the edge's other endpoint
/// (relative to `node`) violating its own desired direction — accepted as
/// is per §4.2's example (an incoming edge to a FIRST node from a
/// FIRST_SEPARATE node keeps its direction). Returns whether the edge was
/// reversed; fails with `LayoutError::Configuration` for a self-loop on a
/// node whose constraint it mismatches, since a self-loop can't be
/// reoriented into matching it by any reversal (§4.2: "a constrained node
/// has a forbidden incident edge that cannot be normalised").
fn try_reverse_respecting_other(g: &mut Graph, node: NodeId, e: EdgeId) -> Result<bool, LayoutError> {
    let (src, dst) = (g.edge(e).source_node(), g.edge(e).target_node());
    if src == dst {
        return Err(LayoutError::Configuration(format!(
            "node {node:?}'s layering constraint cannot be satisfied: self-loop edge {e:?} \
             has no valid direction"
        )));
    }
    let node_is_source = src == node;
    let current_dir_of_node = if node_is_source { Dir::Out } else { Dir::In };
    let other = if node_is_source { dst } else { src };

    if let Some(other_desired) = desired_direction(g.node(other).layering_constraint) {
        // After reversal, `other`'s relative direction becomes what `node`'s
        // direction was before reversal.
        if other_desired != current_dir_of_node {
            return Ok(false);
        }
    }

    g.reverse_edge(e);
    Ok(true)
}

/// For every node pinned to FIRST/FIRST_SEPARATE (all incident edges should
/// be outgoing) or LAST/LAST_SEPARATE (all incoming), reverses the edges
/// that don't already match, skipping any whose other endpoint has a
/// conflicting constraint of its own.
pub fn normalize_layer_constraint_edges(g: &mut Graph) -> Result<(), LayoutError> {
    let nodes: Vec<NodeId> = g.node_ids().collect();
    for node in nodes {
        let Some(desired) = desired_direction(g.node(node).layering_constraint) else {
            continue;
        };
        let edges = incident_edges(g, node);
        let mut seen = FxHashSet::default();
        for e in edges {
            if !seen.insert(e) || !g.is_edge_alive(e) {
                continue;
            }
            let src = g.edge(e).source_node();
            let current = if src == node { Dir::Out } else { Dir::In };
            if current == desired {
                continue;
            }
            try_reverse_respecting_other(g, node, e)?;
        }
    }
    Ok(())
}

/// For a fixed-port-side node whose EAST ports all have positive net flow
/// (more incoming than outgoing) and whose WEST ports all have negative net
/// flow, the node sits backwards; reverse every incident edge that doesn't
/// conflict with an adjacent node's own layer constraint.
pub fn normalize_feedback_orientation(g: &mut Graph) -> Result<(), LayoutError> {
    let nodes: Vec<NodeId> = g.node_ids().collect();
    for node in nodes {
        if !g.node(node).port_constraints.is_side_fixed() {
            continue;
        }
        let east: Vec<_> = g.node(node).ports_on(PortSide::East).to_vec();
        let west: Vec<_> = g.node(node).ports_on(PortSide::West).to_vec();
        if east.is_empty() && west.is_empty() {
            continue;
        }
        let east_ok = east.iter().all(|&p| g.port(p).net_flow() > 0);
        let west_ok = west.iter().all(|&p| g.port(p).net_flow() < 0);
        if !east_ok || !west_ok {
            continue;
        }

        let edges = incident_edges(g, node);
        let mut seen = FxHashSet::default();
        for e in edges {
            if !seen.insert(e) || !g.is_edge_alive(e) {
                continue;
            }
            try_reverse_respecting_other(g, node, e)?;
        }
    }
    Ok(())
}

pub fn run(g: &mut Graph) -> Result<(), LayoutError> {
    normalize_layer_constraint_edges(g)?;
    normalize_feedback_orientation(g)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{LayoutConfig, NodeType, PortDirection};

    fn edge_between(g: &mut Graph, a: NodeId, b: NodeId) -> EdgeId {
        let pa = g.add_port(a, PortSide::East, PortDirection::Output);
        let pb = g.add_port(b, PortSide::West, PortDirection::Input);
        g.add_edge(pa, pb).unwrap()
    }

    #[test]
    fn first_node_with_incoming_edge_is_reversed() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let first = g.add_node(NodeType::Normal);
        g.node_mut(first).layering_constraint = LayerConstraint::First;
        let e = edge_between(&mut g, a, first);

        run(&mut g).unwrap();

        assert_eq!(g.edge(e).source_node(), first);
        assert_eq!(g.edge(e).target_node(), a);
    }

    #[test]
    fn two_first_nodes_leave_edge_as_is() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        g.node_mut(a).layering_constraint = LayerConstraint::First;
        g.node_mut(b).layering_constraint = LayerConstraint::FirstSeparate;
        let e = edge_between(&mut g, a, b);

        run(&mut g).unwrap();

        // a wants Out (already true: a is source), b wants Out too but is
        // the target; reversing would make a the target, violating a's own
        // constraint, so nothing changes.
        assert_eq!(g.edge(e).source_node(), a);
        assert_eq!(g.edge(e).target_node(), b);
    }

    #[test]
    fn last_node_with_unresolvable_self_loop_reports_configuration_error() {
        let mut g = Graph::new(LayoutConfig::default());
        let last = g.add_node(NodeType::Normal);
        g.node_mut(last).layering_constraint = LayerConstraint::Last;
        let p_out = g.add_port(last, PortSide::East, PortDirection::Output);
        let p_in = g.add_port(last, PortSide::West, PortDirection::Input);
        g.add_edge(p_out, p_in).unwrap();

        let err = run(&mut g).unwrap_err();
        assert!(matches!(err, LayoutError::Configuration(_)));
    }
}
