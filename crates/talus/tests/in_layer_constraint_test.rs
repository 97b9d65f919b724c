//! S4 (isolated nodes, in-layer constraints): three edgeless nodes land in a
//! single layer via C4, and C7 pins the BOTTOM/TOP-tagged ones to the ends.

use talus::{Graph, InLayerConstraint, LayoutConfig, NodeType, PhaseKind, Pipeline};

#[test]
fn isolated_nodes_share_one_layer_ordered_by_constraint() {
    let mut g = Graph::new(LayoutConfig::default());
    let a = g.add_node(NodeType::Normal);
    let b = g.add_node(NodeType::Normal);
    let c = g.add_node(NodeType::Normal);
    g.node_mut(b).in_layer_constraint = InLayerConstraint::Bottom;
    g.node_mut(c).in_layer_constraint = InLayerConstraint::Top;

    Pipeline::default().run_until(&mut g, PhaseKind::NodeOrdering).unwrap();

    assert_eq!(g.layer_count(), 1);
    assert_eq!(g.layer(talus::LayerId(0)).nodes(), &[c, a, b]);
}
