//! C7: in-layer constraint processor.
//!
//! Stable-sorts each layer by `{TOP: 0, NONE: 1, BOTTOM: 2}`
//! (`InLayerConstraint::sort_key`), breaking ties in existing order.
//! TOP/BOTTOM ordering *among* same-class nodes is left to C6's constraint
//! resolver, which already groups same-unit nodes and honours this key when
//! it re-sorts a layer (see `order::constraints`).

use talus_graph::{Graph, LayerId};

pub fn run(g: &mut Graph) {
    for i in 0..g.layer_count() {
        let layer = LayerId(i as u32);
        let mut nodes = g.layer(layer).nodes().to_vec();
        nodes.sort_by_key(|&n| g.node(n).in_layer_constraint.sort_key());
        g.reorder_layer(layer, nodes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_graph::{InLayerConstraint, LayoutConfig, NodeType};

    #[test]
    fn bottom_and_top_move_to_their_ends() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let c = g.add_node(NodeType::Normal);
        g.node_mut(b).in_layer_constraint = InLayerConstraint::Bottom;
        g.node_mut(c).in_layer_constraint = InLayerConstraint::Top;

        let l0 = g.push_layer();
        g.push_node_to_layer(a, l0);
        g.push_node_to_layer(b, l0);
        g.push_node_to_layer(c, l0);

        run(&mut g);

        assert_eq!(g.layer(l0).nodes(), &[c, a, b]);
    }

    #[test]
    fn unconstrained_layer_keeps_its_order() {
        let mut g = Graph::new(LayoutConfig::default());
        let a = g.add_node(NodeType::Normal);
        let b = g.add_node(NodeType::Normal);
        let l0 = g.push_layer();
        g.push_node_to_layer(a, l0);
        g.push_node_to_layer(b, l0);

        run(&mut g);

        assert_eq!(g.layer(l0).nodes(), &[a, b]);
    }
}
