//! Spacings table (§6): minimum horizontal/vertical separation required
//! between two nodes, keyed by their [`NodeType`] pair.
//!
//! The reference implementation (`containers/spacings.py`) has three
//! same-named helper methods of differing arity that shadow each other at
//! definition time (O2). The four distinctly-named methods below implement
//! the intent instead: one intra-type helper for vertical-only, one for both
//! axes, and the inter-type equivalents.

use crate::enums::NodeType;
use crate::node::{Node, SpacingOverride};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

const N: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacingsTable {
    horizontal: [[f64; N]; N],
    vertical: [[f64; N]; N],
}

/// Global spacing defaults, named after the reference's `LayeredOptions`
/// constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingDefaults {
    pub node_node: f64,
    pub node_node_between_layers: f64,
    pub edge_edge: f64,
    pub edge_edge_between_layers: f64,
    pub edge_node: f64,
    pub edge_node_between_layers: f64,
    pub label_node: f64,
    pub label_port: f64,
    pub port_port: f64,
}

impl Default for SpacingDefaults {
    fn default() -> Self {
        Self {
            node_node: 20.0,
            node_node_between_layers: 20.0,
            edge_edge: 10.0,
            edge_edge_between_layers: 10.0,
            edge_node: 10.0,
            edge_node_between_layers: 10.0,
            label_node: 5.0,
            label_port: 2.0,
            port_port: 10.0,
        }
    }
}

impl SpacingsTable {
    pub fn new(d: SpacingDefaults) -> Self {
        let mut t = Self {
            horizontal: [[0.0; N]; N],
            vertical: [[0.0; N]; N],
        };

        use NodeType::*;

        t.set_intra(Normal, d.node_node, d.node_node_between_layers);
        t.set_inter(Normal, LongEdge, d.edge_node, d.edge_node_between_layers);
        t.set_inter_vertical(Normal, NorthSouthPort, d.edge_node);
        t.set_inter_vertical(Normal, ExternalPort, d.edge_node);
        t.set_inter(Normal, Label, d.node_node, d.node_node_between_layers);
        t.set_inter(Normal, BigNode, d.node_node, d.node_node_between_layers);

        t.set_intra(LongEdge, d.edge_edge, d.edge_edge_between_layers);
        t.set_inter_vertical(LongEdge, NorthSouthPort, d.edge_edge);
        t.set_inter_vertical(LongEdge, ExternalPort, d.edge_edge);
        t.set_inter(LongEdge, Label, d.edge_node, d.edge_node_between_layers);
        t.set_inter(LongEdge, BigNode, d.edge_node, d.edge_node_between_layers);

        t.set_intra_vertical(NorthSouthPort, d.edge_edge);
        t.set_inter_vertical(NorthSouthPort, ExternalPort, d.edge_edge);
        t.set_inter_vertical(NorthSouthPort, Label, d.label_node);
        t.set_inter_vertical(NorthSouthPort, BigNode, d.edge_node);

        t.set_intra_vertical(ExternalPort, d.port_port);
        t.set_inter_vertical(ExternalPort, Label, d.label_port);
        t.set_inter_vertical(ExternalPort, BigNode, d.port_port);

        t.set_intra(Label, d.edge_edge, d.edge_edge);
        t.set_inter_vertical(Label, BigNode, d.edge_node);

        t.set_intra(BigNode, d.node_node, d.node_node_between_layers);

        t.set_intra(BreakingPoint, d.edge_edge, d.edge_edge_between_layers);
        t.set_inter(BreakingPoint, Normal, d.edge_node, d.edge_node_between_layers);
        t.set_inter(BreakingPoint, LongEdge, d.edge_node, d.edge_node_between_layers);

        t
    }

    fn set_intra_vertical(&mut self, nt: NodeType, vertical: f64) {
        let i = nt.index();
        self.vertical[i][i] = vertical;
    }

    fn set_intra(&mut self, nt: NodeType, vertical: f64, horizontal: f64) {
        let i = nt.index();
        self.vertical[i][i] = vertical;
        self.horizontal[i][i] = horizontal;
    }

    fn set_inter_vertical(&mut self, a: NodeType, b: NodeType, vertical: f64) {
        let (i, j) = (a.index(), b.index());
        self.vertical[i][j] = vertical;
        self.vertical[j][i] = vertical;
    }

    fn set_inter(&mut self, a: NodeType, b: NodeType, vertical: f64, horizontal: f64) {
        let (i, j) = (a.index(), b.index());
        self.vertical[i][j] = vertical;
        self.vertical[j][i] = vertical;
        self.horizontal[i][j] = horizontal;
        self.horizontal[j][i] = horizontal;
    }

    /// Minimum vertical separation required between two nodes of the same
    /// type.
    pub fn intra_vertical(&self, t: NodeType) -> f64 {
        self.vertical[t.index()][t.index()]
    }

    /// Minimum separation (both axes) required between two nodes of the
    /// same type.
    pub fn intra(&self, t: NodeType) -> Spacing {
        Spacing {
            horizontal: self.horizontal[t.index()][t.index()],
            vertical: self.vertical[t.index()][t.index()],
        }
    }

    /// Minimum vertical separation required between nodes of two different
    /// types.
    pub fn inter_vertical(&self, a: NodeType, b: NodeType) -> f64 {
        self.vertical[a.index()][b.index()]
    }

    /// Minimum separation (both axes) required between nodes of two
    /// different types.
    pub fn inter(&self, a: NodeType, b: NodeType) -> Spacing {
        Spacing {
            horizontal: self.horizontal[a.index()][b.index()],
            vertical: self.vertical[a.index()][b.index()],
        }
    }

    fn individual_or_default(node: &Node, table_value: Spacing) -> Spacing {
        match node.spacing_override {
            Some(SpacingOverride { horizontal, vertical }) => Spacing { horizontal, vertical },
            None => table_value,
        }
    }

    /// `max(spacing(n1), spacing(n2))` on both axes, honoring either node's
    /// individual override.
    pub fn effective(&self, n1: &Node, n2: &Node) -> Spacing {
        let table = if n1.node_type.index() == n2.node_type.index() {
            self.intra(n1.node_type)
        } else {
            self.inter(n1.node_type, n2.node_type)
        };
        let s1 = Self::individual_or_default(n1, table);
        let s2 = Self::individual_or_default(n2, table);
        Spacing {
            horizontal: s1.horizontal.max(s2.horizontal),
            vertical: s1.vertical.max(s2.vertical),
        }
    }
}

impl Default for SpacingsTable {
    fn default() -> Self {
        Self::new(SpacingDefaults::default())
    }
}
