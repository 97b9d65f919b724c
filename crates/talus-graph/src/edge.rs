use crate::enums::LabelPlacement;
use crate::geometry::{Point, Size};
use crate::ids::{EdgeId, NodeId, PortId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLabel {
    pub placement: LabelPlacement,
    pub size: Size,
    pub offset: Option<Point>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub(crate) id: EdgeId,
    pub(crate) source: PortId,
    pub(crate) target: PortId,
    pub(crate) source_node: NodeId,
    pub(crate) target_node: NodeId,

    pub reversed: bool,
    pub self_loop: bool,

    /// Non-negative: raises the incentive to draw this edge straight.
    pub priority: u32,
    /// Positive; mutate only via [`crate::Graph::set_edge_thickness`], which
    /// rejects non-positive values per §7.
    pub(crate) thickness: f64,

    pub labels: Vec<EdgeLabel>,
    pub bend_points: Vec<Point>,
    pub junction_points: Vec<Point>,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        source: PortId,
        target: PortId,
        source_node: NodeId,
        target_node: NodeId,
    ) -> Self {
        Self {
            id,
            source,
            target,
            source_node,
            target_node,
            reversed: false,
            self_loop: source_node == target_node,
            priority: 0,
            thickness: 1.0,
            labels: Vec::new(),
            bend_points: Vec::new(),
            junction_points: Vec::new(),
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> PortId {
        self.source
    }

    pub fn target(&self) -> PortId {
        self.target
    }

    pub fn source_node(&self) -> NodeId {
        self.source_node
    }

    pub fn target_node(&self) -> NodeId {
        self.target_node
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }
}
