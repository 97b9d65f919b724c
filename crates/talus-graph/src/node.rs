use crate::enums::{InLayerConstraint, LayerConstraint, NodeType, PortConstraints, PortSide};
use crate::geometry::{Margin, Point, Size};
use crate::ids::{LayerId, NodeId, PortId};
use serde::{Deserialize, Serialize};

/// Opaque handle to a node's nested sub-graph. Hierarchical recursive descent
/// is acknowledged by the data model (compound nodes carry one of these) but
/// its own layout is orthogonal to the core pipeline, so this crate does not
/// interpret the handle beyond storing and round-tripping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NestedGraphId(pub u32);

/// A node's individual override of the graph's spacings table (§6): when
/// present, these values are used in place of a table lookup for every
/// spacing query this node participates in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingOverride {
    pub horizontal: f64,
    pub vertical: f64,
}

/// A node in the layout graph.
///
/// Fields are a mix of permanent shape/identity state and algorithm-private
/// scratch (`in_degree`, `out_degree`, `mark`, `norm_height`,
/// `long_edge_source`/`target`) that different phases own in sequence; the
/// data model calls these out explicitly rather than hiding them behind a
/// side table, so later phases (e.g. the long-edge joiner reading
/// `long_edge_source`/`target`) can depend on them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    pub layer: Option<LayerId>,
    pub(crate) ports: [Vec<PortId>; 4],

    pub node_type: NodeType,
    pub layering_constraint: LayerConstraint,
    pub in_layer_constraint: InLayerConstraint,
    pub port_constraints: PortConstraints,

    pub position: Point,
    pub size: Size,
    pub margin: Margin,
    pub anchor: Point,

    pub nested_graph: Option<NestedGraphId>,
    pub origin: Option<u64>,
    pub spacing_override: Option<SpacingOverride>,

    /// The node that must move together with this one during in-layer
    /// sorting; defaults to the node's own id.
    pub in_layer_layout_unit: NodeId,

    /// Side of a compound node's boundary this external-port dummy
    /// represents, if `node_type == ExternalPort`.
    pub external_port_side: Option<PortSide>,

    // Cycle breaker (C3) scratch.
    pub in_degree: usize,
    pub out_degree: usize,
    pub mark: i64,

    // Layerer (C4) scratch.
    pub norm_height: f64,

    // Long-edge splitter (C5) / joiner (C10) state.
    pub long_edge_source: Option<NodeId>,
    pub long_edge_target: Option<NodeId>,
    pub has_label_dummies: bool,
}

impl Node {
    pub(crate) fn new(id: NodeId, node_type: NodeType) -> Self {
        Self {
            id,
            layer: None,
            ports: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
            node_type,
            layering_constraint: LayerConstraint::default(),
            in_layer_constraint: InLayerConstraint::default(),
            port_constraints: PortConstraints::default(),
            position: Point::ZERO,
            size: Size::default(),
            margin: Margin::default(),
            anchor: Point::ZERO,
            nested_graph: None,
            origin: None,
            spacing_override: None,
            in_layer_layout_unit: id,
            external_port_side: None,
            in_degree: 0,
            out_degree: 0,
            mark: 0,
            norm_height: 1.0,
            long_edge_source: None,
            long_edge_target: None,
            has_label_dummies: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn ports_on(&self, side: PortSide) -> &[PortId] {
        &self.ports[side.index()]
    }

    /// Ports in clockwise order starting at North: N, E, S, W.
    pub fn iter_ports(&self) -> impl Iterator<Item = PortId> + '_ {
        PortSide::CLOCKWISE.iter().flat_map(move |s| self.ports[s.index()].iter().copied())
    }

    /// Ports in reverse clockwise order: reversed W, reversed S, reversed E,
    /// reversed N (mirrors the reference's `iterPortsReversed`).
    pub fn iter_ports_reversed(&self) -> impl Iterator<Item = PortId> + '_ {
        [PortSide::West, PortSide::South, PortSide::East, PortSide::North]
            .into_iter()
            .flat_map(move |s| self.ports[s.index()].iter().rev().copied())
    }
}
