//! Layered/orthogonal graph drawing pipeline built on `talus_graph`.
//!
//! Five phases, run once each in order: cycle-breaking (C2 reverser + C3
//! greedy acyclic ordering), layering (C4 MinWidth + C5 long-edge
//! splitting), node-ordering (C6 layer-sweep crossing minimization + C7
//! in-layer constraints), node-placement (C8 Brandes-Kopf), edge-routing (C9
//! orthogonal router + C10 long-edge joiner). [`pipeline::layout`] runs the
//! stock configuration; [`pipeline::Pipeline`] exposes the phase/processor
//! structure for callers who need to extend it.

pub mod error;

mod cycle_breaker;
mod in_layer;
mod layerer;
mod normalize;
mod order;
mod pipeline;
mod position;
mod reverser;
mod routing;

pub use error::LayoutError;
pub use pipeline::{layout, Budget, ConfigLoader, Pipeline, PhaseKind, Processor, Slot};

pub use talus_graph::{
    Edge, EdgeId, EdgeLabel, EdgeRouting, FixedAlignment, Graph, GraphError, GraphProperties,
    HierarchyHandling, InLayerConstraint, LabelPlacement, Layer, LayerConstraint, LayerId,
    LayoutConfig, Margin, NestedGraphId, Node, NodeId, NodeType, Point, Port, PortConstraints,
    PortDirection, PortId, PortSide, Rect, Rng, Size, Spacing, SpacingDefaults, SpacingOverride,
    SpacingsTable,
};
