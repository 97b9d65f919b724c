//! Arena-indexed graph model for layered/orthogonal graph drawing.
//!
//! This crate owns the data model only: nodes, ports, edges, layers, and
//! the per-graph configuration and spacing table they're measured against.
//! The layout pipeline itself (cycle breaking, layering, crossing
//! minimization, node placement, edge routing) lives in the `talus` crate
//! and operates on a [`Graph`] by reference.

mod config;
mod edge;
mod enums;
mod error;
mod geometry;
mod graph;
mod ids;
mod layer;
mod node;
mod port;
mod rng;
mod spacings;

pub use config::LayoutConfig;
pub use edge::{Edge, EdgeLabel};
pub use enums::{
    EdgeRouting, FixedAlignment, HierarchyHandling, InLayerConstraint, LabelPlacement,
    LayerConstraint, NodeType, PortConstraints, PortDirection, PortSide,
};
pub use error::GraphError;
pub use geometry::{Margin, Point, Rect, Size};
pub use graph::{Graph, GraphProperties};
pub use ids::{EdgeId, LayerId, NodeId, PortId};
pub use layer::{Layer, LayerRef};
pub use node::{NestedGraphId, Node, SpacingOverride};
pub use port::Port;
pub use rng::Rng;
pub use spacings::{Spacing, SpacingDefaults, SpacingsTable};
