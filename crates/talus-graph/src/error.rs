//! Invariant-violation errors raised by the graph model's own mutators
//! (I1-I4). Pipeline-level errors (§7's Configuration/Budget kinds) live in
//! `talus::error` since they concern whole-pipeline phases, not single
//! mutations.

use crate::ids::{EdgeId, NodeId, PortId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0} is not a member of this graph")]
    UnknownNode(NodeId),

    #[error("port {0} is not a member of this graph")]
    UnknownPort(PortId),

    #[error("edge {0} is not a member of this graph")]
    UnknownEdge(EdgeId),

    #[error("edge {edge} thickness must be positive, got {thickness}")]
    NonPositiveThickness { edge: EdgeId, thickness: f64 },

    #[error("invariant {invariant} violated: {detail}")]
    InvariantViolation {
        invariant: &'static str,
        detail: String,
    },
}
