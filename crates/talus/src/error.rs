//! Pipeline-level errors (§7). Single-mutation invariant errors raised by
//! the graph model itself live in `talus_graph::GraphError`; this enum
//! covers whole-phase failures the controller can surface to a caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// A node/edge/port configuration the pipeline cannot normalise, e.g. a
    /// FIRST-constrained node with an incident edge that cannot be
    /// reoriented without violating the other endpoint's own constraint, or
    /// a non-positive edge thickness. Non-recoverable: the pipeline aborts
    /// and returns this before running the offending phase.
    #[error("unsupported configuration: {0}")]
    Configuration(String),

    /// A post-condition (I1..I9) failed. Only raised when built with
    /// `debug_assertions`; release builds skip these checks per §7.
    #[error("invariant {invariant} violated: {detail}")]
    InvariantViolation {
        invariant: &'static str,
        detail: String,
    },

    /// The caller-supplied step budget was exhausted at a phase boundary
    /// (§4.11 supplemental). Whatever phases completed remain in the graph;
    /// there is no transactional rollback.
    #[error("layout budget exhausted before phase {phase}")]
    BudgetExhausted { phase: &'static str },

    #[error(transparent)]
    Graph(#[from] talus_graph::GraphError),
}
