//! C6: layer-sweep crossing minimization.
//!
//! Split along the same lines as the reference's `order/` directory: one
//! file per concern, re-exported here for the pipeline controller to drive.

mod barycenter;
mod constraints;
mod cross_count;
mod hypercross;
mod port_distributor;
mod sweep;

pub use sweep::{minimize_crossings, use_bottom_up};
