//! C8: node placement.

mod bk;

pub use bk::run;
