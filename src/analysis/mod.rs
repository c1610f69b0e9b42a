//! Analysis modules.
//!
//! `pipeline` holds the report's aggregation views; `stats` the
//! numeric building blocks they share.

pub mod pipeline;
pub mod stats;

pub use pipeline::*;
