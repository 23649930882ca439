//! Dependency classification and aggregation engine.
//!
//! Given a milestone and the program it belongs to, the classifier
//! partitions the milestone's links into internal and external
//! dependencies against the program's team roster; the aggregators
//! reduce each partition to a compact per-team summary string; the
//! engine writes the summaries onto the milestone's direct children and
//! keeps them current as change notifications arrive.

#![warn(missing_docs)]

pub mod classify;
pub mod internal;
pub mod external;
pub mod engine;

pub use classify::{classify, LinkedWork, Partition};
pub use internal::compute_internal;
pub use external::{compute_external, ExternalRollup};
pub use engine::{DependencyEngine, EngineConfig};
