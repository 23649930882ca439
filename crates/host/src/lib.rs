//! Host abstraction and reference backend for teamdeps.
//!
//! The engine consumes its environment through the [`Host`] trait: item
//! resolution, program discovery, the team-membership oracle, and the
//! two write effects (custom fields, the needs-attention flag). The
//! [`MemoryHost`] backend keeps the whole hierarchy in process and is
//! what the CLI and the engine tests run against.

#![warn(missing_docs)]

pub mod trait_;
pub mod memory;
pub mod snapshot;
pub mod config;

pub use trait_::{Host, HostError, Result};
pub use memory::{MemoryHost, ALERT_COLOR};
pub use snapshot::{GroupSnapshot, ItemKind, ItemSnapshot, Portfolio};
pub use config::RosterConfig;
