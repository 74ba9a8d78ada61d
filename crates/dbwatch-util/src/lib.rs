//! Shared utilities for dbwatch
//!
//! This crate provides:
//! - ID types (SessionId, DbSessionId)
//! - Time utilities (monotonic time, duration formatting)
//! - Default paths for config and log files

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
