//! Shared domain types for dbwatch
//!
//! This crate defines the types that cross crate boundaries:
//! - Database session rows reported by a probe
//! - The activity signal fed to the session timer
//! - Warning thresholds
//! - The display model rendered by front-ends

mod display;
mod types;

pub use display::*;
pub use types::*;

/// Program name reported when no session (or no program name) is available
pub const UNKNOWN_PROGRAM: &str = "Unknown";
