//! Capability traits for dbwatch
//!
//! This crate defines the interface between the session timer and the
//! outside world: something that reports database sessions, and something
//! that shows notifications. It contains no platform code itself.

mod mock;
mod traits;

pub use mock::*;
pub use traits::*;
