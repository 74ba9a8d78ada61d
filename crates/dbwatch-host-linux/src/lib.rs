//! Linux desktop integration for dbwatch
//!
//! Notifications go through the freedesktop notification service via
//! `notify-send`. Hosts without it fall back to the log.

mod notify;

pub use notify::*;
