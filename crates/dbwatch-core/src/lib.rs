//! Session timer state machine for dbwatch
//!
//! This crate is the heart of dbwatch, containing:
//! - The usage session value type and its pure `advance` step (Idle -> Running -> Idle)
//! - Warning and completion scheduling
//! - The monitor that folds poll results into the display model
//! - The poller that runs one probe-update-notify tick
//! - Time enforcement using monotonic time

mod events;
mod monitor;
mod poller;
mod session;

pub use events::*;
pub use monitor::*;
pub use poller::*;
pub use session::*;
