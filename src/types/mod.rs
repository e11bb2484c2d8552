//! Core type definitions using newtype patterns for type safety.
//!
//! These types validate operator input once, up front, so the scanning
//! engine only ever sees well-formed ports, targets and windows.

mod port;
mod target;
mod window;

pub use port::{Port, PortError, PortSelection};
pub use target::{expand_targets, HostRange, TargetError, TargetSpec};
pub use window::{ScanWindow, WindowError};
