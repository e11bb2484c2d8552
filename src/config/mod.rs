//! Configuration management for netvis.
//!
//! Provides XDG-compliant settings storage. Command-line flags and
//! `NETVIS_*` environment variables take precedence over the file.

mod settings;

pub use settings::{AppSettings, Paths};
