//! Time-of-day gate consulted before new probe work is issued.

use crate::types::ScanWindow;
use chrono::{Local, NaiveTime};
use std::sync::Arc;

/// Source of the current wall-clock time of day.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// The local system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// A clock frozen at one time of day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// Answers whether probing is currently permitted.
#[derive(Clone)]
pub struct TimeWindowGate {
    window: ScanWindow,
    clock: Arc<dyn Clock>,
}

impl TimeWindowGate {
    /// Gate driven by the local system clock.
    pub fn new(window: ScanWindow) -> Self {
        Self::with_clock(window, Arc::new(SystemClock))
    }

    pub fn with_clock(window: ScanWindow, clock: Arc<dyn Clock>) -> Self {
        Self { window, clock }
    }

    pub fn is_open(&self) -> bool {
        self.window.contains(self.clock.now())
    }

    pub fn window(&self) -> ScanWindow {
        self.window
    }
}

impl std::fmt::Debug for TimeWindowGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeWindowGate")
            .field("window", &self.window.to_string())
            .finish()
    }
}
