//! Deterministic clock for tests.

use chrono::{DateTime, Utc};
use mercado_core::clock::Clock;

/// A clock frozen at the wrapped instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
