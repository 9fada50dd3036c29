//! Time source used for persisted timestamps.

use chrono::{DateTime, Utc};

/// Supplies the current instant for score entries, certificates, and
/// incentive recalculation stamps. Injected so tests can pin time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
