use chrono::{DateTime, Utc};
use std::time::Instant;

/// Time sources, swappable in tests.
///
/// `now` is wall time and jumps when the system clock is corrected.
/// `monotonic` never goes backwards and is what event spacing is measured on.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn monotonic(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic(&self) -> Instant {
        Instant::now()
    }
}
