//! Time source abstraction.

use chrono::{DateTime, Utc};

/// Supplies "now" to code that stamps records.
///
/// Production code uses [`SystemClock`]; tests inject deterministic clocks so
/// that ordering by timestamp is reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}
