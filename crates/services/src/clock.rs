use chrono::{Local, NaiveDateTime};

/// Source of "now" for reservation stamps and the future-date rule.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Server wall-clock time in the local timezone, matching how event dates
/// are entered and stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
