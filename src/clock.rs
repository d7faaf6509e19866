use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};

/// The instant every aggregator treats as "now".
///
/// Analytics never read the system clock themselves; callers capture one
/// `Clock` per build so "today" cannot drift between aggregators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<FixedOffset>,
}

impl Clock {
    pub fn system() -> Self {
        Self {
            now: Local::now().fixed_offset(),
        }
    }

    pub fn fixed(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    /// Calendar date in the clock's own offset.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}
