use chrono::NaiveDate;

/// Source of "today". Only the HTTP layer asks for it; everything below
/// takes dates as arguments.
pub trait Clock: Send + Sync + 'static {
    fn today(&self) -> NaiveDate;
}

/// The server's local calendar date.
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always the same date. Used by tests.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
