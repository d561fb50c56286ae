use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Source of "today" for date-relative rules.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

pub type DynClock = Arc<dyn Clock + Send + Sync>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
