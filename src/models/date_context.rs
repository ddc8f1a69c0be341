use chrono::{DateTime, Datelike, Month, Utc};
use chrono_tz::Tz;

/// Calendar day the history is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateContext {
    pub month: Month,
    pub day: u32,
}

impl DateContext {
    pub fn new(month: Month, day: u32) -> Self {
        Self { month, day }
    }

    pub fn from_instant(now: DateTime<Utc>, timezone: Tz) -> Self {
        let local = now.with_timezone(&timezone);
        // chrono's month() is always 1..=12.
        let month = Month::try_from(local.month() as u8).expect("calendar month in 1..=12");
        Self {
            month,
            day: local.day(),
        }
    }

    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn converts_to_configured_timezone() {
        let instant = Utc.with_ymd_and_hms(2024, 7, 21, 2, 30, 0).unwrap();
        let utc = DateContext::from_instant(instant, Tz::UTC);
        assert_eq!(utc, DateContext::new(Month::July, 21));

        let new_york = DateContext::from_instant(instant, chrono_tz::America::New_York);
        assert_eq!(new_york, DateContext::new(Month::July, 20));
    }

    #[test]
    fn month_name_is_english() {
        assert_eq!(DateContext::new(Month::October, 16).month_name(), "October");
    }
}
