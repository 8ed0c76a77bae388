//! Natural-language date and time lookup tables.
//!
//! The dialogue engine hands over whatever the user typed. These parsers
//! recognize a small fixed set of forms and pass everything else through
//! verbatim; the store compares the literals as text either way.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use thiserror::Error;

/// Year the fixed month table resolves into.
pub const MOVE_IN_TARGET_YEAR: i32 = 2025;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NlParseError {
    #[error("could not parse tour date: {0}")]
    Date(String),
    #[error("could not parse tour time: {0}")]
    Time(String),
}

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Deterministic clock for tests and replayable smoke runs.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Move-in hints: two month names resolve to the first of that month in the
/// target year; any other literal passes through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveInMonthTable;

impl MoveInMonthTable {
    pub fn resolve(&self, hint: &str) -> String {
        match hint.trim().to_ascii_lowercase().as_str() {
            "july" => format!("{MOVE_IN_TARGET_YEAR}-07-01"),
            "august" => format!("{MOVE_IN_TARGET_YEAR}-08-01"),
            _ => hint.to_string(),
        }
    }
}

/// Tour dates: `tomorrow` and `next week` resolve against the injected
/// clock; anything else is assumed to already be a canonical date.
#[derive(Clone)]
pub struct RelativeDateParser {
    clock: Arc<dyn Clock>,
}

impl RelativeDateParser {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn resolve(&self, literal: &str) -> Result<String, NlParseError> {
        let resolved = match literal.trim().to_ascii_lowercase().as_str() {
            "tomorrow" => (self.clock.today() + Duration::days(1)).format("%Y-%m-%d").to_string(),
            "next week" => (self.clock.today() + Duration::days(7)).format("%Y-%m-%d").to_string(),
            _ => literal.to_string(),
        };
        Ok(resolved)
    }
}

/// Tour times: a trailing `am`/`pm` marker with an optional minute component
/// is normalized to 24-hour form (`12am` wraps to `00`, `12pm` stays `12`).
/// Literals without a marker are assumed to already be canonical.
pub fn normalize_tour_time(literal: &str) -> Result<String, NlParseError> {
    let lowered = literal.trim().to_ascii_lowercase();

    if let Some(body) = lowered.strip_suffix("pm") {
        return to_24_hour(body.trim(), Meridiem::Pm)
            .ok_or_else(|| NlParseError::Time(literal.to_string()));
    }
    if let Some(body) = lowered.strip_suffix("am") {
        return to_24_hour(body.trim(), Meridiem::Am)
            .ok_or_else(|| NlParseError::Time(literal.to_string()));
    }

    Ok(literal.to_string())
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

fn to_24_hour(body: &str, meridiem: Meridiem) -> Option<String> {
    let mut parts = body.splitn(2, ':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minutes = parts.next().map(str::trim);

    let hour = match meridiem {
        Meridiem::Am if hour == 12 => 0,
        Meridiem::Am => hour,
        Meridiem::Pm if hour == 12 => 12,
        Meridiem::Pm => hour + 12,
    };

    Some(format!("{hour:02}:{}", minutes.unwrap_or("00")))
}
