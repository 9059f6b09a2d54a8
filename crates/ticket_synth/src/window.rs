//! Date window and start/end date sampling rules.

use chrono::{NaiveDate, TimeDelta};
use rand::Rng;
use std::fmt;

/// Inclusive date range all generated tickets fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whole days from `start` to `end`; negative when the window is reversed.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// How start dates and durations are drawn from the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplingMode {
    /// Start offset in `[0, span]`, duration in `[0, remaining]`.
    /// Both dates stay inside the inclusive window.
    #[default]
    Uniform,
    /// Start offset in `[0, span - 1]` shifted one day earlier, duration in
    /// `[0, remaining - 1]`. Matches the first release of the tool draw for draw,
    /// so a start date may land one day before the window.
    Legacy,
}

impl SamplingMode {
    /// Draw a start date for a window spanning more than one day.
    pub(crate) fn start_date<R: Rng + ?Sized>(&self, window: &DateWindow, rng: &mut R) -> NaiveDate {
        let span = window.span_days();
        let offset = match self {
            SamplingMode::Uniform => rng.random_range(0..=span),
            SamplingMode::Legacy => rng.random_range(0..span) - 1,
        };
        window.start + TimeDelta::days(offset)
    }

    /// Draw a duration in days for a ticket starting on `start_date`.
    pub(crate) fn duration<R: Rng + ?Sized>(
        &self,
        start_date: NaiveDate,
        window: &DateWindow,
        rng: &mut R,
    ) -> i64 {
        let remaining = (window.end - start_date).num_days();
        match self {
            SamplingMode::Uniform => rng.random_range(0..=remaining),
            // start_date <= end - 2 in this mode, so the range is never empty
            SamplingMode::Legacy => rng.random_range(0..remaining),
        }
    }
}

impl std::str::FromStr for SamplingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(SamplingMode::Uniform),
            "legacy" => Ok(SamplingMode::Legacy),
            _ => Err(format!(
                "Unknown sampling mode: {}. Use uniform or legacy",
                s
            )),
        }
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingMode::Uniform => write!(f, "uniform"),
            SamplingMode::Legacy => write!(f, "legacy"),
        }
    }
}
