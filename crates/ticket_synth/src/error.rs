//! Synthesis error types.

use crate::vocabulary::VocabularyKind;
use chrono::NaiveDate;

/// Precondition failures detected before any ticket is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    /// A negative number of tickets was requested.
    #[error("ticket count must not be negative (got {0})")]
    NegativeCount(i64),

    /// The window is too short to sample a start date and a duration from.
    #[error("date window {start} .. {end} must span more than one day")]
    InvalidDateWindow {
        /// First day of the requested window.
        start: NaiveDate,
        /// Last day of the requested window.
        end: NaiveDate,
    },

    /// A reference vocabulary has no entries to draw from.
    #[error("{0} vocabulary is empty")]
    EmptyVocabulary(VocabularyKind),
}
