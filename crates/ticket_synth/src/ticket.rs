//! The generated incident ticket.

use crate::value::SqlValue;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Event log columns, in the order [`Ticket::values`] yields them.
pub const EVENT_LOG_COLUMNS: [&str; 12] = [
    "CaseID",
    "Activity",
    "Urgency",
    "Impact",
    "Priority",
    "StartDate",
    "EndDate",
    "TicketStatus",
    "UpdateDateTime",
    "Duration",
    "Origin",
    "Class",
];

/// One synthetic incident record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub case_id: String,
    pub activity: String,
    pub urgency: u8,
    pub impact: u8,
    /// Always `urgency + impact - 1`
    pub priority: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub update_timestamp: NaiveDateTime,
    /// Days from `start_date` to `end_date`
    pub duration: i64,
    pub origin: String,
    pub event_class: String,
}

impl Ticket {
    /// Column values matching [`EVENT_LOG_COLUMNS`]
    pub fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.case_id.clone()),
            SqlValue::Text(self.activity.clone()),
            SqlValue::Int(i64::from(self.urgency)),
            SqlValue::Int(i64::from(self.impact)),
            SqlValue::Int(i64::from(self.priority)),
            SqlValue::Date(self.start_date),
            SqlValue::Date(self.end_date),
            SqlValue::Text(self.status.clone()),
            SqlValue::Timestamp(self.update_timestamp),
            SqlValue::Int(self.duration),
            SqlValue::Text(self.origin.clone()),
            SqlValue::Text(self.event_class.clone()),
        ]
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} P{} (U{}/I{}) {}..{} ({}d) {} via {} [{}] updated {}",
            self.case_id,
            self.activity,
            self.priority,
            self.urgency,
            self.impact,
            self.start_date,
            self.end_date,
            self.duration,
            self.status,
            self.origin,
            self.event_class,
            self.update_timestamp.format("%Y-%m-%d %H:%M"),
        )
    }
}
