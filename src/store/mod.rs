//! Reference data access and ticket persistence.
//!
//! The seeder only talks to these two traits. [`DuckDbStore`] implements
//! both against an embedded DuckDB database; [`SqlScriptSink`] and
//! [`DryRunSink`] persist nowhere but a file or the terminal.

mod database;
mod dry_run;
mod script;

pub use database::{DuckDbStore, DEFAULT_EVENT_TABLE};
pub use dry_run::DryRunSink;
pub use script::SqlScriptSink;

use std::path::PathBuf;
use ticket_synth::Ticket;

/// Errors from the storage layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be opened
    #[error("cannot open database {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: duckdb::Error,
    },

    /// A database file was expected but does not exist
    #[error("database {} does not exist (run `incident-seeder init` first)", .0.display())]
    MissingDatabase(PathBuf),

    /// Reading reference data or the last identifier failed
    #[error("query on {table}.{column} failed: {source}")]
    Query {
        table: String,
        column: String,
        #[source]
        source: duckdb::Error,
    },

    /// Persisting one ticket failed
    #[error("insert of {case_id} failed: {source}")]
    Insert {
        case_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Schema setup failed
    #[error("schema setup failed: {0}")]
    Schema(#[source] duckdb::Error),

    /// A table or column name that cannot be safely quoted
    #[error("invalid identifier: {0:?} (use letters, digits and underscores)")]
    InvalidIdentifier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only access to reference vocabularies and existing identifiers.
pub trait ReferenceStore {
    /// Largest value of `column` in `table`, or 0 when the table is empty.
    fn last_identifier(&self, table: &str, column: &str) -> Result<i64, StoreError>;

    /// Every non-null value of `column` in `table`.
    fn column_values(&self, table: &str, column: &str) -> Result<Vec<String>, StoreError>;
}

/// Write-only destination for generated tickets, one at a time.
pub trait TicketSink {
    fn insert(&mut self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Flush anything buffered. Called once after the last ticket.
    fn finish(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Table and column names are spliced into SQL text, so only plain
/// identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}

/// Double-quote a validated identifier for DuckDB
pub(crate) fn quote_ident(name: &str) -> Result<String, StoreError> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("EventLog").is_ok());
        assert!(validate_identifier("_staging_2024").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("2024_log").is_err());
        assert!(validate_identifier("EventLog; DROP TABLE EventLog").is_err());
        assert!(validate_identifier("Event\"Log").is_err());
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("CaseID").unwrap(), "\"CaseID\"");
        assert!(matches!(
            quote_ident("a b"),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }
}
