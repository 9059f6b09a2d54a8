//! Schema bootstrap for an empty DuckDB database.
//!
//! Creates the four reference tables and the event log named in the
//! configuration. The event log `ID` is fed by a sequence so that case
//! numbers can continue from the largest existing ID across runs.

use crate::config::SeederConfig;
use crate::store::{quote_ident, StoreError};
use duckdb::{params, Connection};
use ticket_synth::VocabularyKind;

/// Starter vocabularies used by `init --with-reference-data`
pub fn default_reference_data(kind: VocabularyKind) -> &'static [&'static str] {
    match kind {
        VocabularyKind::Activity => &[
            "Assign",
            "Investigate",
            "Escalate",
            "Wait for Customer",
            "Resolve",
            "Close",
            "Reopen",
        ],
        VocabularyKind::Origin => &["Phone", "Email", "Web Portal", "Chat", "Walk-in"],
        VocabularyKind::Status => &["Open", "In Progress", "Pending", "Resolved", "Closed"],
        VocabularyKind::Class => &["Incident", "Service Request", "Problem", "Change"],
    }
}

/// What `create_schema` did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    /// Reference tables that received starter rows
    pub populated: Vec<String>,
    /// Rows inserted across all reference tables
    pub rows_inserted: usize,
}

/// Create missing tables; with `with_reference_data`, fill empty reference tables.
pub fn create_schema(
    conn: &Connection,
    config: &SeederConfig,
    with_reference_data: bool,
) -> Result<SchemaReport, StoreError> {
    let mut report = SchemaReport::default();

    for kind in VocabularyKind::ALL {
        let reference = config.reference(kind);
        let table = quote_ident(&reference.table)?;
        let column = quote_ident(&reference.column)?;

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({} VARCHAR NOT NULL)",
            table, column
        ))
        .map_err(StoreError::Schema)?;

        if !with_reference_data {
            continue;
        }

        let existing: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .map_err(StoreError::Schema)?;
        if existing > 0 {
            tracing::info!(table = %reference.table, existing, "reference table already populated");
            continue;
        }

        let mut stmt = conn
            .prepare(&format!("INSERT INTO {} ({}) VALUES (?)", table, column))
            .map_err(StoreError::Schema)?;
        for value in default_reference_data(kind) {
            stmt.execute(params![value]).map_err(StoreError::Schema)?;
            report.rows_inserted += 1;
        }
        report.populated.push(reference.table.clone());
    }

    create_event_log(conn, config)?;
    Ok(report)
}

fn create_event_log(conn: &Connection, config: &SeederConfig) -> Result<(), StoreError> {
    let log = &config.event_log;
    let table = quote_ident(&log.table)?;
    let id = quote_ident(&log.id_column)?;
    // both parts are validated identifiers, so the name is safe inside a literal
    let sequence = format!("{}_{}_seq", log.table, log.id_column).to_lowercase();

    conn.execute_batch(&format!(
        "CREATE SEQUENCE IF NOT EXISTS {seq} START 1;
         CREATE TABLE IF NOT EXISTS {table} (
             {id} BIGINT PRIMARY KEY DEFAULT nextval('{seq}'),
             \"CaseID\" VARCHAR NOT NULL,
             \"Activity\" VARCHAR,
             \"Urgency\" INTEGER,
             \"Impact\" INTEGER,
             \"Priority\" INTEGER,
             \"StartDate\" DATE,
             \"EndDate\" DATE,
             \"TicketStatus\" VARCHAR,
             \"UpdateDateTime\" TIMESTAMP,
             \"Duration\" INTEGER,
             \"Origin\" VARCHAR,
             \"Class\" VARCHAR
         );",
        seq = sequence,
        table = table,
        id = id,
    ))
    .map_err(StoreError::Schema)
}
