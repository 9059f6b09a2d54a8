//! DuckDB-backed reference store and ticket sink.

use super::{quote_ident, ReferenceStore, StoreError, TicketSink};
use duckdb::{params, Connection};
use std::path::{Path, PathBuf};
use ticket_synth::{Ticket, EVENT_LOG_COLUMNS};

/// Default event log table
pub const DEFAULT_EVENT_TABLE: &str = "EventLog";

/// Embedded DuckDB database holding the reference tables and the event log.
pub struct DuckDbStore {
    conn: Connection,
    path: PathBuf,
    insert_sql: String,
}

impl DuckDbStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Connection {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::from_connection(conn, path.to_path_buf())
    }

    /// Open a database file that must already exist
    pub fn open_existing(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::MissingDatabase(path.to_path_buf()));
        }
        Self::open(path)
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Connection {
            path: path.clone(),
            source,
        })?;
        Self::from_connection(conn, path)
    }

    fn from_connection(conn: Connection, path: PathBuf) -> Result<Self, StoreError> {
        Ok(Self {
            conn,
            path,
            insert_sql: insert_statement(DEFAULT_EVENT_TABLE)?,
        })
    }

    /// Insert tickets into `table` instead of [`DEFAULT_EVENT_TABLE`]
    pub fn with_event_table(mut self, table: &str) -> Result<Self, StoreError> {
        self.insert_sql = insert_statement(table)?;
        Ok(self)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying connection, for schema setup and inspection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of rows currently in `table`
    pub fn row_count(&self, table: &str) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table)?);
        self.conn
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .map_err(|source| StoreError::Query {
                table: table.to_string(),
                column: "*".to_string(),
                source,
            })
    }
}

/// Parameterized insert; dates and timestamps are bound as ISO strings and cast.
fn insert_statement(table: &str) -> Result<String, StoreError> {
    let columns = EVENT_LOG_COLUMNS
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, CAST(? AS DATE), CAST(? AS DATE), ?, CAST(? AS TIMESTAMP), ?, ?, ?)",
        quote_ident(table)?,
        columns
    ))
}

impl ReferenceStore for DuckDbStore {
    fn last_identifier(&self, table: &str, column: &str) -> Result<i64, StoreError> {
        let sql = format!(
            "SELECT CAST(COALESCE(MAX({}), 0) AS BIGINT) FROM {}",
            quote_ident(column)?,
            quote_ident(table)?
        );
        let id = self
            .conn
            .query_row(&sql, [], |row| row.get::<_, i64>(0))
            .map_err(|source| StoreError::Query {
                table: table.to_string(),
                column: column.to_string(),
                source,
            })?;
        tracing::debug!(table, column, id, "last identifier");
        Ok(id)
    }

    fn column_values(&self, table: &str, column: &str) -> Result<Vec<String>, StoreError> {
        let col = quote_ident(column)?;
        let sql = format!(
            "SELECT CAST({} AS VARCHAR) FROM {} WHERE {} IS NOT NULL",
            col,
            quote_ident(table)?,
            col
        );
        let query_error = |source: duckdb::Error| StoreError::Query {
            table: table.to_string(),
            column: column.to_string(),
            source,
        };

        let mut stmt = self.conn.prepare(&sql).map_err(query_error)?;
        let values = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;
        tracing::debug!(table, column, count = values.len(), "loaded vocabulary");
        Ok(values)
    }
}

impl TicketSink for DuckDbStore {
    fn insert(&mut self, ticket: &Ticket) -> Result<(), StoreError> {
        let insert_error = |source: duckdb::Error| StoreError::Insert {
            case_id: ticket.case_id.clone(),
            source: Box::new(source),
        };

        let mut stmt = self
            .conn
            .prepare_cached(&self.insert_sql)
            .map_err(insert_error)?;
        stmt.execute(params![
            ticket.case_id,
            ticket.activity,
            i32::from(ticket.urgency),
            i32::from(ticket.impact),
            i32::from(ticket.priority),
            ticket.start_date.format("%Y-%m-%d").to_string(),
            ticket.end_date.format("%Y-%m-%d").to_string(),
            ticket.status,
            ticket.update_timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            ticket.duration,
            ticket.origin,
            ticket.event_class,
        ])
        .map_err(insert_error)?;
        Ok(())
    }
}
