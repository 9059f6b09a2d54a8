//! SQL script output: one `INSERT` per ticket, for loading elsewhere.

use super::{validate_identifier, StoreError, TicketSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use ticket_synth::{render_insert, Dialect, Ticket, EVENT_LOG_COLUMNS};

const WRITER_BUFFER_SIZE: usize = 64 * 1024;
const STMT_FLUSH_COUNT: usize = 100;

/// Writes tickets as dialect-escaped `INSERT` statements.
pub struct SqlScriptSink<W: Write> {
    writer: BufWriter<W>,
    table: String,
    dialect: Dialect,
    pending: usize,
    written: u64,
}

impl SqlScriptSink<File> {
    /// Create (or truncate) a script file
    pub fn create(path: &Path, table: &str, dialect: Dialect) -> Result<Self, StoreError> {
        let file = File::create(path)?;
        Self::new(file, table, dialect)
    }
}

impl<W: Write> SqlScriptSink<W> {
    pub fn new(writer: W, table: &str, dialect: Dialect) -> Result<Self, StoreError> {
        validate_identifier(table)?;
        Ok(Self {
            writer: BufWriter::with_capacity(WRITER_BUFFER_SIZE, writer),
            table: table.to_string(),
            dialect,
            pending: 0,
            written: 0,
        })
    }

    /// Write a leading comment line
    pub fn with_header(mut self, header: &str) -> Result<Self, StoreError> {
        for line in header.lines() {
            writeln!(self.writer, "-- {}", line)?;
        }
        Ok(self)
    }

    pub fn statements_written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the inner writer
    pub fn into_inner(self) -> Result<W, StoreError> {
        self.writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error()))
    }
}

impl<W: Write> TicketSink for SqlScriptSink<W> {
    fn insert(&mut self, ticket: &Ticket) -> Result<(), StoreError> {
        let stmt = render_insert(&self.table, &EVENT_LOG_COLUMNS, &ticket.values(), self.dialect);
        writeln!(self.writer, "{}", stmt).map_err(|e| StoreError::Insert {
            case_id: ticket.case_id.clone(),
            source: Box::new(e),
        })?;

        self.written += 1;
        self.pending += 1;
        if self.pending >= STMT_FLUSH_COUNT {
            self.pending = 0;
            self.writer.flush()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), StoreError> {
        self.pending = 0;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ticket() -> Ticket {
        let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        Ticket {
            case_id: "CS_12".to_string(),
            activity: "Customer's reboot".to_string(),
            urgency: 2,
            impact: 3,
            priority: 4,
            start_date: start,
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            status: "Open".to_string(),
            update_timestamp: start.and_hms_opt(14, 30, 0).unwrap(),
            duration: 2,
            origin: "Phone".to_string(),
            event_class: "Incident".to_string(),
        }
    }

    #[test]
    fn test_mysql_script_line() {
        let mut sink = SqlScriptSink::new(Vec::new(), "EventLog", Dialect::MySql).unwrap();
        sink.insert(&ticket()).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.statements_written(), 1);

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "INSERT INTO `EventLog` (`CaseID`, `Activity`, `Urgency`, `Impact`, `Priority`, \
             `StartDate`, `EndDate`, `TicketStatus`, `UpdateDateTime`, `Duration`, `Origin`, `Class`) \
             VALUES ('CS_12', 'Customer\\'s reboot', 2, 3, 4, '2024-01-03', '2024-01-05', 'Open', \
             '2024-01-03 14:30:00', 2, 'Phone', 'Incident');\n"
        );
    }

    #[test]
    fn test_postgres_header_and_escaping() {
        let mut sink = SqlScriptSink::new(Vec::new(), "EventLog", Dialect::Postgres)
            .unwrap()
            .with_header("generated by incident-seeder\nseed: 42")
            .unwrap();
        sink.insert(&ticket()).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert!(out.starts_with("-- generated by incident-seeder\n-- seed: 42\n"));
        assert!(out.contains("'Customer''s reboot'"));
        assert!(out.contains("INSERT INTO \"EventLog\""));
    }

    #[test]
    fn test_rejects_bad_table_name() {
        assert!(matches!(
            SqlScriptSink::new(Vec::new(), "Event Log", Dialect::Sqlite),
            Err(StoreError::InvalidIdentifier(_))
        ));
    }
}
