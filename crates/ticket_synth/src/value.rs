//! Column values and dialect-specific SQL literal rendering.
//!
//! Database sinks bind these values as statement parameters. Only the SQL
//! script sink renders them as literals, and it always escapes them for the
//! target dialect.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Target SQL dialect for rendered statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
    Sqlite,
    DuckDb,
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pg" => Ok(Dialect::Postgres),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            "duckdb" => Ok(Dialect::DuckDb),
            _ => Err(format!(
                "Unknown dialect: {}. Use mysql, postgres, sqlite, or duckdb",
                s
            )),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Postgres => write!(f, "postgres"),
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::DuckDb => write!(f, "duckdb"),
        }
    }
}

impl Dialect {
    /// Quote an identifier (table or column name)
    pub fn quote_ident(&self, name: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", name.replace('`', "``")),
            _ => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }
}

/// A single column value of a ticket row
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Render as a SQL literal for the given dialect
    pub fn render(&self, dialect: Dialect) -> String {
        match self {
            SqlValue::Int(n) => n.to_string(),
            SqlValue::Text(s) => quote_string(s, dialect),
            SqlValue::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
            SqlValue::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

fn quote_string(s: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::MySql => format!("'{}'", escape_mysql_string(s)),
        Dialect::Postgres | Dialect::Sqlite | Dialect::DuckDb => {
            format!("'{}'", s.replace('\'', "''"))
        }
    }
}

fn escape_mysql_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Render a single-row `INSERT` statement, terminated with `;`
pub fn render_insert(
    table: &str,
    columns: &[&str],
    values: &[SqlValue],
    dialect: Dialect,
) -> String {
    let column_list = columns
        .iter()
        .map(|c| dialect.quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let value_list = values
        .iter()
        .map(|v| v.render(dialect))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        dialect.quote_ident(table),
        column_list,
        value_list
    )
}
