//! YAML configuration for table and column names.
//!
//! Every field has a default matching the service-ticket schema the tool
//! was written for, so a config file only needs to name what differs:
//!
//! ```yaml
//! activity:
//!   table: Activities
//!   column: Name
//! event_log:
//!   table: Tickets
//!   case_prefix: "INC-"
//! ```

use crate::store::{validate_identifier, StoreError, DEFAULT_EVENT_TABLE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use ticket_synth::{VocabularyKind, DEFAULT_CASE_PREFIX};

/// Where one vocabulary is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceColumn {
    pub table: String,
    pub column: String,
}

impl ReferenceColumn {
    fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

/// Target table for generated tickets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLogConfig {
    pub table: String,
    /// Numeric primary key the next case number continues from
    pub id_column: String,
    pub case_prefix: String,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_EVENT_TABLE.to_string(),
            id_column: "ID".to_string(),
            case_prefix: DEFAULT_CASE_PREFIX.to_string(),
        }
    }
}

/// Complete YAML configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeederConfig {
    pub activity: ReferenceColumn,
    pub origin: ReferenceColumn,
    pub status: ReferenceColumn,
    pub class: ReferenceColumn,
    pub event_log: EventLogConfig,
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            activity: ReferenceColumn::new("EventActivity", "ActivityName"),
            origin: ReferenceColumn::new("EventOrigin", "OriginName"),
            status: ReferenceColumn::new("EventStatus", "Status"),
            class: ReferenceColumn::new("EventClass", "Class"),
            event_log: EventLogConfig::default(),
        }
    }
}

impl SeederConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: SeederConfig = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reference table and column for one vocabulary
    pub fn reference(&self, kind: VocabularyKind) -> &ReferenceColumn {
        match kind {
            VocabularyKind::Activity => &self.activity,
            VocabularyKind::Origin => &self.origin,
            VocabularyKind::Status => &self.status,
            VocabularyKind::Class => &self.class,
        }
    }

    /// Reject names that cannot be used as plain SQL identifiers
    pub fn validate(&self) -> Result<(), StoreError> {
        for kind in VocabularyKind::ALL {
            let reference = self.reference(kind);
            validate_identifier(&reference.table)?;
            validate_identifier(&reference.column)?;
        }
        validate_identifier(&self.event_log.table)?;
        validate_identifier(&self.event_log.id_column)?;
        Ok(())
    }
}
