use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::load::Config;
use crate::shared::{RecoveryConfig, TableConfig, ValidationError};

/// Configuration of a change-event batching handler.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct HandlerConfig {
    /// Tables whose change events are handled.
    #[serde(default)]
    pub tables: Vec<TableConfig>,
    /// Behavior when handling a batch fails.
    #[serde(default)]
    pub recovery: RecoveryConfig,
}

impl HandlerConfig {
    /// Validates every table and rejects tables configured twice.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.tables.len());
        for table in &self.tables {
            table.validate()?;

            if !seen.insert((table.schema.as_str(), table.table.as_str())) {
                return Err(ValidationError::DuplicateTable {
                    schema: table.schema.clone(),
                    table: table.table.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Config for HandlerConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["recovery.ignore_kinds"];
}
