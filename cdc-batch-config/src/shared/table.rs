use serde::{Deserialize, Serialize};

use crate::shared::{ColumnFilterConfig, ValidationError};

/// Configuration of one handled table.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TableConfig {
    /// Schema (database) the table belongs to.
    pub schema: String,
    /// Name of the table.
    pub table: String,
    /// Filter used to reclassify the update rows of this table.
    ///
    /// When absent, update batches are dispatched as they are.
    #[serde(default)]
    pub column_filter: Option<ColumnFilterConfig>,
}

impl TableConfig {
    /// Validates the table configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema.is_empty() {
            return Err(ValidationError::EmptyName {
                field: "tables.schema".to_string(),
            });
        }
        if self.table.is_empty() {
            return Err(ValidationError::EmptyName {
                field: format!("tables[{}].table", self.schema),
            });
        }

        if let Some(column_filter) = &self.column_filter {
            column_filter.validate(&self.schema, &self.table)?;
        }

        Ok(())
    }
}
