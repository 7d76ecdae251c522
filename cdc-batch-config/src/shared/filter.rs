use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// How the conditions of a column filter are combined.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every condition must hold.
    #[default]
    All,
    /// At least one condition must hold.
    Any,
}

/// Outcome of a condition whose column is absent from the row image being checked.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MissingColumnPolicy {
    /// The condition does not hold.
    #[default]
    Invalid,
    /// The condition holds.
    Valid,
    /// Evaluation fails with an error.
    Fail,
}

/// A single column condition.
///
/// All values are compared in their textual form, except for [`ColumnConditionConfig::Range`]
/// whose bounds and column value are compared as decimals.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ColumnConditionConfig {
    /// The column equals `value`.
    Equal { column: String, value: String },
    /// The column differs from `value`.
    NotEqual { column: String, value: String },
    /// The column equals one of `values`.
    In { column: String, values: Vec<String> },
    /// The column lies within the inclusive bounds. A missing bound is unbounded.
    Range {
        column: String,
        #[serde(default)]
        start: Option<String>,
        #[serde(default)]
        end: Option<String>,
    },
    /// The column has a value.
    Present { column: String },
}

impl ColumnConditionConfig {
    /// Returns the column this condition reads.
    pub fn column(&self) -> &str {
        match self {
            Self::Equal { column, .. }
            | Self::NotEqual { column, .. }
            | Self::In { column, .. }
            | Self::Range { column, .. }
            | Self::Present { column } => column,
        }
    }

    fn validate(&self, field: &str) -> Result<(), ValidationError> {
        if self.column().is_empty() {
            return Err(ValidationError::EmptyName {
                field: format!("{field}.column"),
            });
        }

        match self {
            Self::In { values, .. } if values.is_empty() => {
                Err(ValidationError::InvalidFieldValue {
                    field: format!("{field}.values"),
                    constraint: "must contain at least one value".to_string(),
                })
            }
            Self::Range {
                start: None,
                end: None,
                ..
            } => Err(ValidationError::InvalidFieldValue {
                field: field.to_string(),
                constraint: "a range needs at least one of `start` or `end`".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Column filter applied to the update batches of a table.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ColumnFilterConfig {
    /// How the conditions are combined.
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Outcome of a condition whose column is absent from the image.
    #[serde(default)]
    pub missing_column: MissingColumnPolicy,
    /// The conditions to evaluate.
    pub conditions: Vec<ColumnConditionConfig>,
}

impl ColumnFilterConfig {
    /// Validates the filter of the table `schema.table`.
    pub fn validate(&self, schema: &str, table: &str) -> Result<(), ValidationError> {
        if self.conditions.is_empty() {
            return Err(ValidationError::EmptyColumnFilter {
                schema: schema.to_string(),
                table: table.to_string(),
            });
        }

        for (index, condition) in self.conditions.iter().enumerate() {
            condition.validate(&format!("{schema}.{table}.column_filter.conditions[{index}]"))?;
        }

        Ok(())
    }
}
