use std::collections::HashSet;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use cdc_batch_config::shared::{
    ColumnConditionConfig, ColumnFilterConfig, MatchMode, MissingColumnPolicy,
};
use tracing::trace;

use crate::bail;
use crate::error::{BatchResult, ErrorKind};
use crate::filter::{ColumnAccessor, ColumnFilter};

/// A condition on the value of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnCondition {
    /// The value equals the given text.
    Equal { column: String, value: String },
    /// The value differs from the given text.
    NotEqual { column: String, value: String },
    /// The value equals one of the given texts.
    In {
        column: String,
        values: HashSet<String>,
    },
    /// The value, read as a decimal, lies within the inclusive bounds.
    Range {
        column: String,
        start: Option<BigDecimal>,
        end: Option<BigDecimal>,
    },
    /// The column has a value.
    Present { column: String },
}

impl ColumnCondition {
    pub fn equal(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equal {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn not_equal(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotEqual {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn one_of<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn range(
        column: impl Into<String>,
        start: Option<BigDecimal>,
        end: Option<BigDecimal>,
    ) -> Self {
        Self::Range {
            column: column.into(),
            start,
            end,
        }
    }

    pub fn present(column: impl Into<String>) -> Self {
        Self::Present {
            column: column.into(),
        }
    }

    /// Returns the column read by this condition.
    pub fn column(&self) -> &str {
        match self {
            Self::Equal { column, .. }
            | Self::NotEqual { column, .. }
            | Self::In { column, .. }
            | Self::Range { column, .. }
            | Self::Present { column } => column,
        }
    }

    /// Checks the condition against a value known to be present.
    fn holds_for(&self, value: &str) -> bool {
        match self {
            Self::Equal { value: expected, .. } => value == expected,
            Self::NotEqual { value: expected, .. } => value != expected,
            Self::In { values, .. } => values.contains(value),
            Self::Range { start, end, column } => {
                let Ok(value) = BigDecimal::from_str(value.trim()) else {
                    trace!(%column, value, "value is not a decimal, range does not hold");
                    return false;
                };

                start.as_ref().is_none_or(|start| &value >= start)
                    && end.as_ref().is_none_or(|end| &value <= end)
            }
            Self::Present { .. } => true,
        }
    }

    fn from_config(config: &ColumnConditionConfig) -> BatchResult<Self> {
        let condition = match config {
            ColumnConditionConfig::Equal { column, value } => Self::equal(column, value),
            ColumnConditionConfig::NotEqual { column, value } => Self::not_equal(column, value),
            ColumnConditionConfig::In { column, values } => Self::one_of(column, values),
            ColumnConditionConfig::Range { column, start, end } => Self::range(
                column,
                parse_bound(column, start.as_deref())?,
                parse_bound(column, end.as_deref())?,
            ),
            ColumnConditionConfig::Present { column } => Self::present(column),
        };

        Ok(condition)
    }
}

fn parse_bound(column: &str, bound: Option<&str>) -> BatchResult<Option<BigDecimal>> {
    let Some(bound) = bound else {
        return Ok(None);
    };

    match BigDecimal::from_str(bound.trim()) {
        Ok(bound) => Ok(Some(bound)),
        Err(err) => bail!(
            ErrorKind::ConfigError,
            "Range bound of a column condition is not a decimal",
            format!("column `{column}` has bound `{bound}`"),
            source: err
        ),
    }
}

/// Column filter made of [`ColumnCondition`]s combined with a [`MatchMode`].
#[derive(Debug, Clone)]
pub struct ConditionFilter {
    match_mode: MatchMode,
    missing_column: MissingColumnPolicy,
    conditions: Vec<ColumnCondition>,
}

impl ConditionFilter {
    /// Creates a filter holding when every condition holds.
    pub fn all(conditions: impl IntoIterator<Item = ColumnCondition>) -> Self {
        Self {
            match_mode: MatchMode::All,
            missing_column: MissingColumnPolicy::default(),
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Creates a filter holding when at least one condition holds.
    pub fn any(conditions: impl IntoIterator<Item = ColumnCondition>) -> Self {
        Self {
            match_mode: MatchMode::Any,
            ..Self::all(conditions)
        }
    }

    /// Sets the outcome of conditions whose column is absent from the image.
    pub fn with_missing_column(mut self, missing_column: MissingColumnPolicy) -> Self {
        self.missing_column = missing_column;
        self
    }

    /// Builds the filter described by `config`.
    pub fn from_config(config: &ColumnFilterConfig) -> BatchResult<Self> {
        let conditions = config
            .conditions
            .iter()
            .map(ColumnCondition::from_config)
            .collect::<BatchResult<Vec<_>>>()?;

        Ok(Self {
            match_mode: config.match_mode,
            missing_column: config.missing_column,
            conditions,
        })
    }

    /// Returns the conditions of this filter.
    pub fn conditions(&self) -> &[ColumnCondition] {
        &self.conditions
    }

    fn check(&self, condition: &ColumnCondition, columns: &dyn ColumnAccessor) -> BatchResult<bool> {
        match columns.column(condition.column()) {
            Some(value) => Ok(condition.holds_for(value)),
            None => match self.missing_column {
                MissingColumnPolicy::Invalid => Ok(false),
                MissingColumnPolicy::Valid => Ok(true),
                MissingColumnPolicy::Fail => bail!(
                    ErrorKind::FilterEvaluationFailed,
                    "Column read by the column filter is missing from the row",
                    format!("column `{}` is not in the row image", condition.column())
                ),
            },
        }
    }
}

impl ColumnFilter for ConditionFilter {
    fn validate(&self, columns: &dyn ColumnAccessor) -> BatchResult<bool> {
        match self.match_mode {
            MatchMode::All => {
                for condition in &self.conditions {
                    if !self.check(condition, columns)? {
                        return Ok(false);
                    }
                }

                Ok(true)
            }
            MatchMode::Any => {
                for condition in &self.conditions {
                    if self.check(condition, columns)? {
                        return Ok(true);
                    }
                }

                Ok(false)
            }
        }
    }
}
