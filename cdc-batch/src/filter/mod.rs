//! Column filters deciding whether a row image belongs to the set a table's actions track.
//!
//! The handler only relies on the [`ColumnFilter`] contract. [`ConditionFilter`] is the filter
//! built from configuration.

mod base;
mod condition;

pub use base::{ColumnAccessor, ColumnFilter};
pub use condition::{ColumnCondition, ConditionFilter};
