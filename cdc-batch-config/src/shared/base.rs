use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A schema or table name is empty.
    #[error("`{field}` cannot be empty")]
    EmptyName { field: String },
    /// The same schema and table pair is configured more than once.
    #[error("table `{schema}.{table}` is configured more than once")]
    DuplicateTable { schema: String, table: String },
    /// A column filter has no conditions to evaluate.
    #[error("column filter of `{schema}.{table}` has no conditions")]
    EmptyColumnFilter { schema: String, table: String },
    /// A field holds a value that violates its constraint.
    #[error("invalid value for `{field}`: {constraint}")]
    InvalidFieldValue { field: String, constraint: String },
}
