//! Shared configuration types for the change-event batching handler.

mod base;
mod filter;
mod handler;
mod recovery;
mod table;

pub use base::ValidationError;
pub use filter::{ColumnConditionConfig, ColumnFilterConfig, MatchMode, MissingColumnPolicy};
pub use handler::HandlerConfig;
pub use recovery::{RecoveryConfig, RecoveryMode};
pub use table::TableConfig;
