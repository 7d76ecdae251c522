//! Batching and reclassification of change-data-capture row events.
//!
//! The [`handler::EventTypeSectionHandler`] receives micro-batches of row mutations grouped by
//! schema, table and kind, accumulates consecutive micro-batches sharing the same key, and
//! delivers them to the [`action::EventTypeAction`] registered for their table in
//! [`tables::SchemaTables`]. Update batches of tables with a [`filter::ColumnFilter`] are
//! reclassified into inserts, updates and deletes before delivery.

pub mod action;
pub mod error;
#[cfg(feature = "failpoints")]
pub mod failpoints;
pub mod filter;
pub mod handler;
mod macros;
pub mod metrics;
pub mod tables;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
