//! Testing utilities for handlers, actions and column filters.
//!
//! - [`rows`] builds row images and change rows with little ceremony.
//! - [`action`] wraps an [`EventTypeAction`](crate::action::EventTypeAction) to record its calls
//!   and make chosen calls fail.
//! - [`filter`] wraps a [`ColumnFilter`](crate::filter::ColumnFilter) to count its evaluations.
//! - [`tables`] builds registries for single-table tests.
//! - [`failpoints`] configures failpoints for the duration of a test.

pub mod action;
#[cfg(feature = "failpoints")]
pub mod failpoints;
pub mod filter;
pub mod rows;
pub mod tables;
