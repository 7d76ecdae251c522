//! Downstream actions receiving dispatched runs of rows.
//!
//! This module provides the [`EventTypeAction`] trait implemented by consumers of the handler
//! (indexers, cache invalidators, ...) and an in-memory implementation for development and
//! tests.

mod base;
pub mod memory;

pub use base::EventTypeAction;
