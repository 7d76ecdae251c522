//! Tracing and metrics setup for services embedding the change-event batching handler.

pub mod metrics;
pub mod tracing;
