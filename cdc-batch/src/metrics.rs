//! Metrics definitions for change-event batching.

/// Label for the schema of a batch key.
pub const SCHEMA_LABEL: &str = "schema";

/// Label for the table of a batch key.
pub const TABLE_LABEL: &str = "table";

/// Label for a change kind, either the captured kind or the effective kind after reclassification.
pub const KIND_LABEL: &str = "kind";

/// Label for the error kind of a failure.
pub const ERROR_KIND_LABEL: &str = "error_kind";

/// Label for the decision taken by the recovery policy.
pub const DECISION_LABEL: &str = "decision";

// Accumulation metrics

/// Counter for rows received by the handler.
pub const CDC_BATCH_ROWS_RECEIVED_TOTAL: &str = "cdc_batch_rows_received_total";

/// Histogram for the number of rows in a flushed buffer.
pub const CDC_BATCH_FLUSH_SIZE: &str = "cdc_batch_flush_size";

// Reclassification metrics

/// Counter for update rows dropped because neither image satisfies the column filter.
pub const CDC_BATCH_ROWS_DROPPED_TOTAL: &str = "cdc_batch_rows_dropped_total";

/// Counter for update rows reclassified as inserts or deletes.
pub const CDC_BATCH_ROWS_RECLASSIFIED_TOTAL: &str = "cdc_batch_rows_reclassified_total";

// Dispatch metrics

/// Counter for rows handed to actions.
pub const CDC_BATCH_ROWS_DISPATCHED_TOTAL: &str = "cdc_batch_rows_dispatched_total";

/// Counter for action calls.
pub const CDC_BATCH_DISPATCH_CALLS_TOTAL: &str = "cdc_batch_dispatch_calls_total";

/// Histogram for the duration of action calls.
pub const CDC_BATCH_DISPATCH_DURATION_SECONDS: &str = "cdc_batch_dispatch_duration_seconds";

// Failure metrics

/// Counter for failed flushes, labelled with the recovery decision.
pub const CDC_BATCH_FAILURES_TOTAL: &str = "cdc_batch_failures_total";

/// Counter for rows of an ignored failure discarded before processing resumed.
pub const CDC_BATCH_ROWS_DISCARDED_TOTAL: &str = "cdc_batch_rows_discarded_total";
