use std::sync::Arc;

use cdc_batch::action::memory::MemoryAction;
use cdc_batch::handler::EventTypeSectionHandler;
use cdc_batch::metrics::{
    CDC_BATCH_DISPATCH_CALLS_TOTAL, CDC_BATCH_ROWS_DISPATCHED_TOTAL,
    CDC_BATCH_ROWS_DROPPED_TOTAL, CDC_BATCH_ROWS_RECEIVED_TOTAL,
};
use cdc_batch::test_utils::rows::status_update;
use cdc_batch::test_utils::tables::{single_table, status_filter};
use cdc_batch::types::ChangeKind;
use cdc_batch_telemetry::metrics::init_metrics_handle;
use cdc_batch_telemetry::tracing::init_test_tracing;

#[tokio::test(flavor = "multi_thread")]
async fn flushes_are_measured() {
    init_test_tracing();
    let metrics = init_metrics_handle().unwrap();

    // A dedicated schema keeps the series apart from the ones of other tests.
    let mut handler = EventTypeSectionHandler::new(single_table(
        "metered",
        "items",
        MemoryAction::default(),
        Some(Arc::new(status_filter("active"))),
    ));

    handler
        .on_rows(
            "metered",
            "items",
            ChangeKind::Update,
            vec![
                status_update("1", "active", "active"),
                status_update("2", "draft", "draft"),
            ],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    let rendered = metrics.render();
    for name in [
        CDC_BATCH_ROWS_RECEIVED_TOTAL,
        CDC_BATCH_ROWS_DROPPED_TOTAL,
        CDC_BATCH_ROWS_DISPATCHED_TOTAL,
        CDC_BATCH_DISPATCH_CALLS_TOTAL,
    ] {
        assert!(
            rendered
                .lines()
                .any(|line| line.starts_with(name) && line.contains(r#"schema="metered""#)),
            "{name} missing from rendered metrics"
        );
    }
}
