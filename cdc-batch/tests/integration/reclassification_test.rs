use std::sync::Arc;

use cdc_batch::action::memory::{ActionCall, MemoryAction};
use cdc_batch::batch_error;
use cdc_batch::error::ErrorKind;
use cdc_batch::filter::{ColumnAccessor, ColumnCondition, ConditionFilter};
use cdc_batch::handler::EventTypeSectionHandler;
use cdc_batch::test_utils::filter::CountingFilter;
use cdc_batch::test_utils::rows::{delete_row, insert_row, status_update, update_row};
use cdc_batch::test_utils::tables::{single_table, status_filter};
use cdc_batch::types::{ChangeKind, ChangeRow};
use cdc_batch_config::shared::MissingColumnPolicy;
use cdc_batch_telemetry::tracing::init_test_tracing;

fn call(kind: ChangeKind, rows: Vec<ChangeRow>) -> ActionCall {
    ActionCall { kind, rows }
}

fn inserted(id: &str, status: &str) -> ChangeRow {
    insert_row(&[("id", id), ("status", status)])
}

fn deleted(id: &str, status: &str) -> ChangeRow {
    delete_row(&[("id", id), ("status", status)])
}

#[tokio::test(flavor = "multi_thread")]
async fn update_batch_is_split_into_runs() {
    init_test_tracing();
    let action = MemoryAction::default();
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        Some(Arc::new(status_filter("active"))),
    ));

    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![
                status_update("1", "active", "active"),
                status_update("2", "active", "archived"),
                status_update("3", "draft", "archived"),
                status_update("4", "draft", "active"),
            ],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(
        action.calls().await,
        vec![
            call(
                ChangeKind::Update,
                vec![status_update("1", "active", "active")]
            ),
            call(ChangeKind::Delete, vec![deleted("2", "active")]),
            call(ChangeKind::Insert, vec![inserted("4", "active")]),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn rows_of_the_same_effective_kind_share_a_call() {
    init_test_tracing();
    let action = MemoryAction::default();
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        Some(Arc::new(status_filter("active"))),
    ));

    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![
                status_update("1", "active", "sold"),
                status_update("2", "active", "sold"),
            ],
        )
        .await
        .unwrap();
    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![status_update("3", "active", "draft")],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(
        action.calls().await,
        vec![call(
            ChangeKind::Delete,
            vec![
                deleted("1", "active"),
                deleted("2", "active"),
                deleted("3", "active")
            ]
        )]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_rows_do_not_split_runs() {
    init_test_tracing();
    let action = MemoryAction::default();
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        Some(Arc::new(status_filter("active"))),
    ));

    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![
                status_update("1", "draft", "active"),
                status_update("2", "draft", "sold"),
                status_update("3", "draft", "active"),
            ],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(
        action.calls().await,
        vec![call(
            ChangeKind::Insert,
            vec![inserted("1", "active"), inserted("3", "active")]
        )]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn batch_of_dropped_rows_calls_nothing() {
    init_test_tracing();
    let action = MemoryAction::default();
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        Some(Arc::new(status_filter("active"))),
    ));

    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![
                status_update("1", "draft", "sold"),
                status_update("2", "sold", "draft"),
            ],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert!(action.calls().await.is_empty());
    assert!(handler.pending_rows().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn each_image_is_evaluated_once() {
    init_test_tracing();
    let action = MemoryAction::default();
    let filter = CountingFilter::wrap(status_filter("active"));
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        Some(Arc::new(filter.clone())),
    ));

    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![
                status_update("1", "active", "active"),
                status_update("2", "draft", "active"),
                status_update("3", "draft", "draft"),
            ],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(filter.evaluations(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_evaluation_does_not_affect_later_rows() {
    init_test_tracing();
    let action = MemoryAction::default();
    let filter = |columns: &dyn ColumnAccessor| match columns.column("status") {
        Some("broken") => Err(batch_error!(
            ErrorKind::FilterEvaluationFailed,
            "Status cannot be evaluated"
        )),
        status => Ok(status == Some("active")),
    };
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        Some(Arc::new(filter)),
    ));

    let broken = vec![
        status_update("1", "draft", "active"),
        status_update("2", "active", "broken"),
    ];
    handler
        .on_rows("shop", "items", ChangeKind::Update, broken.clone())
        .await
        .unwrap();

    let err = handler.end_of_stream().await.unwrap_err();

    // The whole batch is evaluated before any row is delivered.
    assert_eq!(err.kind(), ErrorKind::FilterEvaluationFailed);
    assert!(action.calls().await.is_empty());
    assert!(handler.pending_rows().is_empty());

    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![status_update("3", "draft", "active")],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(
        action.calls().await,
        vec![call(ChangeKind::Insert, vec![inserted("3", "active")])]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_columns_follow_the_filter_policy() {
    init_test_tracing();
    let action = MemoryAction::default();
    let filter = ConditionFilter::all([ColumnCondition::equal("status", "active")])
        .with_missing_column(MissingColumnPolicy::Valid);
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        Some(Arc::new(filter)),
    ));

    // The before image lacks the column and counts as matching, the after image does not match.
    let update = update_row(&[("id", "1")], &[("id", "1"), ("status", "sold")]);
    handler
        .on_rows("shop", "items", ChangeKind::Update, vec![update])
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(
        action.calls().await,
        vec![call(
            ChangeKind::Delete,
            vec![delete_row(&[("id", "1")])]
        )]
    );
}
