use cdc_batch::action::memory::MemoryAction;
use cdc_batch::error::ErrorKind;
use cdc_batch::failpoints::DISPATCH__BEFORE_ACTION;
use cdc_batch::handler::{ConfiguredRecovery, EventTypeSectionHandler};
use cdc_batch::test_utils::failpoints::FailpointScenario;
use cdc_batch::test_utils::rows::{delete_id, insert_id};
use cdc_batch::test_utils::tables::single_table;
use cdc_batch::types::ChangeKind;
use cdc_batch_config::shared::{RecoveryConfig, RecoveryMode};
use cdc_batch_telemetry::tracing::init_test_tracing;

#[tokio::test(flavor = "multi_thread")]
async fn failure_before_dispatch_keeps_rows_pending() {
    init_test_tracing();
    let _scenario =
        FailpointScenario::setup(&[(DISPATCH__BEFORE_ACTION, "1*return(propagate)")]);

    let action = MemoryAction::default();
    let mut handler = EventTypeSectionHandler::new(single_table(
        "shop",
        "items",
        action.clone(),
        None,
    ));

    handler
        .on_rows("shop", "items", ChangeKind::Insert, vec![insert_id("1")])
        .await
        .unwrap();

    let err = handler
        .on_rows("shop", "items", ChangeKind::Delete, vec![delete_id("2")])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::WithPropagate);
    assert_eq!(handler.pending_rows(), &[insert_id("1")]);
    assert!(action.calls().await.is_empty());

    // The failpoint fires once, so the retried flush goes through.
    handler
        .on_rows("shop", "items", ChangeKind::Delete, vec![delete_id("2")])
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(action.rows().await, vec![insert_id("1"), delete_id("2")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn configured_recovery_ignores_failpoint_errors() {
    init_test_tracing();
    let _scenario =
        FailpointScenario::setup(&[(DISPATCH__BEFORE_ACTION, "1*return(ignore)")]);

    let action = MemoryAction::default();
    let policy = ConfiguredRecovery::from_config(&RecoveryConfig {
        mode: RecoveryMode::Propagate,
        ignore_kinds: vec!["WithIgnore".to_string()],
    })
    .unwrap();
    let mut handler = EventTypeSectionHandler::with_policy(
        single_table("shop", "items", action.clone(), None),
        policy,
    );

    handler
        .on_rows("shop", "items", ChangeKind::Insert, vec![insert_id("1")])
        .await
        .unwrap();
    handler
        .on_rows("shop", "items", ChangeKind::Delete, vec![delete_id("2")])
        .await
        .unwrap();
    handler
        .on_rows("shop", "items", ChangeKind::Insert, vec![insert_id("3")])
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    // Row 1 failed and was discarded, row 2 was skipped with the failed flush.
    assert_eq!(action.rows().await, vec![insert_id("3")]);
}
