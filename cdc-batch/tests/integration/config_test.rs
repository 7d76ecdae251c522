use std::collections::HashMap;
use std::sync::Arc;

use cdc_batch::action::EventTypeAction;
use cdc_batch::action::memory::MemoryAction;
use cdc_batch::error::ErrorKind;
use cdc_batch::handler::{ConfiguredRecovery, EventTypeSectionHandler};
use cdc_batch::tables::SchemaTables;
use cdc_batch::test_utils::action::TestActionWrapper;
use cdc_batch::test_utils::rows::{image, insert_id, insert_row, status_update, update_row};
use cdc_batch::types::{ChangeKind, ChangeRow, DeleteRow};
use cdc_batch_config::shared::HandlerConfig;
use cdc_batch_telemetry::tracing::init_test_tracing;

const CONFIG: &str = r#"{
    "tables": [
        {
            "schema": "shop",
            "table": "items",
            "column_filter": {
                "match_mode": "all",
                "conditions": [
                    {"op": "equal", "column": "status", "value": "active"},
                    {"op": "range", "column": "price", "start": "0", "end": "100"}
                ]
            }
        },
        {"schema": "shop", "table": "orders"}
    ],
    "recovery": {"mode": "propagate", "ignore_kinds": ["MissingTableConfig"]}
}"#;

fn actions() -> HashMap<&'static str, MemoryAction> {
    HashMap::from([
        ("items", MemoryAction::new("items")),
        ("orders", MemoryAction::new("orders")),
    ])
}

fn handler_from_config(
    actions: &HashMap<&'static str, MemoryAction>,
) -> EventTypeSectionHandler<ConfiguredRecovery> {
    let config: HandlerConfig = serde_json::from_str(CONFIG).unwrap();

    let tables = SchemaTables::from_config(&config, |_, table| {
        actions
            .get(table)
            .map(|action| Arc::new(action.clone()) as Arc<dyn EventTypeAction>)
    })
    .unwrap();
    let policy = ConfiguredRecovery::from_config(&config.recovery).unwrap();

    EventTypeSectionHandler::with_policy(tables, policy)
}

fn priced_update(id: &str, before: (&str, &str), after: (&str, &str)) -> ChangeRow {
    update_row(
        &[("id", id), ("status", before.0), ("price", before.1)],
        &[("id", id), ("status", after.0), ("price", after.1)],
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn configured_filter_reclassifies_updates() {
    init_test_tracing();
    let actions = actions();
    let mut handler = handler_from_config(&actions);

    handler
        .on_rows(
            "shop",
            "items",
            ChangeKind::Update,
            vec![
                priced_update("1", ("active", "10"), ("active", "20")),
                priced_update("2", ("active", "10"), ("active", "250")),
            ],
        )
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    let items = actions["items"].calls().await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind, ChangeKind::Update);
    assert_eq!(items[1].kind, ChangeKind::Delete);
    assert_eq!(
        items[1].rows,
        vec![ChangeRow::from(DeleteRow::new(image(&[
            ("id", "2"),
            ("status", "active"),
            ("price", "10")
        ])))]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn tables_without_filter_get_updates_unchanged() {
    init_test_tracing();
    let actions = actions();
    let mut handler = handler_from_config(&actions);

    let update = status_update("1", "active", "sold");
    handler
        .on_rows("shop", "orders", ChangeKind::Update, vec![update.clone()])
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    assert_eq!(actions["orders"].rows().await, vec![update]);
    assert!(actions["items"].calls().await.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn listed_error_kinds_are_ignored() {
    init_test_tracing();
    let actions = actions();
    let mut handler = handler_from_config(&actions);

    // Rows of an unregistered table fail with an ignored kind.
    handler
        .on_rows("shop", "ghosts", ChangeKind::Insert, vec![insert_id("1")])
        .await
        .unwrap();
    handler
        .on_rows(
            "shop",
            "orders",
            ChangeKind::Insert,
            vec![insert_row(&[("id", "2")])],
        )
        .await
        .unwrap();
    handler
        .on_rows("shop", "orders", ChangeKind::Insert, vec![insert_id("3")])
        .await
        .unwrap();
    handler.end_of_stream().await.unwrap();

    // The micro-batch that triggered the failed flush was skipped.
    assert_eq!(actions["orders"].rows().await, vec![insert_id("3")]);
}

#[tokio::test(flavor = "multi_thread")]
async fn other_error_kinds_are_propagated() {
    init_test_tracing();
    let config: HandlerConfig = serde_json::from_str(CONFIG).unwrap();
    let action = TestActionWrapper::wrap(MemoryAction::default()).fail_on_call(1);
    let tables = SchemaTables::from_config(&config, |_, _| {
        Some(Arc::new(action.clone()) as Arc<dyn EventTypeAction>)
    })
    .unwrap();
    let policy = ConfiguredRecovery::from_config(&config.recovery).unwrap();
    let mut handler = EventTypeSectionHandler::with_policy(tables, policy);

    handler
        .on_rows("shop", "orders", ChangeKind::Insert, vec![insert_id("1")])
        .await
        .unwrap();

    let err = handler.end_of_stream().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ActionFailed);
}
