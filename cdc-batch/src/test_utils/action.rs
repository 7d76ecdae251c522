use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::action::EventTypeAction;
use crate::action::memory::ActionCall;
use crate::bail;
use crate::error::{BatchResult, ErrorKind};
use crate::types::{ChangeKind, ChangeRow, DeleteRow, InsertRow, UpdateRow};

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<ActionCall>,
    failed_calls: Vec<u64>,
}

/// Test wrapper for [`EventTypeAction`] implementations that tracks all calls.
///
/// [`TestActionWrapper`] records every call it receives, including the ones it fails, before
/// forwarding it to the wrapped action. Calls are numbered from 1 in the order they are received,
/// and the wrapper can be told to fail chosen calls with [`ErrorKind::ActionFailed`] without
/// forwarding them.
///
/// Clones share the same record, so a clone can be registered in a handler while the original is
/// kept to inspect the calls.
#[derive(Debug, Clone)]
pub struct TestActionWrapper<A> {
    wrapped_action: A,
    failing_calls: HashSet<u64>,
    failing_from: Option<u64>,
    inner: Arc<RwLock<Inner>>,
}

impl<A> TestActionWrapper<A> {
    /// Creates a new test wrapper around any action implementation.
    pub fn wrap(action: A) -> Self {
        Self {
            wrapped_action: action,
            failing_calls: HashSet::new(),
            failing_from: None,
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    /// Makes the `call`-th call fail. Can be used several times.
    pub fn fail_on_call(mut self, call: u64) -> Self {
        self.failing_calls.insert(call);
        self
    }

    /// Makes the `call`-th call and every call after it fail.
    pub fn fail_from_call(mut self, call: u64) -> Self {
        self.failing_from = Some(call);
        self
    }

    /// Returns the wrapped action.
    pub fn wrapped(&self) -> &A {
        &self.wrapped_action
    }

    /// Returns all calls received so far, including failed ones.
    pub async fn calls(&self) -> Vec<ActionCall> {
        self.inner.read().await.calls.clone()
    }

    /// Returns the kinds of all calls received so far, in order.
    pub async fn call_kinds(&self) -> Vec<ChangeKind> {
        self.inner
            .read()
            .await
            .calls
            .iter()
            .map(|call| call.kind)
            .collect()
    }

    /// Returns the numbers of the calls that were failed.
    pub async fn failed_calls(&self) -> Vec<u64> {
        self.inner.read().await.failed_calls.clone()
    }

    /// Records a call and returns whether it has to fail.
    async fn record(&self, kind: ChangeKind, rows: Vec<ChangeRow>) -> bool {
        let mut inner = self.inner.write().await;
        inner.calls.push(ActionCall { kind, rows });

        let call = inner.calls.len() as u64;
        let fail = self.failing_calls.contains(&call)
            || self.failing_from.is_some_and(|from| call >= from);
        if fail {
            inner.failed_calls.push(call);
        }

        fail
    }
}

#[async_trait]
impl<A> EventTypeAction for TestActionWrapper<A>
where
    A: EventTypeAction,
{
    fn name(&self) -> &str {
        "wrapper"
    }

    async fn on_insert(&self, rows: &[InsertRow]) -> BatchResult<()> {
        let changes = rows.iter().cloned().map(ChangeRow::Insert).collect();
        if self.record(ChangeKind::Insert, changes).await {
            bail!(ErrorKind::ActionFailed, "Insert action failed", "failure requested by test");
        }

        self.wrapped_action.on_insert(rows).await
    }

    async fn on_update(&self, rows: &[UpdateRow]) -> BatchResult<()> {
        let changes = rows.iter().cloned().map(ChangeRow::Update).collect();
        if self.record(ChangeKind::Update, changes).await {
            bail!(ErrorKind::ActionFailed, "Update action failed", "failure requested by test");
        }

        self.wrapped_action.on_update(rows).await
    }

    async fn on_delete(&self, rows: &[DeleteRow]) -> BatchResult<()> {
        let changes = rows.iter().cloned().map(ChangeRow::Delete).collect();
        if self.record(ChangeKind::Delete, changes).await {
            bail!(ErrorKind::ActionFailed, "Delete action failed", "failure requested by test");
        }

        self.wrapped_action.on_delete(rows).await
    }
}
