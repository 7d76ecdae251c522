use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::action::EventTypeAction;
use crate::error::BatchResult;
use crate::types::{ChangeKind, ChangeRow, DeleteRow, InsertRow, UpdateRow};

/// One recorded call of an [`EventTypeAction`] method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    /// Kind of the method that was called.
    pub kind: ChangeKind,
    /// Rows passed to the call, in order.
    pub rows: Vec<ChangeRow>,
}

/// In-memory action for development and testing.
///
/// [`MemoryAction`] records every call it receives, in order. Clones share the same record, so
/// a clone can be registered in a handler while the original is kept to inspect the calls.
#[derive(Debug, Clone)]
pub struct MemoryAction {
    name: String,
    calls: Arc<Mutex<Vec<ActionCall>>>,
}

impl MemoryAction {
    /// Creates a new action with no recorded calls.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a copy of all recorded calls.
    pub async fn calls(&self) -> Vec<ActionCall> {
        self.calls.lock().await.clone()
    }

    /// Returns the rows of all recorded calls, concatenated in call order.
    pub async fn rows(&self) -> Vec<ChangeRow> {
        self.calls
            .lock()
            .await
            .iter()
            .flat_map(|call| call.rows.iter().cloned())
            .collect()
    }

    /// Forgets all recorded calls.
    pub async fn clear(&self) {
        self.calls.lock().await.clear();
    }

    async fn record(&self, kind: ChangeKind, rows: Vec<ChangeRow>) {
        info!(action = %self.name, %kind, rows = rows.len(), "recording action call");

        self.calls.lock().await.push(ActionCall { kind, rows });
    }
}

impl Default for MemoryAction {
    fn default() -> Self {
        Self::new("memory")
    }
}

#[async_trait]
impl EventTypeAction for MemoryAction {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_insert(&self, rows: &[InsertRow]) -> BatchResult<()> {
        let rows = rows.iter().cloned().map(ChangeRow::Insert).collect();
        self.record(ChangeKind::Insert, rows).await;

        Ok(())
    }

    async fn on_update(&self, rows: &[UpdateRow]) -> BatchResult<()> {
        let rows = rows.iter().cloned().map(ChangeRow::Update).collect();
        self.record(ChangeKind::Update, rows).await;

        Ok(())
    }

    async fn on_delete(&self, rows: &[DeleteRow]) -> BatchResult<()> {
        let rows = rows.iter().cloned().map(ChangeRow::Delete).collect();
        self.record(ChangeKind::Delete, rows).await;

        Ok(())
    }
}
