use async_trait::async_trait;

use crate::error::BatchResult;
use crate::types::{DeleteRow, InsertRow, UpdateRow};

/// Consumer of the rows of one table.
///
/// The handler calls exactly one of the three methods per dispatched run, with the rows of the
/// run in the order they were captured. Calls are strictly sequential: the handler awaits each
/// call before making the next one, so a slow action naturally slows down the delivery of the
/// change stream.
///
/// Rows handed to [`EventTypeAction::on_update`] may be a subset of the captured update batch
/// when the table has a column filter: rows entering the filtered set are delivered to
/// [`EventTypeAction::on_insert`] and rows leaving it to [`EventTypeAction::on_delete`].
///
/// A failure should be reported with [`ErrorKind::ActionFailed`](crate::error::ErrorKind::ActionFailed).
/// Failed calls are not retried by the handler; the rows stay pending for the recovery policy.
#[async_trait]
pub trait EventTypeAction: Send + Sync {
    /// Returns the name of the action, used in logs and metrics.
    fn name(&self) -> &str {
        "unnamed"
    }

    /// Handles a run of inserted rows.
    async fn on_insert(&self, rows: &[InsertRow]) -> BatchResult<()>;

    /// Handles a run of updated rows.
    async fn on_update(&self, rows: &[UpdateRow]) -> BatchResult<()>;

    /// Handles a run of deleted rows.
    async fn on_delete(&self, rows: &[DeleteRow]) -> BatchResult<()>;
}
