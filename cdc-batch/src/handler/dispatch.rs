use std::mem;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::debug;

use crate::action::EventTypeAction;
use crate::error::BatchResult;
#[cfg(feature = "failpoints")]
use crate::failpoints::{DISPATCH__BEFORE_ACTION, batch_fail_point};
use crate::metrics::{
    CDC_BATCH_DISPATCH_CALLS_TOTAL, CDC_BATCH_DISPATCH_DURATION_SECONDS,
    CDC_BATCH_ROWS_DISPATCHED_TOTAL, KIND_LABEL, SCHEMA_LABEL, TABLE_LABEL,
};
use crate::types::{BatchKey, ChangeKind, ChangeRow, RowRun};

/// Delivers the first `len` rows of `rows` to `action` as one run of `kind`.
///
/// The rows are removed from `rows` only if the action succeeds. On failure they are put back in
/// front of the rows that were not dispatched yet.
pub(crate) async fn dispatch_run(
    key: &BatchKey,
    action: &dyn EventTypeAction,
    rows: &mut Vec<ChangeRow>,
    kind: ChangeKind,
    len: usize,
) -> BatchResult<()> {
    #[cfg(feature = "failpoints")]
    batch_fail_point(DISPATCH__BEFORE_ACTION)?;

    let run = RowRun::drain_front(kind, rows, len)?;

    debug!(
        schema = %key.schema,
        table = %key.table,
        kind = %run.kind(),
        rows = run.len(),
        action = action.name(),
        "dispatching run"
    );

    let before_dispatch = Instant::now();
    let result = match &run {
        RowRun::Insert(inserts) => action.on_insert(inserts).await,
        RowRun::Update(updates) => action.on_update(updates).await,
        RowRun::Delete(deletes) => action.on_delete(deletes).await,
    };

    let dispatch_duration_seconds = before_dispatch.elapsed().as_secs_f64();
    histogram!(
        CDC_BATCH_DISPATCH_DURATION_SECONDS,
        SCHEMA_LABEL => key.schema.clone(),
        TABLE_LABEL => key.table.clone(),
        KIND_LABEL => kind.as_str(),
    )
    .record(dispatch_duration_seconds);

    counter!(
        CDC_BATCH_DISPATCH_CALLS_TOTAL,
        SCHEMA_LABEL => key.schema.clone(),
        TABLE_LABEL => key.table.clone(),
        KIND_LABEL => kind.as_str(),
    )
    .increment(1);

    if let Err(err) = result {
        restore_front(rows, run);
        return Err(err);
    }

    counter!(
        CDC_BATCH_ROWS_DISPATCHED_TOTAL,
        SCHEMA_LABEL => key.schema.clone(),
        TABLE_LABEL => key.table.clone(),
        KIND_LABEL => kind.as_str(),
    )
    .increment(len as u64);

    Ok(())
}

fn restore_front(rows: &mut Vec<ChangeRow>, run: RowRun) {
    let remainder = mem::replace(rows, run.into_rows());
    rows.extend(remainder);
}
