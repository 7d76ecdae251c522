use std::mem;

use metrics::{counter, histogram};
use tracing::{debug, error, info, warn};

use crate::bail;
use crate::error::{BatchError, BatchResult, ErrorKind};
use crate::handler::dispatch::dispatch_run;
use crate::handler::reclassify::{reclassify_updates, split_runs};
use crate::handler::recovery::{
    PropagateFailures, RecoveryContext, RecoveryDecision, RecoveryPolicy,
};
use crate::metrics::{
    CDC_BATCH_FAILURES_TOTAL, CDC_BATCH_FLUSH_SIZE, CDC_BATCH_ROWS_DISCARDED_TOTAL,
    CDC_BATCH_ROWS_DROPPED_TOTAL, CDC_BATCH_ROWS_RECEIVED_TOTAL,
    CDC_BATCH_ROWS_RECLASSIFIED_TOTAL, DECISION_LABEL, ERROR_KIND_LABEL, KIND_LABEL,
    SCHEMA_LABEL, TABLE_LABEL,
};
use crate::tables::SchemaTables;
use crate::types::{BatchKey, ChangeKind, ChangeRow};

/// Batches the rows of a change stream and delivers them to the actions of their table.
///
/// Rows arrive in micro-batches through [`EventTypeSectionHandler::on_rows`], each tagged with
/// the `(schema, table, kind)` [`BatchKey`] of all its rows. Consecutive micro-batches with the
/// same key are accumulated; a micro-batch with a different key first flushes what was
/// accumulated so far. [`EventTypeSectionHandler::end_of_stream`] flushes the last batch.
///
/// Flushing an update batch of a table with a column filter reclassifies its rows: rows entering
/// the filtered set are delivered as inserts, rows leaving it as deletes, rows outside of it on
/// both sides are dropped. Adjacent rows of the same kind are delivered in one action call, and
/// the order of the rows is preserved across calls.
///
/// A failed flush is handed to the [`RecoveryPolicy`], which decides whether the failure is
/// returned to the caller or ignored. When [`EventTypeSectionHandler::on_rows`] fails, the rows
/// that were not delivered stay available through [`EventTypeSectionHandler::pending_rows`]
/// whatever the decision. An end of stream always leaves the handler empty.
///
/// The handler is driven by a single task: every operation takes `&mut self` and completes all
/// action calls before returning.
#[derive(Debug)]
pub struct EventTypeSectionHandler<P = PropagateFailures> {
    tables: SchemaTables,
    policy: P,
    /// Key of the rows expected next. Also the key of `buffer` unless `retained_key` is set.
    last_key: Option<BatchKey>,
    buffer: Vec<ChangeRow>,
    /// Key of `buffer` when it holds the rows of an ignored failure rather than rows to flush.
    retained_key: Option<BatchKey>,
}

impl EventTypeSectionHandler<PropagateFailures> {
    /// Creates a handler propagating every failure.
    pub fn new(tables: SchemaTables) -> Self {
        Self::with_policy(tables, PropagateFailures)
    }
}

impl<P> EventTypeSectionHandler<P>
where
    P: RecoveryPolicy,
{
    /// Creates a handler consulting `policy` on failures.
    pub fn with_policy(tables: SchemaTables, policy: P) -> Self {
        Self {
            tables,
            policy,
            last_key: None,
            buffer: Vec::new(),
            retained_key: None,
        }
    }

    pub fn tables(&self) -> &SchemaTables {
        &self.tables
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns the key of the current batch, if any.
    pub fn last_key(&self) -> Option<&BatchKey> {
        self.last_key.as_ref()
    }

    /// Returns the rows that were received but not delivered yet.
    ///
    /// After an ignored failure, these are the rows that could not be delivered. They are
    /// discarded by the next [`EventTypeSectionHandler::on_rows`] or
    /// [`EventTypeSectionHandler::end_of_stream`] call.
    pub fn pending_rows(&self) -> &[ChangeRow] {
        &self.buffer
    }

    /// Takes the rows that were received but not delivered yet, leaving none pending.
    pub fn take_pending_rows(&mut self) -> Vec<ChangeRow> {
        self.retained_key = None;
        mem::take(&mut self.buffer)
    }

    /// Builds the recovery context of `error` from the current state of the handler.
    ///
    /// After an ignored failure the context carries the key of the rows that were not delivered,
    /// not the key the handler moved on to.
    pub fn recovery_context<'a>(&'a self, error: &'a BatchError) -> RecoveryContext<'a> {
        let key = self.retained_key.as_ref().or(self.last_key.as_ref());
        RecoveryContext::new(error, key, &self.buffer)
    }

    /// Handles a micro-batch of rows that all belong to `schema.table` and are of `kind`.
    ///
    /// If the key differs from the one of the current batch, the current batch is flushed first.
    /// When that flush fails and the failure is ignored, `rows` are skipped and the handler
    /// continues with the key of `rows`.
    pub async fn on_rows(
        &mut self,
        schema: &str,
        table: &str,
        kind: ChangeKind,
        rows: Vec<ChangeRow>,
    ) -> BatchResult<()> {
        if let Some(position) = rows.iter().position(|row| row.kind() != kind) {
            bail!(
                ErrorKind::InvalidData,
                "Micro-batch contains a row of another kind",
                format!(
                    "row {position} of a {kind} micro-batch for `{schema}.{table}` is a {} row",
                    rows[position].kind()
                )
            );
        }

        counter!(
            CDC_BATCH_ROWS_RECEIVED_TOTAL,
            SCHEMA_LABEL => schema.to_owned(),
            TABLE_LABEL => table.to_owned(),
            KIND_LABEL => kind.as_str(),
        )
        .increment(rows.len() as u64);

        self.discard_retained_rows();

        let same_key = self
            .last_key
            .as_ref()
            .is_some_and(|key| key.matches(schema, table, kind));

        if !same_key {
            let next_key = BatchKey::new(schema, table, kind);

            if let Err(err) = self.flush().await {
                return match self.handle_failure(err, false) {
                    Ok(()) => {
                        debug!(
                            key = %next_key,
                            rows = rows.len(),
                            "skipping micro-batch after ignored failure"
                        );

                        self.retained_key = self.last_key.replace(next_key);
                        Ok(())
                    }
                    Err(err) => Err(err),
                };
            }

            self.last_key = Some(next_key);
        }

        self.buffer.extend(rows);

        Ok(())
    }

    /// Flushes the current batch and resets the handler.
    ///
    /// The handler is left without a key and without pending rows whether the flush succeeds or
    /// not, so the instance can be reused for another stream.
    pub async fn end_of_stream(&mut self) -> BatchResult<()> {
        self.discard_retained_rows();

        let result = match self.flush().await {
            Ok(()) => Ok(()),
            Err(err) => self.handle_failure(err, true),
        };

        let undelivered = self.buffer.len();
        self.buffer.clear();
        self.last_key = None;
        self.retained_key = None;

        info!(
            undelivered,
            succeeded = result.is_ok(),
            "end of stream reached"
        );

        result
    }

    /// Delivers the current batch to the actions of its table.
    async fn flush(&mut self) -> BatchResult<()> {
        let Some(key) = self.last_key.as_ref() else {
            return Ok(());
        };

        if self.buffer.is_empty() {
            return Ok(());
        }

        let Some(actions) = self.tables.lookup(&key.schema, &key.table) else {
            bail!(
                ErrorKind::MissingTableConfig,
                "No table configuration for the rows being flushed",
                format!("table `{}.{}` is not registered", key.schema, key.table)
            );
        };

        debug!(%key, rows = self.buffer.len(), "flushing batch");

        histogram!(
            CDC_BATCH_FLUSH_SIZE,
            SCHEMA_LABEL => key.schema.clone(),
            TABLE_LABEL => key.table.clone(),
            KIND_LABEL => key.kind.as_str(),
        )
        .record(self.buffer.len() as f64);

        let action = actions.action().as_ref();
        match (key.kind, actions.column_filter()) {
            (ChangeKind::Update, Some(filter)) => {
                let reclassification = reclassify_updates(&mut self.buffer, filter.as_ref())?;

                counter!(
                    CDC_BATCH_ROWS_DROPPED_TOTAL,
                    SCHEMA_LABEL => key.schema.clone(),
                    TABLE_LABEL => key.table.clone(),
                )
                .increment(reclassification.dropped as u64);

                counter!(
                    CDC_BATCH_ROWS_RECLASSIFIED_TOTAL,
                    SCHEMA_LABEL => key.schema.clone(),
                    TABLE_LABEL => key.table.clone(),
                    KIND_LABEL => ChangeKind::Insert.as_str(),
                )
                .increment(reclassification.inserts as u64);

                counter!(
                    CDC_BATCH_ROWS_RECLASSIFIED_TOTAL,
                    SCHEMA_LABEL => key.schema.clone(),
                    TABLE_LABEL => key.table.clone(),
                    KIND_LABEL => ChangeKind::Delete.as_str(),
                )
                .increment(reclassification.deletes as u64);

                // Each run is drained from the front, so the lengths stay valid as runs complete.
                for (kind, len) in split_runs(&self.buffer) {
                    dispatch_run(key, action, &mut self.buffer, kind, len).await?;
                }
            }
            _ => {
                let len = self.buffer.len();
                dispatch_run(key, action, &mut self.buffer, key.kind, len).await?;
            }
        }

        Ok(())
    }

    /// Asks the policy what to do with a failed flush.
    ///
    /// Returns `Ok(())` if the failure is ignored. The pending rows are kept in both cases.
    fn handle_failure(&self, err: BatchError, during_end_of_stream: bool) -> BatchResult<()> {
        let context = self.recovery_context(&err);
        let decision = self.policy.recover(&context, during_end_of_stream);

        counter!(
            CDC_BATCH_FAILURES_TOTAL,
            SCHEMA_LABEL => context.schema().unwrap_or_default().to_owned(),
            TABLE_LABEL => context.table().unwrap_or_default().to_owned(),
            ERROR_KIND_LABEL => err.kind().as_str(),
            DECISION_LABEL => decision.as_str(),
        )
        .increment(1);

        match decision {
            RecoveryDecision::Ignore => {
                warn!(
                    summary = %context.summary(),
                    during_end_of_stream,
                    error = %err,
                    "ignoring failed flush"
                );

                Ok(())
            }
            RecoveryDecision::Propagate => {
                error!(
                    summary = %context.summary(),
                    during_end_of_stream,
                    error = %err,
                    "failed flush"
                );

                Err(err)
            }
        }
    }

    /// Drops the rows kept after an ignored failure, if any.
    fn discard_retained_rows(&mut self) {
        let Some(key) = self.retained_key.take() else {
            return;
        };

        if self.buffer.is_empty() {
            return;
        }

        warn!(
            %key,
            rows = self.buffer.len(),
            "discarding rows of an ignored failure"
        );

        counter!(
            CDC_BATCH_ROWS_DISCARDED_TOTAL,
            SCHEMA_LABEL => key.schema,
            TABLE_LABEL => key.table,
            KIND_LABEL => key.kind.as_str(),
        )
        .increment(self.buffer.len() as u64);

        self.buffer.clear();
    }
}
