use std::mem;

use crate::bail;
use crate::error::{BatchResult, ErrorKind};
use crate::filter::ColumnFilter;
use crate::types::{ChangeKind, ChangeRow};

/// Counts of what a reclassification did to a buffer of updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Reclassification {
    pub(crate) inserts: usize,
    pub(crate) deletes: usize,
    pub(crate) dropped: usize,
}

/// Rewrites a buffer of update rows according to `filter`.
///
/// Every row is checked twice, once with its before image and once with its after image:
///
/// | before | after | row becomes          |
/// |--------|-------|----------------------|
/// | false  | false | dropped              |
/// | false  | true  | insert of the after  |
/// | true   | false | delete of the before |
/// | true   | true  | unchanged update     |
///
/// All rows are evaluated before the buffer is touched, so if the filter fails on any row the
/// buffer is left exactly as it was.
pub(crate) fn reclassify_updates(
    rows: &mut Vec<ChangeRow>,
    filter: &dyn ColumnFilter,
) -> BatchResult<Reclassification> {
    let mut verdicts = Vec::with_capacity(rows.len());
    for (position, row) in rows.iter().enumerate() {
        let ChangeRow::Update(update) = row else {
            bail!(
                ErrorKind::InvalidState,
                "Only update rows can be reclassified",
                format!("row {position} is a {} row", row.kind())
            );
        };

        let before_valid = filter.validate(update.before())?;
        let after_valid = filter.validate(update.after())?;
        verdicts.push((before_valid, after_valid));
    }

    let mut reclassification = Reclassification::default();
    let updates = mem::replace(rows, Vec::with_capacity(verdicts.len()));
    for (row, verdict) in updates.into_iter().zip(verdicts) {
        let ChangeRow::Update(update) = row else {
            // Checked in the first pass.
            continue;
        };

        match verdict {
            (false, false) => reclassification.dropped += 1,
            (false, true) => {
                reclassification.inserts += 1;
                rows.push(update.into_insert().into());
            }
            (true, false) => {
                reclassification.deletes += 1;
                rows.push(update.into_delete().into());
            }
            (true, true) => rows.push(update.into()),
        }
    }

    Ok(reclassification)
}

/// Splits `rows` into maximal runs of adjacent rows of the same kind.
///
/// Returns the kind and length of each run, in order.
pub(crate) fn split_runs(rows: &[ChangeRow]) -> Vec<(ChangeKind, usize)> {
    let mut runs: Vec<(ChangeKind, usize)> = Vec::new();
    for row in rows {
        match runs.last_mut() {
            Some((kind, len)) if *kind == row.kind() => *len += 1,
            _ => runs.push((row.kind(), 1)),
        }
    }

    runs
}
