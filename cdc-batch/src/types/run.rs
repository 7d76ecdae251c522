use crate::bail;
use crate::error::{BatchResult, ErrorKind};
use crate::types::{ChangeKind, ChangeRow, DeleteRow, InsertRow, UpdateRow};

/// A run of rows sharing one kind, delivered to an action in a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRun {
    Insert(Vec<InsertRow>),
    Update(Vec<UpdateRow>),
    Delete(Vec<DeleteRow>),
}

impl RowRun {
    /// Builds a run of `kind` from `rows`.
    ///
    /// Fails with [`ErrorKind::InvalidState`] if a row is not of `kind`.
    pub fn from_rows(kind: ChangeKind, mut rows: Vec<ChangeRow>) -> BatchResult<Self> {
        let len = rows.len();
        Self::drain_front(kind, &mut rows, len)
    }

    /// Moves the first `len` rows of `rows` into a run of `kind`.
    ///
    /// The rows are checked before anything is moved, so `rows` is left untouched on error.
    pub(crate) fn drain_front(
        kind: ChangeKind,
        rows: &mut Vec<ChangeRow>,
        len: usize,
    ) -> BatchResult<Self> {
        if len > rows.len() {
            bail!(
                ErrorKind::InvalidState,
                "Run is longer than the pending rows",
                format!("run of {len} rows requested from {} rows", rows.len())
            );
        }

        if let Some(position) = rows[..len].iter().position(|row| row.kind() != kind) {
            bail!(
                ErrorKind::InvalidState,
                "Run mixes rows of different kinds",
                format!(
                    "row {position} is a {} row in a {kind} run",
                    rows[position].kind()
                )
            );
        }

        let drained = rows.drain(..len);
        let run = match kind {
            ChangeKind::Insert => Self::Insert(
                drained
                    .filter_map(|row| match row {
                        ChangeRow::Insert(row) => Some(row),
                        _ => None,
                    })
                    .collect(),
            ),
            ChangeKind::Update => Self::Update(
                drained
                    .filter_map(|row| match row {
                        ChangeRow::Update(row) => Some(row),
                        _ => None,
                    })
                    .collect(),
            ),
            ChangeKind::Delete => Self::Delete(
                drained
                    .filter_map(|row| match row {
                        ChangeRow::Delete(row) => Some(row),
                        _ => None,
                    })
                    .collect(),
            ),
        };

        Ok(run)
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Insert(_) => ChangeKind::Insert,
            Self::Update(_) => ChangeKind::Update,
            Self::Delete(_) => ChangeKind::Delete,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Insert(rows) => rows.len(),
            Self::Update(rows) => rows.len(),
            Self::Delete(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Turns the run back into change rows, in order.
    pub fn into_rows(self) -> Vec<ChangeRow> {
        match self {
            Self::Insert(rows) => rows.into_iter().map(ChangeRow::Insert).collect(),
            Self::Update(rows) => rows.into_iter().map(ChangeRow::Update).collect(),
            Self::Delete(rows) => rows.into_iter().map(ChangeRow::Delete).collect(),
        }
    }
}
