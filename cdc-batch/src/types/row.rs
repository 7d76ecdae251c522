use crate::types::{ChangeKind, RowImage};

/// An inserted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertRow {
    after: RowImage,
}

impl InsertRow {
    /// Creates an inserted row from its image after the insertion.
    pub fn new(after: RowImage) -> Self {
        Self { after }
    }

    /// Returns the row as inserted.
    pub fn after(&self) -> &RowImage {
        &self.after
    }
}

/// An updated row, with its image before and after the update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRow {
    before: RowImage,
    after: RowImage,
}

impl UpdateRow {
    /// Creates an updated row.
    pub fn new(before: RowImage, after: RowImage) -> Self {
        Self { before, after }
    }

    /// Returns the row before the update.
    pub fn before(&self) -> &RowImage {
        &self.before
    }

    /// Returns the row after the update.
    pub fn after(&self) -> &RowImage {
        &self.after
    }

    /// Projects the update onto an insert of its after image.
    ///
    /// Used when the row only starts matching a table's column filter with this update.
    pub fn into_insert(self) -> InsertRow {
        InsertRow { after: self.after }
    }

    /// Projects the update onto a delete of its before image.
    ///
    /// Used when the row stops matching a table's column filter with this update.
    pub fn into_delete(self) -> DeleteRow {
        DeleteRow {
            before: self.before,
        }
    }
}

/// A deleted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRow {
    before: RowImage,
}

impl DeleteRow {
    /// Creates a deleted row from its image before the deletion.
    pub fn new(before: RowImage) -> Self {
        Self { before }
    }

    /// Returns the row as it was before being deleted.
    pub fn before(&self) -> &RowImage {
        &self.before
    }
}

/// A single row mutation captured from the change log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRow {
    Insert(InsertRow),
    Update(UpdateRow),
    Delete(DeleteRow),
}

impl ChangeRow {
    /// Returns the [`ChangeKind`] of this row.
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeRow::Insert(_) => ChangeKind::Insert,
            ChangeRow::Update(_) => ChangeKind::Update,
            ChangeRow::Delete(_) => ChangeKind::Delete,
        }
    }
}

impl From<InsertRow> for ChangeRow {
    fn from(row: InsertRow) -> Self {
        ChangeRow::Insert(row)
    }
}

impl From<UpdateRow> for ChangeRow {
    fn from(row: UpdateRow) -> Self {
        ChangeRow::Update(row)
    }
}

impl From<DeleteRow> for ChangeRow {
    fn from(row: DeleteRow) -> Self {
        ChangeRow::Delete(row)
    }
}
