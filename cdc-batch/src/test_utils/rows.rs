use crate::types::{ChangeRow, DeleteRow, InsertRow, RowImage, UpdateRow};

/// Builds a row image from `(column, value)` pairs.
pub fn image(columns: &[(&str, &str)]) -> RowImage {
    columns.iter().copied().collect()
}

pub fn insert_row(after: &[(&str, &str)]) -> ChangeRow {
    InsertRow::new(image(after)).into()
}

pub fn update_row(before: &[(&str, &str)], after: &[(&str, &str)]) -> ChangeRow {
    UpdateRow::new(image(before), image(after)).into()
}

pub fn delete_row(before: &[(&str, &str)]) -> ChangeRow {
    DeleteRow::new(image(before)).into()
}

/// Builds an update of row `id` whose `status` column goes from `before` to `after`.
pub fn status_update(id: &str, before: &str, after: &str) -> ChangeRow {
    update_row(&[("id", id), ("status", before)], &[("id", id), ("status", after)])
}

/// Builds an insert of row `id` with no other column.
pub fn insert_id(id: &str) -> ChangeRow {
    insert_row(&[("id", id)])
}

/// Builds a delete of row `id` with no other column.
pub fn delete_id(id: &str) -> ChangeRow {
    delete_row(&[("id", id)])
}
