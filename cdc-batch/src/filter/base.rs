use crate::error::BatchResult;
use crate::types::RowImage;

/// Read access to the columns of exactly one row image.
///
/// An accessor is handed to [`ColumnFilter::validate`] for the duration of a single evaluation,
/// so a filter can never observe a row other than the one being checked.
pub trait ColumnAccessor {
    /// Returns the value of `column`, or `None` if the image does not hold it.
    fn column(&self, column: &str) -> Option<&str>;
}

impl ColumnAccessor for RowImage {
    fn column(&self, column: &str) -> Option<&str> {
        self.get(column)
    }
}

/// Predicate over the columns of a row image.
///
/// Filters are stateless from the handler's point of view and may be shared between tables.
/// An evaluation failure should be reported with
/// [`ErrorKind::FilterEvaluationFailed`](crate::error::ErrorKind::FilterEvaluationFailed).
pub trait ColumnFilter: Send + Sync {
    /// Returns `true` if the image read through `columns` satisfies the filter.
    fn validate(&self, columns: &dyn ColumnAccessor) -> BatchResult<bool>;
}

impl<F> ColumnFilter for F
where
    F: Fn(&dyn ColumnAccessor) -> BatchResult<bool> + Send + Sync,
{
    fn validate(&self, columns: &dyn ColumnAccessor) -> BatchResult<bool> {
        self(columns)
    }
}
