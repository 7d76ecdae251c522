use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::BatchResult;
use crate::filter::{ColumnAccessor, ColumnFilter};

/// Wrapper around a [`ColumnFilter`] counting how many images it evaluated.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct CountingFilter<F> {
    wrapped_filter: F,
    evaluations: Arc<AtomicUsize>,
}

impl<F> CountingFilter<F> {
    pub fn wrap(filter: F) -> Self {
        Self {
            wrapped_filter: filter,
            evaluations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the number of evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

impl<F> ColumnFilter for CountingFilter<F>
where
    F: ColumnFilter,
{
    fn validate(&self, columns: &dyn ColumnAccessor) -> BatchResult<bool> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);
        self.wrapped_filter.validate(columns)
    }
}
