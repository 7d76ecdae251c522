use std::sync::Arc;

use crate::action::EventTypeAction;
use crate::filter::{ColumnCondition, ColumnFilter, ConditionFilter};
use crate::tables::{SchemaTables, TableActions};

/// Builds a registry holding a single table.
pub fn single_table<A>(
    schema: &str,
    table: &str,
    action: A,
    column_filter: Option<Arc<dyn ColumnFilter>>,
) -> SchemaTables
where
    A: EventTypeAction + 'static,
{
    let mut actions = TableActions::new(Arc::new(action));
    if let Some(column_filter) = column_filter {
        actions = actions.with_column_filter(column_filter);
    }

    SchemaTables::new().with_table(schema, table, actions)
}

/// Filter holding for rows whose `status` column is `status`.
pub fn status_filter(status: &str) -> ConditionFilter {
    ConditionFilter::all([ColumnCondition::equal("status", status)])
}
