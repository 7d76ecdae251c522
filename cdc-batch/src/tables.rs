//! Registry of the tables a handler knows how to deliver.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cdc_batch_config::shared::HandlerConfig;
use tracing::info;

use crate::action::EventTypeAction;
use crate::bail;
use crate::error::{BatchResult, ErrorKind};
use crate::filter::{ColumnFilter, ConditionFilter};

/// Everything the handler needs to deliver the rows of one table.
#[derive(Clone)]
pub struct TableActions {
    action: Arc<dyn EventTypeAction>,
    column_filter: Option<Arc<dyn ColumnFilter>>,
}

impl TableActions {
    /// Creates table actions delivering every row to `action`.
    pub fn new(action: Arc<dyn EventTypeAction>) -> Self {
        Self {
            action,
            column_filter: None,
        }
    }

    /// Sets the column filter used to reclassify update rows.
    pub fn with_column_filter(mut self, column_filter: Arc<dyn ColumnFilter>) -> Self {
        self.column_filter = Some(column_filter);
        self
    }

    pub fn action(&self) -> &Arc<dyn EventTypeAction> {
        &self.action
    }

    pub fn column_filter(&self) -> Option<&Arc<dyn ColumnFilter>> {
        self.column_filter.as_ref()
    }
}

impl fmt::Debug for TableActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableActions")
            .field("action", &self.action.name())
            .field("has_column_filter", &self.column_filter.is_some())
            .finish()
    }
}

/// Table actions indexed by schema and table name.
#[derive(Debug, Clone, Default)]
pub struct SchemaTables {
    tables: HashMap<String, HashMap<String, TableActions>>,
}

impl SchemaTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `actions` for `schema.table`, returning the actions previously registered.
    pub fn insert(
        &mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        actions: TableActions,
    ) -> Option<TableActions> {
        self.tables
            .entry(schema.into())
            .or_default()
            .insert(table.into(), actions)
    }

    /// Builder flavour of [`SchemaTables::insert`].
    pub fn with_table(
        mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        actions: TableActions,
    ) -> Self {
        self.insert(schema, table, actions);
        self
    }

    /// Returns the actions registered for `schema.table`, if any.
    pub fn lookup(&self, schema: &str, table: &str) -> Option<&TableActions> {
        self.tables.get(schema)?.get(table)
    }

    /// Returns the number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the registry described by `config`.
    ///
    /// The configuration is validated first. Column filters are compiled into
    /// [`ConditionFilter`]s and the action of every table is obtained from `resolver`, which is
    /// called once per configured table. A table for which `resolver` returns `None` fails the
    /// whole build with [`ErrorKind::ConfigError`].
    pub fn from_config<R>(config: &HandlerConfig, mut resolver: R) -> BatchResult<Self>
    where
        R: FnMut(&str, &str) -> Option<Arc<dyn EventTypeAction>>,
    {
        config.validate()?;

        let mut tables = Self::new();
        for table_config in &config.tables {
            let schema = table_config.schema.as_str();
            let table = table_config.table.as_str();

            let Some(action) = resolver(schema, table) else {
                bail!(
                    ErrorKind::ConfigError,
                    "No action is available for a configured table",
                    format!("table `{schema}.{table}` has no action")
                );
            };

            let mut actions = TableActions::new(action);
            if let Some(filter_config) = &table_config.column_filter {
                let filter = ConditionFilter::from_config(filter_config)?;
                actions = actions.with_column_filter(Arc::new(filter));
            }

            tables.insert(schema, table, actions);
        }

        info!(tables = tables.len(), "built table registry from configuration");

        Ok(tables)
    }
}
