use std::collections::HashSet;
use std::fmt;

use cdc_batch_config::shared::{RecoveryConfig, RecoveryMode};

use crate::bail;
use crate::error::{BatchError, BatchResult, ErrorKind};
use crate::types::{BatchKey, ChangeKind, ChangeRow};

/// Snapshot of the handler state at the moment a flush failed.
///
/// The key is the one the failing rows were buffered under, captured before the handler moves on
/// to the incoming key. The rows are the live buffer of the handler, borrowed rather than copied:
/// they are the rows that were not delivered, starting with the rows of the failing action call.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryContext<'a> {
    error: &'a BatchError,
    key: Option<&'a BatchKey>,
    rows: &'a [ChangeRow],
}

impl<'a> RecoveryContext<'a> {
    pub(crate) fn new(
        error: &'a BatchError,
        key: Option<&'a BatchKey>,
        rows: &'a [ChangeRow],
    ) -> Self {
        Self { error, key, rows }
    }

    pub fn error(&self) -> &'a BatchError {
        self.error
    }

    pub fn key(&self) -> Option<&'a BatchKey> {
        self.key
    }

    pub fn schema(&self) -> Option<&'a str> {
        self.key.map(|key| key.schema.as_str())
    }

    pub fn table(&self) -> Option<&'a str> {
        self.key.map(|key| key.table.as_str())
    }

    pub fn kind(&self) -> Option<ChangeKind> {
        self.key.map(|key| key.kind)
    }

    /// Rows that were not delivered, in order.
    pub fn rows(&self) -> &'a [ChangeRow] {
        self.rows
    }

    /// One line description of the failure, meant for alerts.
    pub fn summary(&self) -> String {
        let key = match self.key {
            Some(key) => key.to_string(),
            None => "no batch".to_string(),
        };
        format!(
            "{key} failed with {} ({}), {} row(s) not delivered",
            self.error.kind(),
            self.error.description(),
            self.rows.len()
        )
    }
}

/// Outcome of a [`RecoveryPolicy`] decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryDecision {
    /// Swallow the failure and resume with the next rows.
    Ignore,
    /// Return the failure to the caller.
    Propagate,
}

impl RecoveryDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Propagate => "propagate",
        }
    }
}

impl fmt::Display for RecoveryDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides what happens to a failed flush.
///
/// `during_end_of_stream` is `true` when the failure happened in the final flush of a stream,
/// after which the handler is cleared whatever the decision.
pub trait RecoveryPolicy: Send + Sync {
    fn recover(
        &self,
        context: &RecoveryContext<'_>,
        during_end_of_stream: bool,
    ) -> RecoveryDecision;
}

impl<F> RecoveryPolicy for F
where
    F: Fn(&RecoveryContext<'_>, bool) -> RecoveryDecision + Send + Sync,
{
    fn recover(
        &self,
        context: &RecoveryContext<'_>,
        during_end_of_stream: bool,
    ) -> RecoveryDecision {
        self(context, during_end_of_stream)
    }
}

/// Propagates every failure. Used when no policy is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropagateFailures;

impl RecoveryPolicy for PropagateFailures {
    fn recover(
        &self,
        _context: &RecoveryContext<'_>,
        _during_end_of_stream: bool,
    ) -> RecoveryDecision {
        RecoveryDecision::Propagate
    }
}

/// Ignores every failure. The handler still logs each ignored failure as a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreFailures;

impl RecoveryPolicy for IgnoreFailures {
    fn recover(
        &self,
        _context: &RecoveryContext<'_>,
        _during_end_of_stream: bool,
    ) -> RecoveryDecision {
        RecoveryDecision::Ignore
    }
}

/// Policy built from a [`RecoveryConfig`].
///
/// In [`RecoveryMode::Ignore`] every failure is ignored. In [`RecoveryMode::Propagate`] a failure
/// is ignored only when its error kind is listed in `ignore_kinds`.
#[derive(Debug, Clone)]
pub struct ConfiguredRecovery {
    mode: RecoveryMode,
    ignore_kinds: HashSet<ErrorKind>,
}

impl ConfiguredRecovery {
    pub fn from_config(config: &RecoveryConfig) -> BatchResult<Self> {
        let mut ignore_kinds = HashSet::with_capacity(config.ignore_kinds.len());
        for name in &config.ignore_kinds {
            let Some(kind) = ErrorKind::from_name(name.trim()) else {
                bail!(
                    ErrorKind::ConfigError,
                    "Unknown error kind in recovery configuration",
                    format!("`{name}` is not an error kind")
                );
            };

            ignore_kinds.insert(kind);
        }

        Ok(Self {
            mode: config.mode,
            ignore_kinds,
        })
    }
}

impl RecoveryPolicy for ConfiguredRecovery {
    fn recover(
        &self,
        context: &RecoveryContext<'_>,
        _during_end_of_stream: bool,
    ) -> RecoveryDecision {
        match self.mode {
            RecoveryMode::Ignore => RecoveryDecision::Ignore,
            RecoveryMode::Propagate => {
                if self.ignore_kinds.contains(&context.error().kind()) {
                    RecoveryDecision::Ignore
                } else {
                    RecoveryDecision::Propagate
                }
            }
        }
    }
}
