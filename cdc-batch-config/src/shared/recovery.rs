use serde::{Deserialize, Serialize};

/// Default answer given when an action fails.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryMode {
    /// Failures reach the transport, which is expected to stop the stream.
    #[default]
    Propagate,
    /// Failures are logged and processing resumes with the next batch key.
    Ignore,
}

/// Recovery behavior on action, filter and configuration failures.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RecoveryConfig {
    /// Default answer for every failure.
    #[serde(default)]
    pub mode: RecoveryMode,
    /// Error kinds that are ignored even when `mode` is [`RecoveryMode::Propagate`].
    ///
    /// Kinds are named as the handler's error kinds, for example `ActionFailed`.
    #[serde(default)]
    pub ignore_kinds: Vec<String>,
}
