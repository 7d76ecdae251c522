//! Error types and result definitions for change-event batching.
//!
//! [`BatchError`] carries a classification ([`ErrorKind`]), a static description, optional dynamic
//! detail, an optional source error and the callsite where it was raised.

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::Location;
use std::sync::Arc;

use cdc_batch_config::shared::ValidationError;

/// Result type for handler operations.
pub type BatchResult<T> = Result<T, BatchError>;

/// Payload of a single [`BatchError`].
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

/// Main error type of the crate.
///
/// Errors raised by actions and column filters are expected to be built as [`BatchError`]s too,
/// with [`ErrorKind::ActionFailed`] and [`ErrorKind::FilterEvaluationFailed`] respectively, so the
/// recovery policy can classify them.
#[derive(Debug, Clone)]
pub struct BatchError {
    payload: ErrorPayload,
}

/// Classification of the failures the handler can surface.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Failures raised while handling rows
    /// An insert, update or delete action failed.
    ActionFailed,
    /// No table configuration is registered for the batch key being flushed.
    MissingTableConfig,
    /// The column filter could not evaluate a row image.
    FilterEvaluationFailed,

    // Data & state errors
    InvalidData,
    InvalidState,

    // Configuration errors
    ConfigError,

    // Special error kinds used by fault injection tests.
    #[cfg(feature = "failpoints")]
    WithIgnore,
    #[cfg(feature = "failpoints")]
    WithPropagate,
}

impl ErrorKind {
    /// Returns the name of the kind, as used in configuration and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActionFailed => "ActionFailed",
            Self::MissingTableConfig => "MissingTableConfig",
            Self::FilterEvaluationFailed => "FilterEvaluationFailed",
            Self::InvalidData => "InvalidData",
            Self::InvalidState => "InvalidState",
            Self::ConfigError => "ConfigError",
            #[cfg(feature = "failpoints")]
            Self::WithIgnore => "WithIgnore",
            #[cfg(feature = "failpoints")]
            Self::WithPropagate => "WithPropagate",
        }
    }

    /// Looks a kind up by the name returned from [`ErrorKind::as_str`].
    pub fn from_name(name: &str) -> Option<ErrorKind> {
        let kind = match name {
            "ActionFailed" => Self::ActionFailed,
            "MissingTableConfig" => Self::MissingTableConfig,
            "FilterEvaluationFailed" => Self::FilterEvaluationFailed,
            "InvalidData" => Self::InvalidData,
            "InvalidState" => Self::InvalidState,
            "ConfigError" => Self::ConfigError,
            #[cfg(feature = "failpoints")]
            "WithIgnore" => Self::WithIgnore,
            #[cfg(feature = "failpoints")]
            "WithPropagate" => Self::WithPropagate,
            _ => return None,
        };

        Some(kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BatchError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.payload.kind
    }

    /// Returns the static description of this error.
    pub fn description(&self) -> &str {
        self.payload.description.as_ref()
    }

    /// Returns the dynamic detail, if any.
    pub fn detail(&self) -> Option<&str> {
        self.payload.detail.as_deref()
    }

    /// Returns the captured backtrace.
    pub fn backtrace(&self) -> &Backtrace {
        self.payload.backtrace.as_ref()
    }

    /// Returns the callsite that created this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.payload.location
    }

    /// Attaches the originating error and returns the modified instance.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.payload.source = Some(Arc::new(source));
        self
    }

    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        BatchError {
            payload: ErrorPayload {
                kind,
                description,
                detail,
                source,
                location: Location::caller(),
                backtrace: Arc::new(Backtrace::capture()),
            },
        }
    }
}

impl PartialEq for BatchError {
    fn eq(&self, other: &BatchError) -> bool {
        self.payload.kind == other.payload.kind
    }
}

impl Hash for BatchError {
    /// Hashes only the kind and static description so that occurrences of the same failure
    /// group together regardless of their detail or location.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.payload.kind.hash(state);
        self.payload.description.hash(state);
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let payload = &self.payload;
        let location = payload.location;
        write!(
            f,
            "[{}] {} @ {}:{}:{}",
            payload.kind,
            payload.description,
            location.file(),
            location.line(),
            location.column()
        )?;

        write_detail(payload.detail.as_deref(), f)?;
        write_backtrace(payload.backtrace.as_ref(), f)
    }
}

impl error::Error for BatchError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.payload
            .source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn error::Error + 'static))
    }
}

fn write_backtrace(backtrace: &Backtrace, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rendered_backtrace = backtrace.to_string();
    if rendered_backtrace.trim().is_empty() {
        return Ok(());
    }

    write!(f, "\n  Backtrace:")?;
    for line in rendered_backtrace.lines() {
        write!(f, "\n    {}", line.trim_end())?;
    }

    Ok(())
}

fn write_detail(detail: Option<&str>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Some(detail) = detail else {
        return Ok(());
    };

    if detail.trim().is_empty() {
        return write!(f, "\n  Detail: <empty>");
    }

    write!(f, "\n  Detail:")?;
    for line in detail.lines() {
        write!(f, "\n    {}", line.trim_end())?;
    }

    Ok(())
}

impl From<(ErrorKind, &'static str)> for BatchError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> BatchError {
        BatchError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

impl<D> From<(ErrorKind, &'static str, D)> for BatchError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> BatchError {
        BatchError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

impl From<ValidationError> for BatchError {
    #[track_caller]
    fn from(err: ValidationError) -> BatchError {
        let detail = err.to_string();
        BatchError::from_components(
            ErrorKind::ConfigError,
            Cow::Borrowed("Handler configuration is invalid"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}
