//! Macros for building and returning [`crate::error::BatchError`]s.

/// Creates a [`crate::error::BatchError`] from an error kind and a static description.
///
/// An optional third argument adds dynamic detail (anything implementing `ToString`) and an
/// optional `source:` argument attaches the originating error.
#[macro_export]
macro_rules! batch_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::BatchError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        $crate::error::BatchError::from(($kind, $desc)).with_source($source)
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::BatchError::from(($kind, $desc, $detail.to_string()))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        $crate::error::BatchError::from(($kind, $desc, $detail.to_string())).with_source($source)
    };
}

/// Returns early with a [`crate::error::BatchError`] built like [`batch_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::batch_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::batch_error!($kind, $desc, source: $source))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return ::core::result::Result::Err($crate::batch_error!($kind, $desc, $detail))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        return ::core::result::Result::Err($crate::batch_error!(
            $kind,
            $desc,
            $detail,
            source: $source
        ))
    };
}
