use fail::fail_point;

use crate::bail;
use crate::error::{BatchResult, ErrorKind};

pub const DISPATCH__BEFORE_ACTION: &str = "dispatch.before_action";

/// Fails with an error whose kind is chosen by the failpoint parameter.
///
/// The parameter `ignore` maps to [`ErrorKind::WithIgnore`] and `propagate` (the default) to
/// [`ErrorKind::WithPropagate`], so tests can drive both recovery decisions.
pub fn batch_fail_point(name: &str) -> BatchResult<()> {
    fail_point!(name, |parameter| {
        let mut error_kind = ErrorKind::WithPropagate;
        if let Some(parameter) = parameter {
            error_kind = match parameter.as_str() {
                "ignore" => ErrorKind::WithIgnore,
                "propagate" => ErrorKind::WithPropagate,
                _ => ErrorKind::WithPropagate,
            }
        }

        bail!(
            error_kind,
            "An error occurred in a fail point",
            format!("The failpoint '{name}' returned an error")
        );
    });

    Ok(())
}
