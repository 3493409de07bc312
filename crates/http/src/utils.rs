//! Utility macros used internally by the crate.

/// Returns early with `Err($error)` when `$predicate` does not hold.
///
/// Like `assert!`, but for validation that should fail the current operation
/// instead of panicking.
///
/// ```ignore
/// ensure!(line.len() <= MAX_LINE_BYTES, ParseError::too_long_line(line.len(), MAX_LINE_BYTES));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
