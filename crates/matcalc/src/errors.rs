//! Error handling and exit codes.

use matcalc_core::constants::exit_codes;
use matcalc_core::error::MatError;

/// Map a multiplication error to its exit code.
pub fn handle_error(err: &MatError) -> i32 {
    match err {
        MatError::DimensionMismatch { .. } | MatError::InvalidInput(_) => {
            exit_codes::ERROR_GENERIC
        }
        MatError::Config(_) => exit_codes::ERROR_CONFIG,
        MatError::Cancelled => exit_codes::ERROR_CANCELED,
        MatError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        MatError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
    }
}

/// Exit code for an application error; anything that is not a `MatError` is generic.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<MatError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn error_codes() {
        assert_eq!(handle_error(&MatError::Cancelled), 130);
        assert_eq!(handle_error(&MatError::Timeout("5m".into())), 2);
        assert_eq!(
            handle_error(&MatError::Mismatch {
                algorithm: "strassen".into(),
                max_diff: 1.0
            }),
            3
        );
        assert_eq!(handle_error(&MatError::Config("bad".into())), 4);
        assert_eq!(
            handle_error(&MatError::DimensionMismatch { left: 2, right: 3 }),
            1
        );
    }

    #[test]
    fn exit_code_sees_through_context() {
        let err = Err::<(), _>(MatError::Cancelled)
            .context("running benchmark")
            .unwrap_err();
        assert_eq!(exit_code(&err), 130);
    }

    #[test]
    fn foreign_errors_are_generic() {
        let err = anyhow::anyhow!("disk full");
        assert_eq!(exit_code(&err), 1);
    }
}
