use std::process::ExitCode;

use super::commands::CommandResult;

/// Exit status of the `i18nify` binary.
///
/// - `Success` (0): every file was processed
/// - `Failure` (1): at least one fragment or file was left unchanged because of an error
/// - `Error` (2): the run could not start (invalid config, no usable locales, ...)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<&CommandResult> for ExitStatus {
    fn from(result: &CommandResult) -> Self {
        if result.error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::TransformSummary;

    #[test]
    fn test_status_from_result() {
        let ok = CommandResult::transform(TransformSummary::default());
        assert_eq!(ExitStatus::from(&ok), ExitStatus::Success);

        let refused = CommandResult::init(false);
        assert_eq!(ExitStatus::from(&refused), ExitStatus::Failure);
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }
}
