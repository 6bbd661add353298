use std::process::ExitCode;

/// Process exit status.
///
/// - `Success` (0): nothing left to rewrite, or the rewrite was applied
/// - `Failure` (1): templated log calls were found or would be rewritten
/// - `Error` (2): the run failed (bad config, unreadable snapshot, aborted commit)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
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
