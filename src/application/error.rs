use std::time::Duration;

use thiserror::Error;

use crate::application::ports::BackendError;
use crate::config::LoadError;
use crate::infra::error::InfraError;

/// Ways a print job can end without a delivered document.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("print job failed: {message}")]
    JobFailed { message: String },
    #[error("print job finished without a download URL")]
    MissingDownloadUrl,
    #[error("print job still running after {polls} status checks")]
    Exhausted { polls: u32 },
    #[error("print job still running after {elapsed:?} ({polls} status checks)")]
    TimedOut { polls: u32, elapsed: Duration },
    #[error("print job cancelled after {polls} status checks")]
    Cancelled { polls: u32 },
}

impl PrintError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Backend(BackendError::Transport(_)) => "transport",
            Self::Backend(BackendError::Status { .. }) => "status",
            Self::Backend(BackendError::Decode(_)) => "decode",
            Self::Backend(BackendError::InvalidUrl(_)) => "invalid_url",
            Self::Backend(BackendError::Io(_)) => "io",
            Self::JobFailed { .. } => "job_failed",
            Self::MissingDownloadUrl => "missing_download_url",
            Self::Exhausted { .. } => "exhausted",
            Self::TimedOut { .. } => "timed_out",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Print(#[from] PrintError),
}
