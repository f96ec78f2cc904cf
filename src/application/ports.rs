//! Traits describing the print service, time and document delivery.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mapprint_api_types::{JobStatus, PrintRequest, SubmitResponse};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("print service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode print service response: {0}")]
    Decode(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("failed to store document: {0}")]
    Io(String),
}

impl BackendError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

/// A report request bound for the print service.
#[derive(Debug, Clone, Copy)]
pub struct ReportSubmission<'a> {
    pub app_id: &'a str,
    /// Output format as selected; the backend decides its URL casing.
    pub format: &'a str,
    pub request: &'a PrintRequest,
}

#[async_trait]
pub trait PrintBackend: Send + Sync {
    async fn submit(&self, submission: ReportSubmission<'_>)
    -> Result<SubmitResponse, BackendError>;

    async fn status(&self, status_path: &str) -> Result<JobStatus, BackendError>;

    /// Resolve a service-relative path (status or download) to a full URL.
    fn resolve(&self, path: &str) -> Result<Url, BackendError>;
}

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// What happened to a finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Saved { url: Url, path: PathBuf, bytes: usize },
    Linked { url: Url },
}

impl Delivery {
    pub fn url(&self) -> &Url {
        match self {
            Self::Saved { url, .. } | Self::Linked { url } => url,
        }
    }
}

#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn deliver(&self, url: Url) -> Result<Delivery, BackendError>;
}
