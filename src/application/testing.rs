//! In-memory fakes for the print ports.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mapprint_api_types::{JobStatus, PrintRequest, SubmitResponse};
use url::Url;

use crate::application::ports::{
    BackendError, Clock, Delivery, DocumentSink, PrintBackend, ReportSubmission,
};

const ORIGIN: &str = "http://print.test/";

pub fn pending_status() -> JobStatus {
    JobStatus {
        done: false,
        status: Some("running".to_string()),
        status_url: None,
        download_url: None,
        error: None,
        elapsed_time: None,
        waiting_time: None,
    }
}

pub fn done(download_path: &str) -> JobStatus {
    JobStatus {
        done: true,
        status: Some("finished".to_string()),
        download_url: Some(download_path.to_string()),
        ..pending_status()
    }
}

pub fn failed(message: &str) -> JobStatus {
    JobStatus {
        done: true,
        status: Some("error".to_string()),
        error: Some(message.to_string()),
        ..pending_status()
    }
}

#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub app_id: String,
    pub format: String,
    pub request: PrintRequest,
}

/// Backend answering status checks from a script.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<JobStatus, BackendError>>>,
    fallback: Option<JobStatus>,
    stalled: bool,
    receipt: SubmitResponse,
    submissions: Mutex<Vec<RecordedSubmission>>,
    status_paths: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<JobStatus, BackendError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: None,
            stalled: false,
            receipt: SubmitResponse {
                reference: Some("r1".to_string()),
                status_url: "/print/print/status/r1.json".to_string(),
                download_url: Some("/print/print/report/r1".to_string()),
            },
            submissions: Mutex::new(Vec::new()),
            status_paths: Mutex::new(Vec::new()),
        }
    }

    /// Backend that reports the same status forever.
    pub fn repeating(status: JobStatus) -> Self {
        Self {
            fallback: Some(status),
            ..Self::new(Vec::new())
        }
    }

    /// Backend whose status checks never answer.
    pub fn stalled() -> Self {
        Self {
            stalled: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn status_calls(&self) -> usize {
        self.status_paths.lock().expect("status paths").len()
    }

    pub fn status_paths(&self) -> Vec<String> {
        self.status_paths.lock().expect("status paths").clone()
    }

    pub fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().expect("submissions").clone()
    }
}

#[async_trait]
impl PrintBackend for ScriptedBackend {
    async fn submit(
        &self,
        submission: ReportSubmission<'_>,
    ) -> Result<SubmitResponse, BackendError> {
        self.submissions
            .lock()
            .expect("submissions")
            .push(RecordedSubmission {
                app_id: submission.app_id.to_string(),
                format: submission.format.to_string(),
                request: submission.request.clone(),
            });
        Ok(self.receipt.clone())
    }

    async fn status(&self, status_path: &str) -> Result<JobStatus, BackendError> {
        self.status_paths
            .lock()
            .expect("status paths")
            .push(status_path.to_string());
        if self.stalled {
            return std::future::pending().await;
        }
        let next = self.script.lock().expect("script").pop_front();
        match next {
            Some(result) => result,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| BackendError::transport("status script exhausted")),
        }
    }

    fn resolve(&self, path: &str) -> Result<Url, BackendError> {
        Url::parse(ORIGIN)
            .and_then(|base| base.join(path))
            .map_err(|err| BackendError::InvalidUrl(err.to_string()))
    }
}

/// Clock whose sleeps return immediately and advance virtual time.
pub struct RecordingClock {
    state: Mutex<(Instant, Vec<Duration>)>,
}

impl RecordingClock {
    pub fn new() -> Self {
        Self {
            state: Mutex::new((Instant::now(), Vec::new())),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().expect("clock").1.clone()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    fn now(&self) -> Instant {
        self.state.lock().expect("clock").0
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().expect("clock");
        state.0 += duration;
        state.1.push(duration);
    }
}

/// Sink whose deliveries never finish.
pub struct StalledSink;

#[async_trait]
impl DocumentSink for StalledSink {
    async fn deliver(&self, _url: Url) -> Result<Delivery, BackendError> {
        std::future::pending().await
    }
}

/// Sink that records delivered URLs.
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Url>>,
}

impl RecordingSink {
    pub fn delivered(&self) -> Vec<Url> {
        self.delivered.lock().expect("delivered").clone()
    }
}

#[async_trait]
impl DocumentSink for RecordingSink {
    async fn deliver(&self, url: Url) -> Result<Delivery, BackendError> {
        self.delivered.lock().expect("delivered").push(url.clone());
        Ok(Delivery::Linked { url })
    }
}
