//! Status polling for submitted print jobs.
//!
//! After each status check that is not yet done the poller waits for the
//! current interval, then grows it by one step. Once the ceiling interval has
//! been waited the interval starts over from the initial value. Polling stops
//! when the job is done or failed, when a configured bound is hit, or when the
//! cancellation future resolves.

use std::future::Future;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use crate::application::error::PrintError;
use crate::application::ports::{Clock, PrintBackend};

pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(5_000);
pub const DEFAULT_INTERVAL_STEP: Duration = Duration::from_millis(5_000);
pub const DEFAULT_INTERVAL_CEILING: Duration = Duration::from_millis(25_000);

pub(crate) const METRIC_STATUS_POLLS: &str = "mapprint_status_polls_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub step: Duration,
    pub ceiling: Duration,
    /// Maximum number of status checks; `None` polls until done.
    pub max_attempts: Option<u32>,
    /// Maximum time spent polling; `None` waits indefinitely.
    pub max_elapsed: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            step: DEFAULT_INTERVAL_STEP,
            ceiling: DEFAULT_INTERVAL_CEILING,
            max_attempts: None,
            max_elapsed: None,
        }
    }
}

/// Escalating wait interval: initial, +step each time, reset after ceiling.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    step: Duration,
    ceiling: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(policy: &PollPolicy) -> Self {
        Self {
            initial: policy.initial_interval,
            step: policy.step,
            ceiling: policy.ceiling,
            current: policy.initial_interval,
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = if delay >= self.ceiling {
            self.initial
        } else {
            (delay + self.step).min(self.ceiling)
        };
        delay
    }
}

/// Polling result for a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub download_path: String,
    pub polls: u32,
}

pub struct StatusPoller<'a, B: ?Sized, C: ?Sized> {
    backend: &'a B,
    clock: &'a C,
    policy: PollPolicy,
}

impl<'a, B, C> StatusPoller<'a, B, C>
where
    B: PrintBackend + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(backend: &'a B, clock: &'a C, policy: PollPolicy) -> Self {
        Self {
            backend,
            clock,
            policy,
        }
    }

    pub async fn wait_for_document<F>(
        &self,
        status_path: &str,
        mut cancel: F,
    ) -> Result<Completion, PrintError>
    where
        F: Future<Output = ()> + Unpin,
    {
        let started = self.clock.now();
        let mut backoff = Backoff::new(&self.policy);
        let mut polls: u32 = 0;

        loop {
            let remaining = self.policy.max_elapsed.map(|limit| {
                limit.saturating_sub(self.clock.now().saturating_duration_since(started))
            });
            let deadline = async {
                match remaining {
                    Some(remaining) => self.clock.sleep(remaining).await,
                    None => std::future::pending::<()>().await,
                }
            };

            let status = tokio::select! {
                biased;
                () = &mut cancel => return Err(PrintError::Cancelled { polls }),
                status = self.backend.status(status_path) => status?,
                () = deadline => {
                    let elapsed = self.clock.now().saturating_duration_since(started);
                    warn!(polls, ?elapsed, "status check still pending at time limit");
                    return Err(PrintError::TimedOut { polls, elapsed });
                }
            };
            polls += 1;
            counter!(METRIC_STATUS_POLLS).increment(1);

            if status.is_failed() {
                let message = status
                    .error
                    .or(status.status)
                    .unwrap_or_else(|| "unknown error".to_string());
                return Err(PrintError::JobFailed { message });
            }
            if status.done {
                let download_path = status.download_url.ok_or(PrintError::MissingDownloadUrl)?;
                debug!(polls, download = %download_path, "print job done");
                return Ok(Completion {
                    download_path,
                    polls,
                });
            }

            if let Some(max) = self.policy.max_attempts {
                if polls >= max {
                    warn!(polls, "print job not done within status check limit");
                    return Err(PrintError::Exhausted { polls });
                }
            }

            let delay = backoff.next_delay();
            if let Some(limit) = self.policy.max_elapsed {
                let elapsed = self.clock.now().saturating_duration_since(started);
                if elapsed + delay > limit {
                    warn!(polls, ?elapsed, "print job not done within time limit");
                    return Err(PrintError::TimedOut { polls, elapsed });
                }
            }

            debug!(
                polls,
                status = status.status.as_deref().unwrap_or("pending"),
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "print job pending"
            );
            tokio::select! {
                biased;
                () = &mut cancel => return Err(PrintError::Cancelled { polls }),
                () = self.clock.sleep(delay) => {}
            }
        }
    }
}
