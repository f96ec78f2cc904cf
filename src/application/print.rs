//! Print workflow: transform, build, submit, poll, deliver.

use std::future::Future;

use metrics::{counter, histogram};
use tracing::{Instrument, error, info, info_span};

use crate::application::error::PrintError;
use crate::application::poll::{PollPolicy, StatusPoller};
use crate::application::ports::{Clock, Delivery, DocumentSink, PrintBackend, ReportSubmission};
use crate::application::request::{BuiltRequest, OverviewDefaults, PrintInputs, build_print_request};
use crate::application::transform::{TransformOptions, transform_layers};
use crate::domain::catalog::TileCatalog;
use crate::domain::snapshot::MapSnapshot;

pub(crate) const METRIC_SUBMISSIONS: &str = "mapprint_print_submissions_total";
pub(crate) const METRIC_FAILURES: &str = "mapprint_print_failures_total";
pub(crate) const METRIC_JOB_MS: &str = "mapprint_print_job_ms";

/// Everything the workflow needs besides the ports.
#[derive(Debug, Clone, Default)]
pub struct PrintProfile {
    pub catalog: TileCatalog,
    pub transform: TransformOptions,
    pub overview: OverviewDefaults,
    pub poll: PollPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOutcome {
    pub app_id: &'static str,
    pub reference: Option<String>,
    pub polls: u32,
    pub delivery: Delivery,
}

pub struct PrintService<B, C> {
    backend: B,
    clock: C,
    profile: PrintProfile,
}

impl<B, C> PrintService<B, C>
where
    B: PrintBackend,
    C: Clock,
{
    pub fn new(backend: B, clock: C, profile: PrintProfile) -> Self {
        Self {
            backend,
            clock,
            profile,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Build the request document for a snapshot without contacting the service.
    pub fn prepare(&self, snapshot: &MapSnapshot) -> BuiltRequest {
        let transformed = transform_layers(
            &snapshot.layers,
            &self.profile.catalog,
            &self.profile.transform,
        );
        build_print_request(
            PrintInputs {
                viewport: &snapshot.viewport,
                description: &snapshot.description,
                options: &snapshot.options,
            },
            transformed,
            &self.profile.overview,
        )
    }

    /// Run one print end to end. `cancel` abandons the job when it resolves.
    pub async fn print<S, F>(
        &self,
        snapshot: &MapSnapshot,
        sink: &S,
        cancel: F,
    ) -> Result<PrintOutcome, PrintError>
    where
        S: DocumentSink + ?Sized,
        F: Future<Output = ()>,
    {
        let built = self.prepare(snapshot);
        let app_id = built.app_id();
        let span = info_span!("print", app_id, format = %snapshot.options.format);

        let result = self
            .run(&built, &snapshot.options.format, sink, cancel)
            .instrument(span.clone())
            .await;

        span.in_scope(|| match &result {
            Ok(outcome) => info!(
                polls = outcome.polls,
                url = %outcome.delivery.url(),
                "print delivered"
            ),
            Err(err) => {
                counter!(METRIC_FAILURES, "kind" => err.kind()).increment(1);
                error!(error = %err, kind = err.kind(), "print abandoned");
            }
        });
        result
    }

    async fn run<S, F>(
        &self,
        built: &BuiltRequest,
        format: &str,
        sink: &S,
        cancel: F,
    ) -> Result<PrintOutcome, PrintError>
    where
        S: DocumentSink + ?Sized,
        F: Future<Output = ()>,
    {
        let started = self.clock.now();
        tokio::pin!(cancel);

        let submission = ReportSubmission {
            app_id: built.app_id(),
            format,
            request: &built.request,
        };
        let receipt = tokio::select! {
            biased;
            () = &mut cancel => return Err(PrintError::Cancelled { polls: 0 }),
            receipt = self.backend.submit(submission) => receipt?,
        };
        counter!(METRIC_SUBMISSIONS).increment(1);
        info!(
            reference = receipt.reference.as_deref().unwrap_or("-"),
            status_url = %receipt.status_url,
            "print job submitted"
        );

        let completion = StatusPoller::new(&self.backend, &self.clock, self.profile.poll)
            .wait_for_document(&receipt.status_url, &mut cancel)
            .await?;

        let url = self.backend.resolve(&completion.download_path)?;
        let delivery = tokio::select! {
            biased;
            () = &mut cancel => return Err(PrintError::Cancelled { polls: completion.polls }),
            delivery = sink.deliver(url) => delivery?,
        };
        histogram!(METRIC_JOB_MS)
            .record(self.clock.now().saturating_duration_since(started).as_secs_f64() * 1000.0);

        Ok(PrintOutcome {
            app_id: built.app_id(),
            reference: receipt.reference,
            polls: completion.polls,
            delivery,
        })
    }
}
