//! Fire-and-forget report dispatcher.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::{error, info, Instrument};

use marketstat_reporting::{Reporter, REPORT_SUBJECT};

use crate::db::StoreError;
use crate::mail::{Mailer, TransportError};
use crate::statistics::Aggregator;

use super::types::ReportJob;

/// Why a background report run was aborted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Gather → render → send, in sequence.
#[derive(Clone)]
pub struct ReportPipeline {
    aggregator: Aggregator,
    reporter: Reporter,
    mailer: Arc<dyn Mailer>,
}

impl ReportPipeline {
    pub fn new(aggregator: Aggregator, reporter: Reporter, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            aggregator,
            reporter,
            mailer,
        }
    }

    pub async fn run(&self, recipient: &str) -> Result<(), ReportError> {
        let stats = self.aggregator.compute_statistics().await?;
        let body = self.reporter.render(&stats);
        self.mailer.send(recipient, REPORT_SUBJECT, &body).await?;
        Ok(())
    }
}

impl core::fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("aggregator", &self.aggregator)
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

/// Dispatcher runtime statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatcherStats {
    pub accepted: u64,
    pub completed: u64,
    pub failed: u64,
}

impl DispatcherStats {
    pub fn in_flight(&self) -> u64 {
        self.accepted.saturating_sub(self.completed + self.failed)
    }
}

/// Accepts report requests and runs each one on a detached task.
///
/// `request_report` never waits on the pipeline: it records the request,
/// spawns, and returns. Terminal outcomes are visible only in logs and in
/// `stats()`.
#[derive(Debug, Clone)]
pub struct ReportDispatcher {
    pipeline: Arc<ReportPipeline>,
    stats: Arc<Mutex<DispatcherStats>>,
}

impl ReportDispatcher {
    pub fn new(pipeline: ReportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            stats: Arc::new(Mutex::new(DispatcherStats::default())),
        }
    }

    /// Schedule a report for `recipient`. Must be called from within a tokio
    /// runtime.
    pub fn request_report(&self, recipient: impl Into<String>) -> ReportJob {
        let job = ReportJob::accepted(recipient);
        if let Ok(mut s) = self.stats.lock() {
            s.accepted += 1;
        }
        info!(job_id = %job.id, recipient = %job.recipient, "report request accepted");

        let span = tracing::info_span!("report_job", job_id = %job.id);
        let pipeline = self.pipeline.clone();
        let stats = self.stats.clone();
        let mut running = job.clone();

        tokio::spawn(
            async move {
                running.mark_running();
                match pipeline.run(&running.recipient).await {
                    Ok(()) => {
                        running.mark_completed();
                        if let Ok(mut s) = stats.lock() {
                            s.completed += 1;
                        }
                        info!(
                            recipient = %running.recipient,
                            duration_ms = running.duration_ms().unwrap_or_default(),
                            "report delivered"
                        );
                    }
                    Err(e) => {
                        running.mark_failed(e.to_string());
                        if let Ok(mut s) = stats.lock() {
                            s.failed += 1;
                        }
                        error!(recipient = %running.recipient, error = %e, "report job failed");
                    }
                }
            }
            .instrument(span),
        );

        job
    }

    pub fn stats(&self) -> DispatcherStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }
}
