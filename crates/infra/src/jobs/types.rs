//! Report job lifecycle types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Unique job identifier (used for log correlation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job execution status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Scheduled; the requester has been answered.
    Accepted,
    /// Aggregation, rendering and delivery in progress.
    Running,
    /// Report delivered.
    Completed,
    /// Aborted on the first error.
    Failed { error: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed { .. })
    }
}

/// A single report request.
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub id: JobId,
    pub recipient: String,
    pub status: JobStatus,
    pub accepted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ReportJob {
    pub fn accepted(recipient: impl Into<String>) -> Self {
        Self {
            id: JobId::new(),
            recipient: recipient.into(),
            status: JobStatus::Accepted,
            accepted_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self) {
        self.status = JobStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed {
            error: error.into(),
        };
        self.finished_at = Some(Utc::now());
    }

    /// Wall time spent running, once finished.
    pub fn duration_ms(&self) -> Option<u64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds().max(0) as u64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_lifecycle_success() {
        let mut job = ReportJob::accepted("x@y.com");
        assert_eq!(job.status, JobStatus::Accepted);
        assert!(!job.status.is_terminal());
        assert!(job.duration_ms().is_none());

        job.mark_running();
        assert_eq!(job.status, JobStatus::Running);
        assert!(!job.status.is_terminal());

        job.mark_completed();
        assert!(job.status.is_terminal());
        assert!(job.duration_ms().is_some());
    }

    #[test]
    fn job_lifecycle_failure_keeps_error() {
        let mut job = ReportJob::accepted("x@y.com");
        job.mark_running();
        job.mark_failed("relay unreachable");

        assert!(job.status.is_terminal());
        assert_eq!(
            job.status,
            JobStatus::Failed {
                error: "relay unreachable".into()
            }
        );
    }

    #[test]
    fn job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }
}
