//! Background report jobs.
//!
//! ## Design
//!
//! - A report request is accepted synchronously and executed on a detached
//!   tokio task; the caller gets no handle to it.
//! - One attempt per request: failures are logged and counted, never retried.
//! - The task owns its own store handle, independent of the request that
//!   scheduled it.
//!
//! ## Components
//!
//! - `ReportJob`: lifecycle record (Accepted → Running → Completed | Failed)
//! - `ReportPipeline`: gather → render → send
//! - `ReportDispatcher`: accepts requests and spawns the pipeline

pub mod dispatcher;
pub mod types;

pub use dispatcher::{DispatcherStats, ReportDispatcher, ReportError, ReportPipeline};
pub use types::{JobId, JobStatus, ReportJob};
