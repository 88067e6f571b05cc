//! Job infrastructure: the in-memory registry, the runner that drives the
//! content pipeline, and the periodic sweep.
//!
//! # Architecture
//!
//! ```text
//! POST /api/generate
//!     │
//!     ├─► JobStore.create()            (status = pending)
//!     └─► spawn_job()                  (detached tokio task)
//!             │
//!             ├─► ContentGenerator.generate()
//!             │       └─► checkpoint() ─► JobStore.update() + ProgressHub.publish()
//!             └─► completed / failed   (terminal, never revisited)
//!
//! Sweeper (hourly) ─► JobStore.sweep(24h)
//! ```
//!
//! Records live only for the lifetime of the process. Each job has exactly
//! one writer (its runner task), so updates to different ids never conflict.

mod record;
mod runner;
mod store;
mod sweep;

pub use record::{GenerationResult, JobRecord, JobSpec, JobStatus, JobUpdate};
pub use runner::{run_job, spawn_job};
pub use store::JobStore;
pub use sweep::{start_sweeper, RETENTION_HOURS};
