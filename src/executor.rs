//! Bounded render executor
//!
//! Runs CPU-bound render jobs on the blocking thread pool with a hard cap on
//! concurrency and a per-job timeout.
//!
//! # Design
//!
//! ```text
//! submit() ── try_acquire(admission) ──✗──> EngineFailure { kind: "overloaded" }
//!                    │ ✓
//!                    ▼
//!            acquire(slot)  ◄─── queue wait (bounded by timeout)
//!                    │
//!                    ▼
//!            spawn_blocking(job)  ── both permits move into the job
//!                    │
//!                    ▼
//!     Success | EngineFailure | Timeout
//! ```
//!
//! A job that outlives its timeout is abandoned, not killed: the blocking
//! thread keeps its slot until the engine returns.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Semaphore, TryAcquireError};

use crate::config::RenderConfig;
use crate::engine::RenderError;
use crate::outcome::{RenderOutcome, KIND_PANIC};

/// Failure kind reported once the executor has been closed
pub const KIND_UNAVAILABLE: &str = "unavailable";

/// Fixed-size render worker pool
pub struct BoundedExecutor {
    /// One permit per worker slot
    slots: Arc<Semaphore>,
    /// One permit per admitted job (running or waiting for a slot)
    admission: Arc<Semaphore>,
    workers: usize,
    capacity: usize,
    completed: AtomicU64,
    rejected: AtomicU64,
    timed_out: AtomicU64,
}

impl BoundedExecutor {
    /// Create an executor with `workers` slots and room for `queue_depth`
    /// jobs waiting on a slot. `workers` is clamped to at least one.
    pub fn new(workers: usize, queue_depth: usize) -> Self {
        let workers = workers.max(1);
        let capacity = workers + queue_depth;
        Self {
            slots: Arc::new(Semaphore::new(workers)),
            admission: Arc::new(Semaphore::new(capacity)),
            workers,
            capacity,
            completed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            timed_out: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.workers, config.queue_depth)
    }

    /// Run `job` on a worker, waiting at most `timeout` for its result.
    ///
    /// Fails fast with an `overloaded` engine failure when every slot and
    /// queue position is taken.
    pub async fn submit<F>(&self, job: F, timeout: Duration) -> RenderOutcome
    where
        F: FnOnce() -> Result<Vec<u8>, RenderError> + Send + 'static,
    {
        let admission = match Arc::clone(&self.admission).try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    capacity = self.capacity,
                    workers = self.workers,
                    "Render pool saturated, rejecting job"
                );
                return RenderOutcome::overloaded();
            }
            Err(TryAcquireError::Closed) => {
                return RenderOutcome::engine_failure(KIND_UNAVAILABLE, "Render pool is shut down");
            }
        };

        let slots = Arc::clone(&self.slots);
        let started = Instant::now();
        let run = async move {
            let slot = slots.acquire_owned().await?;
            let handle = tokio::task::spawn_blocking(move || {
                let _slot = slot;
                let _admission = admission;
                job()
            });
            Ok::<_, tokio::sync::AcquireError>(handle.await)
        };

        match tokio::time::timeout(timeout, run).await {
            Ok(Ok(Ok(Ok(bytes)))) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    size_bytes = bytes.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Render job completed"
                );
                RenderOutcome::Success { bytes }
            }
            Ok(Ok(Ok(Err(e)))) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error = %e, error_debug = ?e, kind = e.kind(), "Render engine failed");
                RenderOutcome::from(e)
            }
            Ok(Ok(Err(join_error))) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
                if join_error.is_panic() {
                    tracing::error!("Render job panicked");
                    RenderOutcome::engine_failure(KIND_PANIC, "Render engine crashed")
                } else {
                    tracing::error!(error = %join_error, "Render job cancelled");
                    RenderOutcome::engine_failure(KIND_UNAVAILABLE, "Render job was cancelled")
                }
            }
            Ok(Err(_closed)) => {
                RenderOutcome::engine_failure(KIND_UNAVAILABLE, "Render pool is shut down")
            }
            Err(_elapsed) => {
                let total = self.timed_out.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    active = self.active(),
                    timed_out_total = total,
                    "Render job timed out and was abandoned"
                );
                RenderOutcome::Timeout { after: timeout }
            }
        }
    }

    /// Stop admitting new jobs. Running jobs are left to finish.
    pub fn close(&self) {
        self.admission.close();
        self.slots.close();
    }

    fn active(&self) -> usize {
        self.workers.saturating_sub(self.slots.available_permits())
    }

    /// Snapshot of pool utilization
    pub fn stats(&self) -> ExecutorStats {
        let in_flight = self.capacity.saturating_sub(self.admission.available_permits());
        let active = self.active();
        ExecutorStats {
            workers: self.workers,
            capacity: self.capacity,
            active,
            queued: in_flight.saturating_sub(active),
            completed: self.completed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            timed_out: self.timed_out.load(Ordering::Relaxed),
        }
    }
}

/// Pool statistics
#[derive(Debug, Clone, Serialize)]
pub struct ExecutorStats {
    /// Worker slots
    pub workers: usize,
    /// Worker slots plus queue positions
    pub capacity: usize,
    /// Slots currently occupied, including abandoned jobs
    pub active: usize,
    /// Admitted jobs waiting for a slot
    pub queued: usize,
    pub completed: u64,
    pub rejected: u64,
    pub timed_out: u64,
}
