//! Job scheduling
//!
//! Work is split into independent units (one per job bucket, or one per
//! sequence range) and run on a fixed rayon pool. `run_phase` returns only
//! when every unit of the phase has finished, so consecutive phases are
//! separated by a barrier. The first fatal error cancels the remaining units
//! and is reported once.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::error::{Result, SaltError};

/// Shared cancellation flag that remembers the first error
#[derive(Debug, Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
    first_error: Mutex<Option<SaltError>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Cancelled)` once any worker has failed; workers call this at
    /// their loop heads
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(SaltError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Record a failure. Only the first real error is kept; `Cancelled`
    /// errors raised by siblings noticing the flag are dropped.
    pub fn cancel(&self, err: SaltError) {
        let mut slot = self.first_error.lock();
        if slot.is_none() && !matches!(err, SaltError::Cancelled) {
            error!("Cancelling search: {}", err);
            *slot = Some(err);
        }
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn take_error(&self) -> Option<SaltError> {
        self.first_error.lock().take()
    }
}

pub struct JobScheduler {
    pool: rayon::ThreadPool,
    token: CancellationToken,
}

impl JobScheduler {
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("salt-worker-{}", i))
            .build()
            .map_err(|e| SaltError::InvariantViolation(format!("failed to build thread pool: {}", e)))?;
        Ok(Self {
            pool,
            token: CancellationToken::new(),
        })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Run `units` independent units and wait for all of them. Units that
    /// have not started when a sibling fails are skipped.
    pub fn run_phase<F>(&self, name: &str, units: usize, work: F) -> Result<()>
    where
        F: Fn(usize) -> Result<()> + Sync,
    {
        self.token.check()?;
        debug!("Phase {}: {} units", name, units);
        let token = &self.token;
        self.pool.install(|| {
            (0..units).into_par_iter().for_each(|unit| {
                if token.is_cancelled() {
                    return;
                }
                if let Err(err) = work(unit) {
                    token.cancel(err);
                }
            })
        });
        if self.token.is_cancelled() {
            return Err(self.token.take_error().unwrap_or(SaltError::Cancelled));
        }
        Ok(())
    }
}
