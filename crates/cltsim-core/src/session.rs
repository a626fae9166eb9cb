//! Session controller: the UI-facing state machine over sampler, pool, and
//! replicate history.
//!
//! A session owns its [`SamplePool`] and [`ReplicateHistory`] exclusively;
//! renderers read immutable [`SessionSnapshot`]s after each mutating
//! operation. Batch resampling runs as a synchronous loop with a cooperative
//! cancel flag checked before every step — any per-step animation delay is a
//! presentation concern that belongs to the caller, driven through the
//! [`Session::resample_batch_with`] observer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::distribution::DistributionSpec;
use crate::error::{SimError, SimResult};
use crate::pool::{Replicate, SamplePool};
use crate::stats::{theoretical_se, ReplicateHistory, RunningStats, DEFAULT_MAX_HISTORY};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No pool drawn; resampling is refused.
    Idle,
    /// A pool exists; resampling is permitted.
    PoolReady,
    /// A batch resampling loop is actively running.
    Sampling,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::PoolReady => write!(f, "pool_ready"),
            Self::Sampling => write!(f, "sampling"),
        }
    }
}

/// Shared cooperative cancellation flag for batch resampling.
///
/// Clone the token out of the session and set it from a signal handler or a
/// presentation driver; the batch loop checks it before each step. Replicates
/// appended before cancellation remain in the history.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn re_arm(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Session parameters. Replaced piecewise through the `set_*` operations,
/// which force a fresh pool draw.
#[derive(Debug, Clone, Serialize)]
pub struct SessionConfig {
    pub spec: DistributionSpec,
    /// Observations per pool, and draws per replicate.
    pub sample_size: usize,
    /// Replicate history cap; oldest-eviction beyond it. 0 means default.
    pub max_history: usize,
    /// Seed for deterministic runs. `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            spec: DistributionSpec::Normal {
                mean: 0.0,
                std_dev: 1.0,
            },
            sample_size: 30,
            max_history: DEFAULT_MAX_HISTORY,
            seed: None,
        }
    }
}

/// Per-step progress report passed to the batch observer.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    /// Replicates appended so far in this batch (1-based).
    pub completed: usize,
    /// Replicates requested for this batch.
    pub requested: usize,
    /// The replicate just appended.
    pub replicate: Replicate,
}

/// Read-only view of the full session, sufficient for a renderer to redraw
/// without understanding sampling internals.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub spec: DistributionSpec,
    pub sample_size: usize,
    /// Pool observations in draw order; `None` until the first draw.
    pub pool: Option<Vec<f64>>,
    /// Replicates in arrival order (oldest first, capped).
    pub replicates: Vec<Replicate>,
    pub stats: RunningStats,
    /// `sigma / sqrt(n)` from the spec's true sigma; `None` when the spec has
    /// no finite standard deviation.
    pub theoretical_se: Option<f64>,
}

/// The session controller.
///
/// Generic over the RNG so tests can inject a seeded generator; production
/// code uses the [`StdRng`] constructors.
pub struct Session<R: Rng = StdRng> {
    spec: DistributionSpec,
    sample_size: usize,
    pool: Option<SamplePool>,
    history: ReplicateHistory,
    state: SessionState,
    cancel: CancelToken,
    rng: R,
}

impl Session<StdRng> {
    /// Create a session, seeding the RNG from the config (or the OS).
    pub fn new(config: SessionConfig) -> SimResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Session<R> {
    /// Create a session with an injected RNG.
    pub fn with_rng(config: SessionConfig, rng: R) -> SimResult<Self> {
        config.spec.validate()?;
        if config.sample_size == 0 {
            return Err(SimError::InvalidSampleSize(0));
        }
        Ok(Self {
            spec: config.spec,
            sample_size: config.sample_size,
            pool: None,
            history: ReplicateHistory::new(config.max_history),
            state: SessionState::Idle,
            cancel: CancelToken::default(),
            rng,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn spec(&self) -> &DistributionSpec {
        &self.spec
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn pool(&self) -> Option<&SamplePool> {
        self.pool.as_ref()
    }

    pub fn history(&self) -> &ReplicateHistory {
        &self.history
    }

    pub fn stats(&self) -> RunningStats {
        self.history.stats()
    }

    /// Theoretical standard error from the spec's true sigma and the sample
    /// size. `None` when the spec has no finite standard deviation.
    pub fn theoretical_se(&self) -> Option<f64> {
        self.spec
            .std_dev()
            .map(|sigma| theoretical_se(sigma, self.sample_size))
    }

    /// Token for cancelling an in-progress batch from a signal handler or
    /// presentation driver.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Request cancellation of the current batch.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Draw a fresh pool. Any state → `PoolReady`; clears the history and
    /// re-arms the cancel flag so a stale cancellation cannot kill the next
    /// batch.
    pub fn draw_sample(&mut self) -> SimResult<&SamplePool> {
        self.cancel.re_arm();
        let pool = SamplePool::draw(&self.spec, self.sample_size, &mut self.rng)?;
        debug!(
            "drew pool of {} from {} (mean {:.3})",
            pool.len(),
            self.spec,
            pool.mean()
        );
        self.history.clear();
        self.pool = Some(pool);
        self.state = SessionState::PoolReady;
        Ok(self.pool.as_ref().expect("pool was just set"))
    }

    /// Append one bootstrap replicate. Requires a pool.
    pub fn resample_once(&mut self) -> SimResult<Replicate> {
        let pool = self.pool.as_ref().ok_or(SimError::NoPool)?;
        let replicate = pool.resample(&mut self.rng)?;
        self.history.push(replicate);
        Ok(replicate)
    }

    /// Run `count` sequential replicates synchronously. Returns the number
    /// actually appended (less than `count` if cancelled).
    pub fn resample_batch(&mut self, count: usize) -> SimResult<usize> {
        self.resample_batch_with(count, |_| {})
    }

    /// Batch resampling with a per-step observer.
    ///
    /// `PoolReady → Sampling` for the duration of the loop, back to
    /// `PoolReady` on completion or cancellation. The cancel flag is checked
    /// before each step; replicates already appended remain.
    pub fn resample_batch_with<F>(&mut self, count: usize, mut observer: F) -> SimResult<usize>
    where
        F: FnMut(&BatchProgress),
    {
        if self.pool.is_none() {
            return Err(SimError::NoPool);
        }

        self.state = SessionState::Sampling;
        let mut completed = 0;
        for _ in 0..count {
            if self.cancel.is_cancelled() {
                debug!("batch cancelled after {completed}/{count} replicates");
                break;
            }
            // Pool presence was checked above and nothing in this loop
            // removes it.
            let pool = self.pool.as_ref().expect("pool present during batch");
            let replicate = pool.resample(&mut self.rng)?;
            self.history.push(replicate);
            completed += 1;
            observer(&BatchProgress {
                completed,
                requested: count,
                replicate,
            });
        }
        self.state = SessionState::PoolReady;
        self.cancel.re_arm();
        Ok(completed)
    }

    /// Clear pool and history. Any state → `Idle`. Idempotent.
    pub fn reset(&mut self) {
        self.pool = None;
        self.history.clear();
        self.state = SessionState::Idle;
        self.cancel.re_arm();
        debug!("session reset");
    }

    /// Replace the distribution. Forces `Idle`: a fresh pool must be drawn
    /// before any further resampling.
    pub fn set_distribution(&mut self, spec: DistributionSpec) -> SimResult<()> {
        spec.validate()?;
        self.spec = spec;
        self.reset();
        Ok(())
    }

    /// Replace the sample size. Forces `Idle` like [`Session::set_distribution`].
    pub fn set_sample_size(&mut self, sample_size: usize) -> SimResult<()> {
        if sample_size == 0 {
            return Err(SimError::InvalidSampleSize(0));
        }
        self.sample_size = sample_size;
        self.reset();
        Ok(())
    }

    /// Read-only snapshot for the rendering collaborator.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            spec: self.spec.clone(),
            sample_size: self.sample_size,
            pool: self.pool.as_ref().map(|p| p.values().to_vec()),
            replicates: self.history.iter().copied().collect(),
            stats: self.history.stats(),
            theoretical_se: self.theoretical_se(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
