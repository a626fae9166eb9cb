//! # cltsim-core
//!
//! **Watch the Central Limit Theorem happen.**
//!
//! `cltsim-core` is a bootstrap resampling and sampling-distribution
//! simulation engine: parametric samplers for the classic distribution
//! families, bootstrap resampling with replacement over a fixed observation
//! pool, running statistics over the replicate history, and a session state
//! machine that drives it all for an interactive front end.
//!
//! ## Quick Start
//!
//! ```
//! use cltsim_core::{DistributionSpec, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig {
//!     spec: DistributionSpec::normal(100.0, 15.0)?,
//!     sample_size: 30,
//!     max_history: 0, // default cap
//!     seed: Some(42),
//! })?;
//!
//! // Draw the original sample, then bootstrap 2000 replicates from it.
//! session.draw_sample()?;
//! session.resample_batch(2000)?;
//!
//! // Empirical SE of the replicate means converges to sigma / sqrt(n).
//! let stats = session.stats();
//! let empirical_se = stats.std_dev.expect("2000 replicates");
//! let theoretical_se = session.theoretical_se().expect("normal has a sigma");
//! assert!((empirical_se - theoretical_se).abs() < 1.0);
//! # Ok::<(), cltsim_core::SimError>(())
//! ```
//!
//! ## Architecture
//!
//! Sampler → Pool (fixed original sample) → Resampler → Replicate history →
//! Running statistics → snapshot for the renderer.
//!
//! The engine is synchronous and single-actor: batch resampling is a plain
//! loop with a cooperative cancel flag, and any per-step animation pacing is
//! the presentation layer's job (hook in through
//! [`Session::resample_batch_with`]). All randomness flows through a
//! caller-supplied [`rand::Rng`], so every run is reproducible under a fixed
//! seed.

pub mod cohort;
pub mod distribution;
pub mod error;
pub mod pool;
pub mod session;
pub mod stats;

pub use cohort::{Assignment, CohortSpec, CohortSummary, Subject};
pub use distribution::DistributionSpec;
pub use error::{SimError, SimResult};
pub use pool::{mean_variance, Replicate, SamplePool, VarianceMode};
pub use session::{
    BatchProgress, CancelToken, Session, SessionConfig, SessionSnapshot, SessionState,
};
pub use stats::{theoretical_se, ReplicateHistory, RunningStats, DEFAULT_MAX_HISTORY};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
