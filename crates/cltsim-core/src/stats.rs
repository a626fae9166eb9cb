//! Running statistics over the replicate history.
//!
//! The history is a capped, ordered sequence of replicate means. Statistics
//! are recomputed on demand with a single numerically stable Welford pass —
//! eviction at the cap makes a purely incremental accumulator unusable, and
//! histories are small enough (default cap 10 000) that a pass per read is
//! cheap.

use std::collections::VecDeque;

use serde::Serialize;

use crate::pool::Replicate;

/// Default cap on stored replicates; oldest entries are evicted beyond it.
pub const DEFAULT_MAX_HISTORY: usize = 10_000;

/// Derived view over the replicate history.
///
/// `count` is always the history length. The derived fields are `None` when
/// they are undefined — an empty history has no mean, and the unbiased
/// standard deviation needs at least two replicates. Consumers must render
/// `None` as "no data", never as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunningStats {
    pub count: usize,
    /// Mean of the replicate means.
    pub mean: Option<f64>,
    /// Unbiased (`n-1`) standard deviation of the replicate means — the
    /// empirical standard error.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RunningStats {
    fn empty() -> Self {
        Self {
            count: 0,
            mean: None,
            std_dev: None,
            min: None,
            max: None,
        }
    }
}

/// Theoretical standard error of the mean: `sigma / sqrt(n)`.
///
/// The pedagogical comparison point: as the history grows, the empirical
/// `RunningStats::std_dev` converges toward this value.
pub fn theoretical_se(sigma: f64, sample_size: usize) -> f64 {
    sigma / (sample_size as f64).sqrt()
}

/// Capped, ordered history of bootstrap replicates.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicateHistory {
    replicates: VecDeque<Replicate>,
    max_len: usize,
}

impl ReplicateHistory {
    /// Create an empty history holding at most `max_len` replicates.
    /// A cap of 0 is treated as the default.
    pub fn new(max_len: usize) -> Self {
        let max_len = if max_len == 0 {
            DEFAULT_MAX_HISTORY
        } else {
            max_len
        };
        Self {
            replicates: VecDeque::with_capacity(max_len.min(1024)),
            max_len,
        }
    }

    /// Append a replicate, evicting the oldest entry when at the cap.
    pub fn push(&mut self, replicate: Replicate) {
        if self.replicates.len() == self.max_len {
            self.replicates.pop_front();
        }
        self.replicates.push_back(replicate);
    }

    pub fn clear(&mut self) {
        self.replicates.clear();
    }

    pub fn len(&self) -> usize {
        self.replicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replicates.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Replicates in arrival order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &Replicate> {
        self.replicates.iter()
    }

    /// The replicate means in arrival order.
    pub fn means(&self) -> Vec<f64> {
        self.replicates.iter().map(|r| r.mean).collect()
    }

    /// Most recently appended replicate.
    pub fn latest(&self) -> Option<&Replicate> {
        self.replicates.back()
    }

    /// Compute the running statistics over the current contents.
    ///
    /// Welford single pass: count, mean, and M2 updated per element, min/max
    /// tracked alongside.
    pub fn stats(&self) -> RunningStats {
        if self.replicates.is_empty() {
            return RunningStats::empty();
        }

        let mut count = 0usize;
        let mut mean = 0.0f64;
        let mut m2 = 0.0f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for r in &self.replicates {
            let x = r.mean;
            count += 1;
            let delta = x - mean;
            mean += delta / count as f64;
            m2 += delta * (x - mean);
            min = min.min(x);
            max = max.max(x);
        }

        let std_dev = if count >= 2 {
            Some((m2 / (count - 1) as f64).sqrt())
        } else {
            None
        };

        RunningStats {
            count,
            mean: Some(mean),
            std_dev,
            min: Some(min),
            max: Some(max),
        }
    }
}

impl Default for ReplicateHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
