//! Sample pool and bootstrap resampler.
//!
//! A [`SamplePool`] is the fixed set of original observations drawn from a
//! [`DistributionSpec`]. Bootstrap replicates are produced by drawing
//! `pool.len()` indices uniformly with replacement and reducing the gathered
//! values to a mean and variance.
//!
//! The divisor asymmetry is deliberate and named: a single replicate reports
//! the **population** (`n` divisor) variance of its draw, while the spread of
//! replicate means across the whole history uses the unbiased (`n-1`) formula
//! — see [`VarianceMode`] and `stats::RunningStats`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distribution::DistributionSpec;
use crate::error::{SimError, SimResult};

/// Which divisor a variance computation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarianceMode {
    /// Divide by `n`. Used for the variance of a single resample draw.
    Population,
    /// Divide by `n - 1`. Used for the spread of replicate means (the
    /// empirical standard error).
    Sample,
}

/// Mean and variance of a slice under the given [`VarianceMode`].
///
/// Returns `None` for an empty slice, and for a single-element slice in
/// `Sample` mode (the `n-1` divisor is undefined there).
pub fn mean_variance(values: &[f64], mode: VarianceMode) -> Option<(f64, f64)> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    let variance = match mode {
        VarianceMode::Population => sum_sq / n as f64,
        VarianceMode::Sample => {
            if n < 2 {
                return None;
            }
            sum_sq / (n - 1) as f64
        }
    };
    Some((mean, variance))
}

/// One bootstrap resampling result: the derived statistics of a single
/// draw-with-replacement from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Replicate {
    /// Arithmetic mean of the drawn values.
    pub mean: f64,
    /// Population-variance (`n` divisor) of the drawn values.
    pub variance: f64,
}

/// An ordered, fixed-length set of observations — the "original sample" that
/// bootstrap replicates draw from. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePool {
    observations: Vec<f64>,
}

impl SamplePool {
    /// Draw a fresh pool of `n` observations from `spec`.
    pub fn draw(spec: &DistributionSpec, n: usize, rng: &mut impl Rng) -> SimResult<Self> {
        if n == 0 {
            return Err(SimError::InvalidSampleSize(0));
        }
        spec.validate()?;
        let observations = (0..n).map(|_| spec.sample(rng)).collect();
        Ok(Self { observations })
    }

    /// Wrap an existing set of observations as a pool.
    pub fn from_observations(observations: Vec<f64>) -> SimResult<Self> {
        if observations.is_empty() {
            return Err(SimError::InvalidSampleSize(0));
        }
        Ok(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The observations in draw order.
    pub fn values(&self) -> &[f64] {
        &self.observations
    }

    /// Mean of the pool itself (not of a resample).
    pub fn mean(&self) -> f64 {
        self.observations.iter().sum::<f64>() / self.observations.len() as f64
    }

    /// Population standard deviation of the pool itself.
    pub fn std_dev(&self) -> f64 {
        // Pool is never empty, so Population mode always yields a value.
        let (_, var) = mean_variance(&self.observations, VarianceMode::Population)
            .unwrap_or((0.0, 0.0));
        var.sqrt()
    }

    /// Draw one bootstrap replicate: `len()` indices uniformly with
    /// replacement, reduced to mean and population variance.
    pub fn resample(&self, rng: &mut impl Rng) -> SimResult<Replicate> {
        if self.observations.is_empty() {
            return Err(SimError::EmptyPool);
        }
        let n = self.observations.len();
        let draw: Vec<f64> = (0..n)
            .map(|_| self.observations[rng.random_range(0..n)])
            .collect();
        let (mean, variance) = mean_variance(&draw, VarianceMode::Population)
            .expect("resample draw is non-empty");
        Ok(Replicate { mean, variance })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn normal_spec() -> DistributionSpec {
        DistributionSpec::normal(100.0, 15.0).unwrap()
    }

    // -----------------------------------------------------------------------
    // mean_variance tests
    // -----------------------------------------------------------------------

    #[test]
    fn mean_variance_empty_is_none() {
        assert!(mean_variance(&[], VarianceMode::Population).is_none());
        assert!(mean_variance(&[], VarianceMode::Sample).is_none());
    }

    #[test]
    fn mean_variance_single_element() {
        let (mean, var) = mean_variance(&[7.0], VarianceMode::Population).unwrap();
        assert_eq!(mean, 7.0);
        assert_eq!(var, 0.0);
        // n-1 divisor undefined for a single element.
        assert!(mean_variance(&[7.0], VarianceMode::Sample).is_none());
    }

    #[test]
    fn mean_variance_divisors_differ() {
        let data = [2.0, 4.0, 6.0, 8.0];
        let (_, pop) = mean_variance(&data, VarianceMode::Population).unwrap();
        let (_, samp) = mean_variance(&data, VarianceMode::Sample).unwrap();
        assert!((pop - 5.0).abs() < 1e-12);
        assert!((samp - 20.0 / 3.0).abs() < 1e-12);
    }

    // -----------------------------------------------------------------------
    // Pool creation tests
    // -----------------------------------------------------------------------

    #[test]
    fn draw_pool_has_requested_length() {
        let mut r = rng(1);
        for n in [1, 2, 30, 500] {
            let pool = SamplePool::draw(&normal_spec(), n, &mut r).unwrap();
            assert_eq!(pool.len(), n);
        }
    }

    #[test]
    fn draw_pool_zero_is_invalid_sample_size() {
        let mut r = rng(2);
        assert_eq!(
            SamplePool::draw(&normal_spec(), 0, &mut r),
            Err(SimError::InvalidSampleSize(0))
        );
    }

    #[test]
    fn draw_pool_rejects_invalid_spec() {
        // Deserialized specs bypass the constructors; draw must still validate.
        let bad = DistributionSpec::Normal {
            mean: 0.0,
            std_dev: -1.0,
        };
        let mut r = rng(3);
        assert!(matches!(
            SamplePool::draw(&bad, 10, &mut r),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn from_observations_rejects_empty() {
        assert!(SamplePool::from_observations(vec![]).is_err());
        assert!(SamplePool::from_observations(vec![1.0]).is_ok());
    }

    #[test]
    fn draw_pool_is_deterministic_under_fixed_seed() {
        let a = SamplePool::draw(&normal_spec(), 30, &mut rng(42)).unwrap();
        let b = SamplePool::draw(&normal_spec(), 30, &mut rng(42)).unwrap();
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // Resample tests
    // -----------------------------------------------------------------------

    #[test]
    fn resample_of_singleton_pool_is_that_element() {
        let pool = SamplePool::from_observations(vec![4.25]).unwrap();
        let rep = pool.resample(&mut rng(5)).unwrap();
        assert_eq!(rep.mean, 4.25);
        assert_eq!(rep.variance, 0.0);
    }

    #[test]
    fn resample_mean_stays_within_pool_range() {
        let pool = SamplePool::from_observations(vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let mut r = rng(6);
        for _ in 0..200 {
            let rep = pool.resample(&mut r).unwrap();
            assert!((1.0..=5.0).contains(&rep.mean));
            assert!(rep.variance >= 0.0);
        }
    }

    #[test]
    fn resample_is_deterministic_under_fixed_seed() {
        let pool = SamplePool::draw(&normal_spec(), 30, &mut rng(7)).unwrap();
        let a = pool.resample(&mut rng(8)).unwrap();
        let b = pool.resample(&mut rng(8)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn resample_uses_population_variance() {
        // Pool of two distinct values: a draw of {1,3} has mean 2 and
        // population variance 1 (not the n-1 value of 2).
        let pool = SamplePool::from_observations(vec![1.0, 3.0]).unwrap();
        let mut r = rng(9);
        for _ in 0..500 {
            let rep = pool.resample(&mut r).unwrap();
            if (rep.mean - 2.0).abs() < 1e-12 {
                assert!((rep.variance - 1.0).abs() < 1e-12);
                return;
            }
        }
        panic!("expected at least one mixed draw in 500 resamples");
    }

    #[test]
    fn pool_summary_stats() {
        let pool = SamplePool::from_observations(vec![2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((pool.mean() - 5.0).abs() < 1e-12);
        assert!((pool.std_dev() - 5.0_f64.sqrt()).abs() < 1e-12);
    }
}
