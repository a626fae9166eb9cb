//! Parametric distribution families and their samplers.
//!
//! A [`DistributionSpec`] identifies a family plus its parameters and is
//! immutable once constructed — changing the distribution means replacing the
//! spec wholesale. Construction validates parameters up front so that sampling
//! can never fail mid-batch.
//!
//! All samplers are hand-rolled on top of a caller-supplied [`Rng`]: Box–Muller
//! for normals, inverse CDF for the exponential, Marsaglia–Tsang for the
//! gamma-shaped families. No global randomness anywhere in this crate.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// A distribution family with validated parameters.
///
/// Construct through the family constructors ([`DistributionSpec::normal`] and
/// friends); specs arriving through deserialization should be re-checked with
/// [`DistributionSpec::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum DistributionSpec {
    Normal {
        mean: f64,
        std_dev: f64,
    },
    Uniform {
        low: f64,
        high: f64,
    },
    Exponential {
        rate: f64,
    },
    /// Two-normal mixture. `weight` is the probability of drawing from the
    /// first component.
    Bimodal {
        mean_a: f64,
        std_dev_a: f64,
        mean_b: f64,
        std_dev_b: f64,
        weight: f64,
    },
    StudentT {
        df: f64,
    },
    ChiSquared {
        df: f64,
    },
    FisherF {
        df1: f64,
        df2: f64,
    },
    /// Uniform draw from a fixed set of observed values.
    Empirical {
        values: Vec<f64>,
    },
}

impl DistributionSpec {
    pub fn normal(mean: f64, std_dev: f64) -> SimResult<Self> {
        let spec = Self::Normal { mean, std_dev };
        spec.validate()?;
        Ok(spec)
    }

    pub fn uniform(low: f64, high: f64) -> SimResult<Self> {
        let spec = Self::Uniform { low, high };
        spec.validate()?;
        Ok(spec)
    }

    pub fn exponential(rate: f64) -> SimResult<Self> {
        let spec = Self::Exponential { rate };
        spec.validate()?;
        Ok(spec)
    }

    pub fn bimodal(
        mean_a: f64,
        std_dev_a: f64,
        mean_b: f64,
        std_dev_b: f64,
        weight: f64,
    ) -> SimResult<Self> {
        let spec = Self::Bimodal {
            mean_a,
            std_dev_a,
            mean_b,
            std_dev_b,
            weight,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn student_t(df: f64) -> SimResult<Self> {
        let spec = Self::StudentT { df };
        spec.validate()?;
        Ok(spec)
    }

    pub fn chi_squared(df: f64) -> SimResult<Self> {
        let spec = Self::ChiSquared { df };
        spec.validate()?;
        Ok(spec)
    }

    pub fn fisher_f(df1: f64, df2: f64) -> SimResult<Self> {
        let spec = Self::FisherF { df1, df2 };
        spec.validate()?;
        Ok(spec)
    }

    pub fn empirical(values: Vec<f64>) -> SimResult<Self> {
        let spec = Self::Empirical { values };
        spec.validate()?;
        Ok(spec)
    }

    /// Check all parameters. Fails fast with [`SimError::InvalidParameter`]
    /// before any sampling occurs.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            Self::Normal { mean, std_dev } => {
                require_finite("normal", "mean", *mean)?;
                require_positive("normal", "std_dev", *std_dev)
            }
            Self::Uniform { low, high } => {
                require_finite("uniform", "low", *low)?;
                require_finite("uniform", "high", *high)?;
                if low < high {
                    Ok(())
                } else {
                    Err(SimError::param(
                        "uniform",
                        format!("low must be less than high (got low={low}, high={high})"),
                    ))
                }
            }
            Self::Exponential { rate } => require_positive("exponential", "rate", *rate),
            Self::Bimodal {
                mean_a,
                std_dev_a,
                mean_b,
                std_dev_b,
                weight,
            } => {
                require_finite("bimodal", "mean_a", *mean_a)?;
                require_finite("bimodal", "mean_b", *mean_b)?;
                require_positive("bimodal", "std_dev_a", *std_dev_a)?;
                require_positive("bimodal", "std_dev_b", *std_dev_b)?;
                if (0.0..=1.0).contains(weight) {
                    Ok(())
                } else {
                    Err(SimError::param(
                        "bimodal",
                        format!("weight must be in [0, 1] (got {weight})"),
                    ))
                }
            }
            Self::StudentT { df } => require_positive("student_t", "df", *df),
            Self::ChiSquared { df } => require_positive("chi_squared", "df", *df),
            Self::FisherF { df1, df2 } => {
                require_positive("fisher_f", "df1", *df1)?;
                require_positive("fisher_f", "df2", *df2)
            }
            Self::Empirical { values } => {
                if values.is_empty() {
                    return Err(SimError::param("empirical", "values must be non-empty"));
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(SimError::param(
                        "empirical",
                        format!("values must be finite (got {bad})"),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Family identifier, matching the CLI spelling.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Normal { .. } => "normal",
            Self::Uniform { .. } => "uniform",
            Self::Exponential { .. } => "exponential",
            Self::Bimodal { .. } => "bimodal",
            Self::StudentT { .. } => "student_t",
            Self::ChiSquared { .. } => "chi_squared",
            Self::FisherF { .. } => "fisher_f",
            Self::Empirical { .. } => "empirical",
        }
    }

    /// Draw one observation.
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        match self {
            Self::Normal { mean, std_dev } => mean + std_dev * standard_normal(rng),
            Self::Uniform { low, high } => low + (high - low) * rng.random::<f64>(),
            Self::Exponential { rate } => {
                // Inverse CDF. random() is in [0, 1), so 1 - u is in (0, 1]
                // and the log argument never hits zero.
                let u = rng.random::<f64>();
                -(1.0 - u).ln() / rate
            }
            Self::Bimodal {
                mean_a,
                std_dev_a,
                mean_b,
                std_dev_b,
                weight,
            } => {
                if rng.random::<f64>() < *weight {
                    mean_a + std_dev_a * standard_normal(rng)
                } else {
                    mean_b + std_dev_b * standard_normal(rng)
                }
            }
            Self::StudentT { df } => {
                let z = standard_normal(rng);
                let chi2 = sample_chi_squared(rng, *df);
                z / (chi2 / df).sqrt()
            }
            Self::ChiSquared { df } => sample_chi_squared(rng, *df),
            Self::FisherF { df1, df2 } => {
                let a = sample_chi_squared(rng, *df1) / df1;
                let b = sample_chi_squared(rng, *df2) / df2;
                a / b
            }
            Self::Empirical { values } => values[rng.random_range(0..values.len())],
        }
    }

    /// Theoretical mean, where it exists (Student-t needs df > 1, Fisher F
    /// needs df2 > 2).
    pub fn mean(&self) -> Option<f64> {
        match self {
            Self::Normal { mean, .. } => Some(*mean),
            Self::Uniform { low, high } => Some((low + high) / 2.0),
            Self::Exponential { rate } => Some(1.0 / rate),
            Self::Bimodal {
                mean_a,
                mean_b,
                weight,
                ..
            } => Some(weight * mean_a + (1.0 - weight) * mean_b),
            Self::StudentT { df } => (*df > 1.0).then_some(0.0),
            Self::ChiSquared { df } => Some(*df),
            Self::FisherF { df2, .. } => (*df2 > 2.0).then(|| df2 / (df2 - 2.0)),
            Self::Empirical { values } => {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            }
        }
    }

    /// Theoretical standard deviation, where it exists (Student-t needs
    /// df > 2, Fisher F needs df2 > 4). For the empirical family this is the
    /// population standard deviation of the fixed value set.
    pub fn std_dev(&self) -> Option<f64> {
        match self {
            Self::Normal { std_dev, .. } => Some(*std_dev),
            Self::Uniform { low, high } => Some((high - low) / 12.0_f64.sqrt()),
            Self::Exponential { rate } => Some(1.0 / rate),
            Self::Bimodal {
                mean_a,
                std_dev_a,
                mean_b,
                std_dev_b,
                weight,
            } => {
                let m = weight * mean_a + (1.0 - weight) * mean_b;
                let second_moment = weight * (std_dev_a * std_dev_a + mean_a * mean_a)
                    + (1.0 - weight) * (std_dev_b * std_dev_b + mean_b * mean_b);
                Some((second_moment - m * m).sqrt())
            }
            Self::StudentT { df } => (*df > 2.0).then(|| (df / (df - 2.0)).sqrt()),
            Self::ChiSquared { df } => Some((2.0 * df).sqrt()),
            Self::FisherF { df1, df2 } => (*df2 > 4.0).then(|| {
                let num = 2.0 * df2 * df2 * (df1 + df2 - 2.0);
                let den = df1 * (df2 - 2.0) * (df2 - 2.0) * (df2 - 4.0);
                (num / den).sqrt()
            }),
            Self::Empirical { values } => {
                let n = values.len() as f64;
                let mean = values.iter().sum::<f64>() / n;
                let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                Some(var.sqrt())
            }
        }
    }
}

impl std::fmt::Display for DistributionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal { mean, std_dev } => write!(f, "normal(μ={mean}, σ={std_dev})"),
            Self::Uniform { low, high } => write!(f, "uniform({low}, {high})"),
            Self::Exponential { rate } => write!(f, "exponential(λ={rate})"),
            Self::Bimodal {
                mean_a,
                std_dev_a,
                mean_b,
                std_dev_b,
                weight,
            } => write!(
                f,
                "bimodal({weight}·N({mean_a}, {std_dev_a}) + {:.3}·N({mean_b}, {std_dev_b}))",
                1.0 - weight
            ),
            Self::StudentT { df } => write!(f, "student_t(df={df})"),
            Self::ChiSquared { df } => write!(f, "chi_squared(df={df})"),
            Self::FisherF { df1, df2 } => write!(f, "fisher_f(df1={df1}, df2={df2})"),
            Self::Empirical { values } => write!(f, "empirical({} values)", values.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// Samplers
// ---------------------------------------------------------------------------

/// Standard normal draw via Box–Muller.
pub fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1 = rng.random::<f64>().clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Chi-squared draw for any df > 0 via the gamma relation χ²(k) = 2·Γ(k/2, 1).
fn sample_chi_squared(rng: &mut impl Rng, df: f64) -> f64 {
    2.0 * sample_gamma(rng, df / 2.0)
}

/// Gamma(shape, scale=1) draw, Marsaglia–Tsang squeeze method.
///
/// Shapes below 1 use the boost Γ(a) = Γ(a+1)·U^(1/a).
fn sample_gamma(rng: &mut impl Rng, shape: f64) -> f64 {
    if shape < 1.0 {
        let u = rng.random::<f64>().clamp(f64::MIN_POSITIVE, 1.0);
        return sample_gamma(rng, shape + 1.0) * u.powf(1.0 / shape);
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let x = standard_normal(rng);
        let v = (1.0 + c * x).powi(3);
        if v <= 0.0 {
            continue;
        }
        let u = rng.random::<f64>().clamp(f64::MIN_POSITIVE, 1.0);
        if u < 1.0 - 0.0331 * x.powi(4) {
            return d * v;
        }
        if u.ln() < 0.5 * x * x + d * (1.0 - v + v.ln()) {
            return d * v;
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_finite(family: &'static str, name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::param(
            family,
            format!("{name} must be finite (got {value})"),
        ))
    }
}

fn require_positive(family: &'static str, name: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::param(
            family,
            format!("{name} must be positive (got {value})"),
        ))
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

    fn sample_mean_sd(spec: &DistributionSpec, k: usize, seed: u64) -> (f64, f64) {
        let mut r = rng(seed);
        let draws: Vec<f64> = (0..k).map(|_| spec.sample(&mut r)).collect();
        let mean = draws.iter().sum::<f64>() / k as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (k - 1) as f64;
        (mean, var.sqrt())
    }

    // -----------------------------------------------------------------------
    // Validation tests
    // -----------------------------------------------------------------------

    #[test]
    fn normal_rejects_nonpositive_sigma() {
        assert!(DistributionSpec::normal(0.0, 0.0).is_err());
        assert!(DistributionSpec::normal(0.0, -1.0).is_err());
        assert!(DistributionSpec::normal(0.0, 1.0).is_ok());
    }

    #[test]
    fn uniform_rejects_inverted_bounds() {
        assert!(DistributionSpec::uniform(1.0, 1.0).is_err());
        assert!(DistributionSpec::uniform(2.0, 1.0).is_err());
        assert!(DistributionSpec::uniform(-1.0, 1.0).is_ok());
    }

    #[test]
    fn exponential_rejects_nonpositive_rate() {
        assert!(DistributionSpec::exponential(0.0).is_err());
        assert!(DistributionSpec::exponential(0.5).is_ok());
    }

    #[test]
    fn bimodal_rejects_weight_outside_unit_interval() {
        assert!(DistributionSpec::bimodal(0.0, 1.0, 5.0, 1.0, 1.5).is_err());
        assert!(DistributionSpec::bimodal(0.0, 1.0, 5.0, 1.0, -0.1).is_err());
        assert!(DistributionSpec::bimodal(0.0, 1.0, 5.0, 1.0, 0.5).is_ok());
    }

    #[test]
    fn empirical_rejects_empty_and_nonfinite() {
        assert!(DistributionSpec::empirical(vec![]).is_err());
        assert!(DistributionSpec::empirical(vec![1.0, f64::NAN]).is_err());
        assert!(DistributionSpec::empirical(vec![1.0, 2.0]).is_ok());
    }

    #[test]
    fn nan_parameters_rejected() {
        assert!(DistributionSpec::normal(f64::NAN, 1.0).is_err());
        assert!(DistributionSpec::student_t(f64::INFINITY).is_err());
    }

    // -----------------------------------------------------------------------
    // Theoretical moment tests
    // -----------------------------------------------------------------------

    #[test]
    fn normal_moments() {
        let spec = DistributionSpec::normal(100.0, 15.0).unwrap();
        assert_eq!(spec.mean(), Some(100.0));
        assert_eq!(spec.std_dev(), Some(15.0));
    }

    #[test]
    fn uniform_moments() {
        let spec = DistributionSpec::uniform(0.0, 12.0).unwrap();
        assert_eq!(spec.mean(), Some(6.0));
        let sd = spec.std_dev().unwrap();
        assert!((sd - 12.0 / 12.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn student_t_moments_undefined_at_low_df() {
        assert_eq!(DistributionSpec::student_t(1.0).unwrap().mean(), None);
        assert_eq!(DistributionSpec::student_t(2.0).unwrap().std_dev(), None);
        assert_eq!(DistributionSpec::student_t(3.0).unwrap().mean(), Some(0.0));
        let sd = DistributionSpec::student_t(5.0).unwrap().std_dev().unwrap();
        assert!((sd - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn fisher_f_moments_undefined_at_low_df2() {
        let spec = DistributionSpec::fisher_f(5.0, 2.0).unwrap();
        assert_eq!(spec.mean(), None);
        assert_eq!(spec.std_dev(), None);
        let spec = DistributionSpec::fisher_f(5.0, 10.0).unwrap();
        assert!((spec.mean().unwrap() - 1.25).abs() < 1e-12);
        assert!(spec.std_dev().is_some());
    }

    #[test]
    fn bimodal_mixture_moments() {
        // Equal mix of N(0,1) and N(10,1): mean 5, var = 1 + 25 = 26.
        let spec = DistributionSpec::bimodal(0.0, 1.0, 10.0, 1.0, 0.5).unwrap();
        assert!((spec.mean().unwrap() - 5.0).abs() < 1e-12);
        assert!((spec.std_dev().unwrap() - 26.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empirical_moments_are_population_moments() {
        let spec = DistributionSpec::empirical(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((spec.mean().unwrap() - 2.5).abs() < 1e-12);
        // Population variance of {1,2,3,4} is 1.25.
        assert!((spec.std_dev().unwrap() - 1.25_f64.sqrt()).abs() < 1e-12);
    }

    // -----------------------------------------------------------------------
    // Sampler sanity tests (seeded)
    // -----------------------------------------------------------------------

    #[test]
    fn normal_sampler_matches_moments() {
        let spec = DistributionSpec::normal(100.0, 15.0).unwrap();
        let (mean, sd) = sample_mean_sd(&spec, 20_000, 1);
        assert!((mean - 100.0).abs() < 0.5, "mean {mean}");
        assert!((sd - 15.0).abs() < 0.5, "sd {sd}");
    }

    #[test]
    fn uniform_sampler_stays_in_bounds() {
        let spec = DistributionSpec::uniform(-2.0, 3.0).unwrap();
        let mut r = rng(2);
        for _ in 0..1000 {
            let x = spec.sample(&mut r);
            assert!((-2.0..3.0).contains(&x));
        }
    }

    #[test]
    fn exponential_sampler_matches_moments() {
        let spec = DistributionSpec::exponential(0.5).unwrap();
        let (mean, sd) = sample_mean_sd(&spec, 50_000, 3);
        assert!((mean - 2.0).abs() < 0.1, "mean {mean}");
        assert!((sd - 2.0).abs() < 0.1, "sd {sd}");
    }

    #[test]
    fn exponential_sampler_is_nonnegative() {
        let spec = DistributionSpec::exponential(3.0).unwrap();
        let mut r = rng(4);
        for _ in 0..1000 {
            assert!(spec.sample(&mut r) >= 0.0);
        }
    }

    #[test]
    fn chi_squared_sampler_matches_moments() {
        let spec = DistributionSpec::chi_squared(4.0).unwrap();
        let (mean, sd) = sample_mean_sd(&spec, 50_000, 5);
        assert!((mean - 4.0).abs() < 0.1, "mean {mean}");
        assert!((sd - 8.0_f64.sqrt()).abs() < 0.1, "sd {sd}");
    }

    #[test]
    fn chi_squared_fractional_df() {
        // Exercises the shape < 1 gamma boost path.
        let spec = DistributionSpec::chi_squared(0.7).unwrap();
        let (mean, _) = sample_mean_sd(&spec, 50_000, 6);
        assert!((mean - 0.7).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn student_t_sampler_is_centered() {
        let spec = DistributionSpec::student_t(10.0).unwrap();
        let (mean, sd) = sample_mean_sd(&spec, 50_000, 7);
        assert!(mean.abs() < 0.05, "mean {mean}");
        let expected_sd = (10.0_f64 / 8.0).sqrt();
        assert!((sd - expected_sd).abs() < 0.1, "sd {sd}");
    }

    #[test]
    fn fisher_f_sampler_matches_mean() {
        let spec = DistributionSpec::fisher_f(6.0, 20.0).unwrap();
        let (mean, _) = sample_mean_sd(&spec, 50_000, 8);
        assert!((mean - 20.0 / 18.0).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn bimodal_sampler_matches_mixture_mean() {
        let spec = DistributionSpec::bimodal(0.0, 1.0, 10.0, 1.0, 0.5).unwrap();
        let (mean, _) = sample_mean_sd(&spec, 50_000, 9);
        assert!((mean - 5.0).abs() < 0.1, "mean {mean}");
    }

    #[test]
    fn empirical_sampler_only_returns_pool_values() {
        let values = vec![1.5, 2.5, 9.0];
        let spec = DistributionSpec::empirical(values.clone()).unwrap();
        let mut r = rng(10);
        for _ in 0..200 {
            let x = spec.sample(&mut r);
            assert!(values.contains(&x));
        }
    }

    #[test]
    fn sampling_is_deterministic_under_fixed_seed() {
        let spec = DistributionSpec::normal(0.0, 1.0).unwrap();
        let a: Vec<f64> = {
            let mut r = rng(42);
            (0..50).map(|_| spec.sample(&mut r)).collect()
        };
        let b: Vec<f64> = {
            let mut r = rng(42);
            (0..50).map(|_| spec.sample(&mut r)).collect()
        };
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // Serialization tests
    // -----------------------------------------------------------------------

    #[test]
    fn spec_serde_roundtrip() {
        let spec = DistributionSpec::normal(100.0, 15.0).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"family\":\"normal\""));
        let parsed: DistributionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, spec);
    }

    #[test]
    fn display_names_family() {
        let spec = DistributionSpec::chi_squared(3.0).unwrap();
        assert!(spec.to_string().starts_with("chi_squared"));
    }
}
