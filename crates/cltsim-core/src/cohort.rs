//! Labeled-cohort generator for Bayesian inference demonstrations.
//!
//! Generates a population of subjects, each with a binary condition label
//! (prevalence `p`) and an independent binary outcome drawn at a
//! label-dependent rate — the setup behind a screening-test / base-rate
//! demonstration.
//!
//! Two label-assignment modes exist. `Bernoulli` draws each label
//! independently and is the default. `ExactCount` fixes the positive count at
//! exactly `round(size · p)` and shuffles label order, trading a small
//! deterministic rounding bias for reduced variance at small cohort sizes —
//! useful when consecutive animations of tiny cohorts should look alike.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// How condition labels are assigned across the cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// Independent Bernoulli draw per subject.
    #[default]
    Bernoulli,
    /// Exactly `round(size · prevalence)` positives, order shuffled.
    ExactCount,
}

/// Parameters for one generated cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSpec {
    /// Number of subjects.
    pub size: usize,
    /// Probability of the condition label.
    pub prevalence: f64,
    /// Outcome rate for subjects with the condition (e.g. test sensitivity).
    pub rate_if_positive: f64,
    /// Outcome rate for subjects without the condition (false positive rate).
    pub rate_if_negative: f64,
    #[serde(default)]
    pub assignment: Assignment,
}

impl CohortSpec {
    pub fn validate(&self) -> SimResult<()> {
        if self.size == 0 {
            return Err(SimError::InvalidSampleSize(0));
        }
        for (name, value) in [
            ("prevalence", self.prevalence),
            ("rate_if_positive", self.rate_if_positive),
            ("rate_if_negative", self.rate_if_negative),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::param(
                    "cohort",
                    format!("{name} must be in [0, 1] (got {value})"),
                ));
            }
        }
        Ok(())
    }
}

/// One generated subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Condition label (has the condition / belongs to group A).
    pub condition: bool,
    /// Secondary binary outcome (e.g. tested positive).
    pub outcome: bool,
}

/// Generate a cohort according to `spec`.
pub fn generate(spec: &CohortSpec, rng: &mut impl Rng) -> SimResult<Vec<Subject>> {
    spec.validate()?;

    let labels: Vec<bool> = match spec.assignment {
        Assignment::Bernoulli => (0..spec.size)
            .map(|_| rng.random::<f64>() < spec.prevalence)
            .collect(),
        Assignment::ExactCount => {
            let positives =
                ((spec.size as f64 * spec.prevalence).round() as usize).min(spec.size);
            let mut labels = vec![false; spec.size];
            for label in labels.iter_mut().take(positives) {
                *label = true;
            }
            labels.shuffle(rng);
            labels
        }
    };

    let subjects = labels
        .into_iter()
        .map(|condition| {
            let rate = if condition {
                spec.rate_if_positive
            } else {
                spec.rate_if_negative
            };
            Subject {
                condition,
                outcome: rng.random::<f64>() < rate,
            }
        })
        .collect();
    Ok(subjects)
}

/// Cross-tabulation of a generated cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CohortSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    /// Condition-positive subjects with the outcome (true positives).
    pub positive_with_outcome: usize,
    /// Condition-negative subjects with the outcome (false positives).
    pub negative_with_outcome: usize,
}

impl CohortSummary {
    pub fn from_subjects(subjects: &[Subject]) -> Self {
        let mut summary = Self {
            total: subjects.len(),
            positive: 0,
            negative: 0,
            positive_with_outcome: 0,
            negative_with_outcome: 0,
        };
        for s in subjects {
            if s.condition {
                summary.positive += 1;
                if s.outcome {
                    summary.positive_with_outcome += 1;
                }
            } else {
                summary.negative += 1;
                if s.outcome {
                    summary.negative_with_outcome += 1;
                }
            }
        }
        summary
    }

    pub fn outcome_total(&self) -> usize {
        self.positive_with_outcome + self.negative_with_outcome
    }

    /// Observed P(outcome | condition). `None` with no positive subjects.
    pub fn rate_given_positive(&self) -> Option<f64> {
        (self.positive > 0).then(|| self.positive_with_outcome as f64 / self.positive as f64)
    }

    /// Observed P(outcome | no condition). `None` with no negative subjects.
    pub fn rate_given_negative(&self) -> Option<f64> {
        (self.negative > 0).then(|| self.negative_with_outcome as f64 / self.negative as f64)
    }

    /// Observed posterior P(condition | outcome) — the Bayes-table punchline.
    /// `None` when no subject has the outcome.
    pub fn posterior_given_outcome(&self) -> Option<f64> {
        let outcomes = self.outcome_total();
        (outcomes > 0).then(|| self.positive_with_outcome as f64 / outcomes as f64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
