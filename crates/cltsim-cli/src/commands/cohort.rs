use cltsim_core::cohort::{generate, Assignment, CohortSpec, CohortSummary};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::fail;

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "—".to_string(),
    }
}

pub fn run(
    size: usize,
    prevalence: f64,
    rate_if_positive: f64,
    rate_if_negative: f64,
    exact_count: bool,
    seed: Option<u64>,
) {
    let spec = CohortSpec {
        size,
        prevalence,
        rate_if_positive,
        rate_if_negative,
        assignment: if exact_count {
            Assignment::ExactCount
        } else {
            Assignment::Bernoulli
        },
    };

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let subjects = generate(&spec, &mut rng).unwrap_or_else(|e| fail(e));
    let summary = CohortSummary::from_subjects(&subjects);

    println!(
        "Cohort of {} subjects (prevalence {:.1}%, {} label assignment)\n",
        summary.total,
        prevalence * 100.0,
        if exact_count { "exact-count" } else { "bernoulli" }
    );

    println!(
        "{:<18} {:>10} {:>12} {:>10}",
        "", "Outcome", "No outcome", "Total"
    );
    println!("{}", "-".repeat(53));
    println!(
        "{:<18} {:>10} {:>12} {:>10}",
        "Condition",
        summary.positive_with_outcome,
        summary.positive - summary.positive_with_outcome,
        summary.positive
    );
    println!(
        "{:<18} {:>10} {:>12} {:>10}",
        "No condition",
        summary.negative_with_outcome,
        summary.negative - summary.negative_with_outcome,
        summary.negative
    );
    println!(
        "{:<18} {:>10} {:>12} {:>10}",
        "Total",
        summary.outcome_total(),
        summary.total - summary.outcome_total(),
        summary.total
    );

    println!("\nObserved rates:");
    println!(
        "  P(outcome | condition)      {:>8}   (configured {:.1}%)",
        pct(summary.rate_given_positive()),
        rate_if_positive * 100.0
    );
    println!(
        "  P(outcome | no condition)   {:>8}   (configured {:.1}%)",
        pct(summary.rate_given_negative()),
        rate_if_negative * 100.0
    );

    // Bayes' rule on the configured rates, for comparison with the observed
    // posterior.
    let evidence =
        prevalence * rate_if_positive + (1.0 - prevalence) * rate_if_negative;
    let bayes = (evidence > 0.0).then(|| prevalence * rate_if_positive / evidence);

    println!("\nPosterior:");
    println!(
        "  P(condition | outcome)      {:>8}   (Bayes predicts {})",
        pct(summary.posterior_given_outcome()),
        pct(bayes)
    );
}
