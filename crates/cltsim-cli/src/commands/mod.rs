pub mod cohort;
pub mod list;
pub mod sample;
pub mod simulate;

use cltsim_core::DistributionSpec;

/// Default parameters per family, used when `--params` is omitted.
const DEFAULT_PARAMS: &[(&str, &str)] = &[
    ("normal", "100,15"),
    ("uniform", "0,1"),
    ("exponential", "1"),
    ("bimodal", "35,8,65,8,0.5"),
    ("student_t", "5"),
    ("chi_squared", "3"),
    ("fisher_f", "5,10"),
    ("empirical", "1,2,3,4"),
];

/// Build a validated [`DistributionSpec`] from CLI strings.
///
/// `params` is a comma-separated list in the family's documented order; when
/// omitted, the family default from `cltsim list` applies.
pub fn parse_spec(family: &str, params: Option<&str>) -> Result<DistributionSpec, String> {
    let family = family.to_lowercase();
    let params = match params {
        Some(p) => p.to_string(),
        None => DEFAULT_PARAMS
            .iter()
            .find(|(name, _)| *name == family)
            .map(|(_, p)| p.to_string())
            .ok_or_else(|| format!("--params is required for family '{family}'"))?,
    };

    let values: Vec<f64> = params
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", s.trim()))
        })
        .collect::<Result<_, _>>()?;

    let arity = |n: usize| -> Result<(), String> {
        if values.len() == n {
            Ok(())
        } else {
            Err(format!(
                "family '{family}' takes {n} parameter(s), got {}",
                values.len()
            ))
        }
    };

    let spec = match family.as_str() {
        "normal" => {
            arity(2)?;
            DistributionSpec::normal(values[0], values[1])
        }
        "uniform" => {
            arity(2)?;
            DistributionSpec::uniform(values[0], values[1])
        }
        "exponential" => {
            arity(1)?;
            DistributionSpec::exponential(values[0])
        }
        "bimodal" => {
            arity(5)?;
            DistributionSpec::bimodal(values[0], values[1], values[2], values[3], values[4])
        }
        "student_t" => {
            arity(1)?;
            DistributionSpec::student_t(values[0])
        }
        "chi_squared" => {
            arity(1)?;
            DistributionSpec::chi_squared(values[0])
        }
        "fisher_f" => {
            arity(2)?;
            DistributionSpec::fisher_f(values[0], values[1])
        }
        "empirical" => DistributionSpec::empirical(values),
        other => {
            return Err(format!(
                "unknown family '{other}' — run `cltsim list` for the supported set"
            ))
        }
    };

    spec.map_err(|e| e.to_string())
}

/// Format an optional statistic, rendering missing data explicitly.
pub fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "—".to_string(),
    }
}

/// Print an error and exit non-zero.
pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}
