use super::fmt_opt;

/// Family name, parameter order, and default parameters for the table.
const FAMILIES: &[(&str, &str, &str)] = &[
    ("normal", "mean, std_dev", "100,15"),
    ("uniform", "low, high", "0,1"),
    ("exponential", "rate", "1"),
    (
        "bimodal",
        "mean_a, std_dev_a, mean_b, std_dev_b, weight",
        "35,8,65,8,0.5",
    ),
    ("student_t", "df", "5"),
    ("chi_squared", "df", "3"),
    ("fisher_f", "df1, df2", "5,10"),
    ("empirical", "value, value, ...", "1,2,3,4"),
];

pub fn run() {
    println!("Supported distribution families:\n");
    println!(
        "{:<13} {:<45} {:>10} {:>10}",
        "Family", "Parameters (--params order)", "Mean", "StdDev"
    );
    println!("{}", "-".repeat(81));

    for (family, params, defaults) in FAMILIES {
        // Moments shown for the default parameters; "—" where undefined.
        let spec = super::parse_spec(family, Some(defaults))
            .unwrap_or_else(|e| super::fail(format!("default params for {family}: {e}")));
        println!(
            "{:<13} {:<45} {:>10} {:>10}",
            family,
            params,
            fmt_opt(spec.mean()),
            fmt_opt(spec.std_dev())
        );
    }

    println!("\nMoments are for the default parameters shown by `cltsim sample --dist <family>`.");
    println!("student_t and fisher_f moments are undefined at low degrees of freedom.");
}
