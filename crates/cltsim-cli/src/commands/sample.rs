use cltsim_core::{Session, SessionConfig};

use super::{fail, fmt_opt, parse_spec};

pub fn run(dist: &str, params: Option<&str>, sample_size: usize, seed: Option<u64>) {
    let spec = parse_spec(dist, params).unwrap_or_else(|e| fail(e));

    let mut session = Session::new(SessionConfig {
        spec,
        sample_size,
        max_history: 0,
        seed,
    })
    .unwrap_or_else(|e| fail(e));

    if let Err(e) = session.draw_sample() {
        fail(e);
    }
    let pool = session.pool().expect("pool was just drawn");

    println!("Drew {} observations from {}\n", pool.len(), session.spec());

    let preview: Vec<String> = pool
        .values()
        .iter()
        .take(10)
        .map(|v| format!("{v:.3}"))
        .collect();
    let suffix = if pool.len() > 10 { ", ..." } else { "" };
    println!("  [{}{}]\n", preview.join(", "), suffix);

    println!("{:<22} {:>12} {:>12}", "", "Pool", "True");
    println!("{}", "-".repeat(48));
    println!(
        "{:<22} {:>12.4} {:>12}",
        "Mean",
        pool.mean(),
        fmt_opt(session.spec().mean())
    );
    println!(
        "{:<22} {:>12.4} {:>12}",
        "Std dev (population)",
        pool.std_dev(),
        fmt_opt(session.spec().std_dev())
    );
    println!(
        "{:<22} {:>25}",
        "Theoretical SE",
        fmt_opt(session.theoretical_se())
    );
}
