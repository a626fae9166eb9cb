use cltsim_core::{Session, SessionConfig};
use log::info;

use super::{fail, fmt_opt, parse_spec};

#[allow(clippy::too_many_arguments)]
pub fn run(
    dist: &str,
    params: Option<&str>,
    sample_size: usize,
    replicates: usize,
    max_history: usize,
    seed: Option<u64>,
    progress: bool,
    output: Option<&str>,
) {
    let spec = parse_spec(dist, params).unwrap_or_else(|e| fail(e));

    let mut session = Session::new(SessionConfig {
        spec,
        sample_size,
        max_history,
        seed,
    })
    .unwrap_or_else(|e| fail(e));

    // Ctrl-C cancels the batch cooperatively; completed replicates remain.
    let token = session.cancel_token();
    let handler_installed = ctrlc::set_handler(move || token.cancel()).is_ok();
    if !handler_installed {
        info!("could not install Ctrl-C handler; batch will run uninterruptible");
    }

    if let Err(e) = session.draw_sample() {
        fail(e);
    }
    {
        let pool = session.pool().expect("pool was just drawn");
        println!(
            "Pool: {} observations from {} (mean {:.4}, sd {:.4})",
            pool.len(),
            session.spec(),
            pool.mean(),
            pool.std_dev()
        );
    }
    println!("Resampling {replicates} bootstrap replicates of size {sample_size}...\n");

    // Print at most ten progress lines regardless of batch size.
    let step = (replicates / 10).max(1);
    let appended = session
        .resample_batch_with(replicates, |p| {
            if progress && p.completed % step == 0 {
                println!(
                    "  {:>7}/{} replicates  (latest mean {:.4})",
                    p.completed, p.requested, p.replicate.mean
                );
            }
        })
        .unwrap_or_else(|e| fail(e));

    if appended < replicates {
        println!("Cancelled after {appended}/{replicates} replicates.\n");
    } else if progress {
        println!();
    }

    let stats = session.stats();
    let theoretical = session.theoretical_se();

    println!("{:<28} {:>12}", "Replicates", stats.count);
    println!("{}", "-".repeat(41));
    println!("{:<28} {:>12}", "Mean of replicates", fmt_opt(stats.mean));
    println!(
        "{:<28} {:>12}",
        "Empirical SE (sd, n-1)",
        fmt_opt(stats.std_dev)
    );
    println!(
        "{:<28} {:>12}",
        "Theoretical SE (σ/√n)",
        fmt_opt(theoretical)
    );
    if let (Some(empirical), Some(theoretical)) = (stats.std_dev, theoretical) {
        println!(
            "{:<28} {:>12.4}",
            "SE gap (empirical - theo)",
            empirical - theoretical
        );
    }
    println!("{:<28} {:>12}", "Min replicate mean", fmt_opt(stats.min));
    println!("{:<28} {:>12}", "Max replicate mean", fmt_opt(stats.max));

    if let Some(path) = output {
        let snapshot = session.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)
            .unwrap_or_else(|e| fail(format!("serializing snapshot: {e}")));
        if let Err(e) = std::fs::write(path, json) {
            fail(format!("writing {path}: {e}"));
        }
        println!("\nWrote session snapshot to {path}");
    }
}
