//! Energy-manager microgrid demonstration entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ems_microapp::cli::Args;
use ems_microapp::pipeline;
use ems_microapp::solver::PeakShavingSolver;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose {
        "ems_microapp=debug"
    } else {
        "ems_microapp=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();

    let options = args.run_options();
    let report = pipeline::run(&PeakShavingSolver, &options).with_context(|| {
        format!(
            "microapp run failed (config {}, profiles {})",
            options.config_path.display(),
            options.profiles_path.display()
        )
    })?;

    println!("{}", report.summary);
    println!(
        "Solver:                {} ({}, {:.3} s)",
        report.solver_info.solver,
        report.solver_info.status,
        report.solver_info.elapsed.as_secs_f64()
    );
    Ok(())
}
