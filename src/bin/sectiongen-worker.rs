use anyhow::{Context, Result};
use sectiongen::pipeline::run_worker_cli;

fn main() -> Result<()> {
    // stdout carries the progress protocol; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let summaries = run_worker_cli(&args, std::io::stdout().lock()).context("worker failed")?;
    tracing::debug!(variants = summaries.len(), "worker done");
    Ok(())
}
