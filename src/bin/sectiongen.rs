use std::path::PathBuf;

use anyhow::{Context, Result};
use sectiongen::pipeline::{Orchestrator, RunConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        anyhow::bail!("usage: sectiongen <run-config.json>");
    };
    let config = RunConfig::load(&path)
        .with_context(|| format!("failed to load run configuration {}", path.display()))?;

    let orchestrator = Orchestrator::new(config);
    info!(log = %orchestrator.log_path().display(), "starting run");
    let log = orchestrator.run().await.context("run aborted")?;
    info!(goals = log.stages().len(), log = %log.path().display(), "run finished");
    Ok(())
}
