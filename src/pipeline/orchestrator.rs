use std::fs;
use std::path::Path;
use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use crate::error::Result;

use super::config::{format_group_id, Goal, RunConfig};
use super::process::{run_worker, WorkerCommand};
use super::run_log::{GroupStats, RunLog, StageStats};

/// Drives the worker over every goal of a run configuration.
#[derive(Debug)]
pub struct Orchestrator {
    config: RunConfig,
    log: RunLog,
}

impl Orchestrator {
    /// Creates an orchestrator; the run log is named after the current time.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        let log = RunLog::new(&config.working_directory, &config.name, Local::now());
        Self { config, log }
    }

    #[must_use]
    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Runs every goal in order, groups strictly one after another.
    ///
    /// The log file is rewritten after each goal. A worker that exits with
    /// a non-zero code is recorded and the run moves on.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the log cannot be written, or a
    /// worker cannot be started.
    pub async fn run(mut self) -> Result<RunLog> {
        let goals = self.config.goals.clone();
        for (index, goal) in goals.iter().enumerate() {
            let stats = self.run_goal(goal).await?;
            info!(
                goal = goal.kind(),
                groups = stats.groups.len(),
                elapsed = stats.elapsed_seconds,
                "goal finished"
            );
            self.log.record(index, goal.kind(), stats);
            self.log.write()?;
        }
        Ok(self.log)
    }

    async fn run_goal(&self, goal: &Goal) -> Result<StageStats> {
        let started = Instant::now();
        let out_root = self.config.working_directory.join(goal.out());
        fs::create_dir_all(&out_root)?;

        let mut stage = StageStats::default();
        for &id in goal.groups() {
            let group_id = format_group_id(id);
            let out_dir = out_root.join(&group_id);
            fs::create_dir_all(&out_dir)?;

            let command = WorkerCommand::new(&self.config, goal.worker_args(&out_dir, &group_id));
            let group_started = Instant::now();
            let outcome = run_worker(&command, self.config.mode).await?;
            if !outcome.success() {
                warn!(group = %group_id, exit_code = ?outcome.exit_code, "worker failed");
            }

            let mut stats = GroupStats {
                elapsed_seconds: group_started.elapsed().as_secs_f64(),
                exit_code: outcome.exit_code,
                ..GroupStats::default()
            };
            stats.absorb(outcome.stdout.iter().map(String::as_str));
            stage.groups.insert(group_id, stats);
        }
        stage.elapsed_seconds = started.elapsed().as_secs_f64();
        Ok(stage)
    }
}
