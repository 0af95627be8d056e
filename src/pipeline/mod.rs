//! Worker orchestration: run configuration, process spawning, output
//! forwarding, the run log, and the worker-side command line.

mod config;
mod orchestrator;
mod process;
mod run_log;
mod stream;
mod worker;

pub use config::{format_group_id, Goal, RunConfig, WorkerMode};
pub use orchestrator::Orchestrator;
pub use process::{run_worker, run_worker_with, WorkerCommand, WorkerOutcome};
pub use run_log::{parse_progress_line, GroupStats, ProgressLine, RunLog, StageStats};
pub use stream::{filter_tagged_lines, INFO_TAG};
pub use worker::{run_worker_cli, WorkerArgs, WorkerStage};
