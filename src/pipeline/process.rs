use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncWrite, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::error::{PipelineError, Result};

use super::config::{RunConfig, WorkerMode};
use super::stream::{filter_tagged_lines, INFO_TAG};

/// Full argument vector of one worker invocation:
/// `<worker> [worker args..] --project <project> -- <stage args..>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    program: String,
    args: Vec<String>,
}

impl WorkerCommand {
    /// Builds the command for one stage of a run.
    #[must_use]
    pub fn new(config: &RunConfig, stage_args: Vec<String>) -> Self {
        Self::with_project(
            &config.worker.display().to_string(),
            &config.worker_args,
            &config.project,
            stage_args,
        )
    }

    /// Builds a command from its parts.
    #[must_use]
    pub fn with_project(
        program: &str,
        prefix: &[String],
        project: &Path,
        stage_args: Vec<String>,
    ) -> Self {
        let mut args = prefix.to_vec();
        args.push("--project".into());
        args.push(project.display().to_string());
        args.push("--".into());
        args.extend(stage_args);
        Self {
            program: program.to_string(),
            args,
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// What came back from one worker run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerOutcome {
    /// Exit code, or `None` if the worker was killed by a signal.
    pub exit_code: Option<i32>,
    /// Forwarded stdout lines, tag removed.
    pub stdout: Vec<String>,
    /// Forwarded stderr lines, tag removed.
    pub stderr: Vec<String>,
}

impl WorkerOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a worker to completion, forwarding its tagged output to this
/// process's stdout and stderr.
///
/// There is no timeout and no retry.
///
/// # Errors
///
/// Returns an error if the worker cannot be started or its streams fail.
pub async fn run_worker(command: &WorkerCommand, mode: WorkerMode) -> Result<WorkerOutcome> {
    match mode {
        WorkerMode::Streaming => {
            run_worker_with(command, tokio::io::stdout(), tokio::io::stderr()).await
        }
        WorkerMode::Blocking => {
            let status = Command::new(&command.program)
                .args(&command.args)
                .status()
                .await
                .map_err(|source| PipelineError::Spawn {
                    program: command.program.clone(),
                    source,
                })?;
            Ok(WorkerOutcome {
                exit_code: status.code(),
                ..WorkerOutcome::default()
            })
        }
    }
}

/// Runs a worker with piped output, draining stdout into `out` and stderr
/// into `err` concurrently.
///
/// Both streams are read to the end before the exit status is awaited, so
/// a worker that fills one pipe cannot stall.
///
/// # Errors
///
/// Returns an error if the worker cannot be started or its streams fail.
pub async fn run_worker_with<O, E>(
    command: &WorkerCommand,
    out: O,
    err: E,
) -> Result<WorkerOutcome>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    debug!(program = %command.program, args = ?command.args, "spawning worker");
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| PipelineError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or(PipelineError::StreamUnavailable("stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or(PipelineError::StreamUnavailable("stderr"))?;

    let (stdout_lines, stderr_lines) = tokio::join!(
        filter_tagged_lines(BufReader::new(stdout), out, INFO_TAG),
        filter_tagged_lines(BufReader::new(stderr), err, INFO_TAG),
    );
    let (stdout_lines, stderr_lines) = (stdout_lines?, stderr_lines?);

    let status = child.wait().await?;
    Ok(WorkerOutcome {
        exit_code: status.code(),
        stdout: stdout_lines,
        stderr: stderr_lines,
    })
}
