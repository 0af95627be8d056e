use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::answers::{AnswerGenerator, ProgressSink, VariantSummary, PROGRESS_HEADING};
use crate::assets::ShapeLibrary;
use crate::error::{OperationError, PipelineError, Result};

use super::stream::INFO_TAG;

/// What the worker was asked to do, parsed from the arguments after `--`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStage {
    Scenarios3d {
        out: PathBuf,
        group: String,
    },
    Scenarios2d {
        out: PathBuf,
        group: String,
        camera: u32,
    },
    Intersections {
        out: PathBuf,
        group: String,
    },
}

impl WorkerStage {
    /// Parses `<mode> <out> <group> [camera]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode is unknown or an argument is missing,
    /// extra or malformed.
    pub fn parse(args: &[String]) -> Result<Self> {
        let invalid = PipelineError::InvalidArguments;
        let [mode, out, group, rest @ ..] = args else {
            return Err(invalid(format!("expected <mode> <out> <group>, got {args:?}")).into());
        };
        let out = PathBuf::from(out);
        let group = group.clone();

        let stage = match (mode.as_str(), rest) {
            ("-ans", []) => Self::Intersections { out, group },
            ("-3d", []) => Self::Scenarios3d { out, group },
            ("-2d", [camera]) => {
                let camera = camera
                    .parse()
                    .map_err(|_| invalid(format!("camera must be a number, got {camera:?}")))?;
                Self::Scenarios2d { out, group, camera }
            }
            ("-ans" | "-3d" | "-2d", _) => {
                return Err(invalid(format!("wrong argument count for {mode}")).into());
            }
            _ => return Err(invalid(format!("unknown mode {mode:?}")).into()),
        };
        Ok(stage)
    }

    #[must_use]
    pub fn out(&self) -> &Path {
        match self {
            Self::Scenarios3d { out, .. }
            | Self::Scenarios2d { out, .. }
            | Self::Intersections { out, .. } => out,
        }
    }

    #[must_use]
    pub fn group(&self) -> &str {
        match self {
            Self::Scenarios3d { group, .. }
            | Self::Scenarios2d { group, .. }
            | Self::Intersections { group, .. } => group,
        }
    }
}

/// Full worker command line: `--project <library> -- <stage args..>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerArgs {
    pub project: PathBuf,
    pub stage: WorkerStage,
}

impl WorkerArgs {
    /// Parses the worker arguments, program name excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if `--project` or the `--` separator is missing, or
    /// the stage arguments are invalid.
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some(split) = args.iter().position(|a| a == "--") else {
            return Err(PipelineError::InvalidArguments("missing `--` separator".into()).into());
        };
        let (options, stage) = (&args[..split], &args[split + 1..]);

        let project = match options {
            [flag, project] if flag == "--project" => PathBuf::from(project),
            _ => {
                return Err(PipelineError::InvalidArguments(format!(
                    "expected --project <library>, got {options:?}"
                ))
                .into());
            }
        };
        Ok(Self {
            project,
            stage: WorkerStage::parse(stage)?,
        })
    }
}

/// Writes the worker progress protocol: a heading per shape and one line
/// per variant, each behind [`INFO_TAG`].
struct TaggedProgress<W> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TaggedProgress<W> {
    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        let result = writeln!(self.out, "{INFO_TAG}{line}").and_then(|()| self.out.flush());
        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}

impl<W: Write> ProgressSink for TaggedProgress<W> {
    fn shape_started(&mut self, _shape: &str) {
        self.emit(PROGRESS_HEADING);
    }

    fn variant_finished(&mut self, summary: &VariantSummary) {
        self.emit(&summary.progress_line());
    }
}

/// Runs one worker invocation, writing the progress protocol to `out`.
///
/// # Errors
///
/// Returns an error if the arguments are invalid, the library cannot be
/// loaded, the stage is not supported, or generation fails.
pub fn run_worker_cli<W: Write>(args: &[String], out: W) -> Result<Vec<VariantSummary>> {
    let args = WorkerArgs::parse(args)?;
    let WorkerStage::Intersections { out: out_dir, group } = &args.stage else {
        return Err(OperationError::Unsupported(format!(
            "{} export is not available in this worker",
            match &args.stage {
                WorkerStage::Scenarios2d { .. } => "2d scenario",
                _ => "3d scenario",
            }
        ))
        .into());
    };

    let library = ShapeLibrary::load(&args.project)?;
    let generator = AnswerGenerator::new(library.generation.clone())?;
    info!(group = %group, out = %out_dir.display(), "generating answers");

    let mut progress = TaggedProgress { out, error: None };
    let summaries = generator.export_group_with(&library, group, out_dir, &mut progress)?;
    if let Some(e) = progress.error {
        return Err(e.into());
    }
    Ok(summaries)
}
