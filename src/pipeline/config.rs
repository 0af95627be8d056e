use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// How the orchestrator waits for a worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkerMode {
    /// Pipe both output streams and forward the tagged lines.
    #[default]
    Streaming,
    /// Let the worker inherit the streams and wait for it to exit.
    Blocking,
}

/// One stage of a run: a worker mode applied to a list of groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Goal {
    #[serde(rename = "scenarios-3d")]
    Scenarios3d { groups: Vec<u32>, out: PathBuf },
    #[serde(rename = "scenarios-2d")]
    Scenarios2d {
        groups: Vec<u32>,
        out: PathBuf,
        camera: u32,
    },
    #[serde(rename = "intersections")]
    Intersections { groups: Vec<u32>, out: PathBuf },
}

impl Goal {
    /// The `type` tag of the goal.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scenarios3d { .. } => "scenarios-3d",
            Self::Scenarios2d { .. } => "scenarios-2d",
            Self::Intersections { .. } => "intersections",
        }
    }

    #[must_use]
    pub fn groups(&self) -> &[u32] {
        match self {
            Self::Scenarios3d { groups, .. }
            | Self::Scenarios2d { groups, .. }
            | Self::Intersections { groups, .. } => groups,
        }
    }

    /// Output directory, relative to the working directory.
    #[must_use]
    pub fn out(&self) -> &Path {
        match self {
            Self::Scenarios3d { out, .. }
            | Self::Scenarios2d { out, .. }
            | Self::Intersections { out, .. } => out,
        }
    }

    /// Stage arguments passed to the worker after the `--` separator.
    #[must_use]
    pub fn worker_args(&self, out_dir: &Path, group_id: &str) -> Vec<String> {
        let out_dir = out_dir.display().to_string();
        match self {
            Self::Scenarios3d { .. } => vec!["-3d".into(), out_dir, group_id.into()],
            Self::Scenarios2d { camera, .. } => {
                vec!["-2d".into(), out_dir, group_id.into(), camera.to_string()]
            }
            Self::Intersections { .. } => vec!["-ans".into(), out_dir, group_id.into()],
        }
    }
}

/// A run configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfig {
    /// Worker executable.
    pub worker: PathBuf,
    /// Arguments placed before `--project`.
    #[serde(default)]
    pub worker_args: Vec<String>,
    /// Shape library handed to the worker.
    pub project: PathBuf,
    pub working_directory: PathBuf,
    #[serde(default)]
    pub mode: WorkerMode,
    pub goals: Vec<Goal>,
    /// Config file name up to its first dot; names the run log.
    #[serde(skip)]
    pub name: String,
}

impl RunConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or has no goals.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.name = config_name(path);
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values no run can use.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no goals or a goal has no groups.
    pub fn validate(&self) -> Result<()> {
        if self.goals.is_empty() {
            return Err(PipelineError::InvalidConfig("no goals".into()).into());
        }
        if let Some(goal) = self.goals.iter().find(|g| g.groups().is_empty()) {
            return Err(
                PipelineError::InvalidConfig(format!("{} goal has no groups", goal.kind())).into(),
            );
        }
        Ok(())
    }
}

fn config_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or("run")
        .to_string()
}

/// Formats a numeric group id as its collection name: `7` becomes `Classic.07`.
#[must_use]
pub fn format_group_id(id: u32) -> String {
    format!("Classic.{id:02}")
}
