use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Counters of one worker line: `HH:MM:SS\t<variant>\t<correct>\t<empty>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLine {
    pub time: NaiveTime,
    pub variant: String,
    pub correct: usize,
    pub empty: usize,
}

/// Parses one forwarded worker line. Headings and free text yield `None`.
#[must_use]
pub fn parse_progress_line(line: &str) -> Option<ProgressLine> {
    let mut columns = line.trim_end().split('\t');
    let time = NaiveTime::parse_from_str(columns.next()?.trim(), "%H:%M:%S").ok()?;
    let variant = columns.next()?.trim().to_string();
    let correct = columns.next()?.trim().parse().ok()?;
    let empty = columns.next()?.trim().parse().ok()?;
    if columns.next().is_some() || variant.is_empty() {
        return None;
    }
    Some(ProgressLine {
        time,
        variant,
        correct,
        empty,
    })
}

/// Result of one group run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub elapsed_seconds: f64,
    /// `None` if the worker ended on a signal.
    pub exit_code: Option<i32>,
    pub correct: usize,
    pub empty: usize,
}

impl GroupStats {
    /// Adds the counters of every parsable line.
    pub fn absorb<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for progress in lines.into_iter().filter_map(parse_progress_line) {
            self.correct += progress.correct;
            self.empty += progress.empty;
        }
    }
}

/// Result of one goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageStats {
    pub elapsed_seconds: f64,
    /// Group id to its result.
    pub groups: BTreeMap<String, GroupStats>,
}

/// Per-goal statistics of one run, written next to the goal outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunLog {
    path: PathBuf,
    stages: BTreeMap<String, StageStats>,
}

impl RunLog {
    /// Creates an empty log at `<dir>/log-<name>-<YYYYmmdd-HHMMSS>.json`.
    #[must_use]
    pub fn new(dir: &Path, name: &str, started_at: DateTime<Local>) -> Self {
        let file = format!("log-{name}-{}.json", started_at.format("%Y%m%d-%H%M%S"));
        Self {
            path: dir.join(file),
            stages: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn stages(&self) -> &BTreeMap<String, StageStats> {
        &self.stages
    }

    /// Records a goal under `NN-<type>`, `NN` being its position in the run.
    pub fn record(&mut self, index: usize, kind: &str, stats: StageStats) {
        self.stages.insert(format!("{index:02}-{kind}"), stats);
    }

    /// Rewrites the log file with every stage recorded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.stages)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
