use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;
use crate::operations::query::Segment2;

/// Marker written for a case whose section is degenerate.
pub const EMPTY_MARKER: &str = "empty";

/// Column heading printed before the progress lines of one shape.
pub const PROGRESS_HEADING: &str = "time     \tshape           \tcor\temp";

/// Outcome of one case.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseResult {
    /// Outline segments of a valid section.
    Outline(Vec<Segment2>),
    /// The section was degenerate.
    Empty,
}

impl Serialize for CaseResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Outline(segments) => segments.serialize(serializer),
            Self::Empty => serializer.serialize_str(EMPTY_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for CaseResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Outline(Vec<Segment2>),
            Marker(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Outline(segments) => Ok(Self::Outline(segments)),
            Raw::Marker(marker) if marker == EMPTY_MARKER => Ok(Self::Empty),
            Raw::Marker(marker) => Err(D::Error::custom(format!(
                "unknown case marker {marker:?}"
            ))),
        }
    }
}

/// All cases of one scale variant.
#[derive(Debug, Clone)]
pub struct PerVariantReport {
    /// Variant name, `<shape>.<bits>`.
    pub variant: String,
    /// Case id to result.
    pub cases: BTreeMap<String, CaseResult>,
    pub correct: usize,
    pub empty: usize,
    pub finished_at: DateTime<Local>,
}

impl PerVariantReport {
    /// Serialises the case map as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.cases)?)
    }

    /// Writes `<dir>/<variant>.json`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.json", self.variant));
        fs::write(&path, self.to_json()?)?;
        Ok(path)
    }
}

/// What is left of a report once it has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSummary {
    pub variant: String,
    pub correct: usize,
    pub empty: usize,
    pub finished_at: DateTime<Local>,
    pub path: PathBuf,
}

impl VariantSummary {
    /// Builds the summary of a report written to `path`.
    #[must_use]
    pub fn of(report: &PerVariantReport, path: PathBuf) -> Self {
        Self {
            variant: report.variant.clone(),
            correct: report.correct,
            empty: report.empty,
            finished_at: report.finished_at,
            path,
        }
    }

    /// Tab-separated progress line: `HH:MM:SS  variant  correct  empty`.
    #[must_use]
    pub fn progress_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.finished_at.format("%H:%M:%S"),
            self.variant,
            self.correct,
            self.empty
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn case_results_serialise_to_the_report_format() {
        let mut cases = BTreeMap::new();
        cases.insert("01.000".to_string(), CaseResult::Empty);
        cases.insert(
            "02.000".to_string(),
            CaseResult::Outline(vec![Segment2([0.0, 0.0], [1.0, 0.0])]),
        );
        let json = serde_json::to_string(&cases).unwrap();
        assert_eq!(json, r#"{"01.000":"empty","02.000":[[[0.0,0.0],[1.0,0.0]]]}"#);

        let back: BTreeMap<String, CaseResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cases);
    }

    #[test]
    fn unknown_marker_is_rejected() {
        assert!(serde_json::from_str::<CaseResult>(r#""full""#).is_err());
    }

    #[test]
    fn progress_line_has_four_columns() {
        let summary = VariantSummary {
            variant: "cube.101".into(),
            correct: 100,
            empty: 20,
            finished_at: Local::now(),
            path: PathBuf::from("cube.101.json"),
        };
        let line = summary.progress_line();
        let columns: Vec<&str> = line.split('\t').collect();
        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0].len(), 8);
        assert_eq!(&columns[1..], ["cube.101", "100", "20"]);
    }
}
