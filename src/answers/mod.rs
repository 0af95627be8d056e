//! Aggregation of case results into per-variant report files.

mod generator;
mod params;
mod report;

pub use generator::{AnswerGenerator, ProgressSink};
pub use params::{
    GenerationParams, PIPELINE_PLANE_INDICES, PIPELINE_PLANE_SCALE, PIPELINE_RATIO,
    PIPELINE_REFERENCE_SIZE,
};
pub use report::{CaseResult, PerVariantReport, VariantSummary, EMPTY_MARKER, PROGRESS_HEADING};
