use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Local;
use tracing::{debug, info};

use crate::assets::{Shape, ShapeLibrary};
use crate::error::Result;
use crate::operations::modification::{Answer, CreateAnswer};
use crate::operations::query::ExtractBoundary;
use crate::operations::transform::ScaleAxes;
use crate::permutations::{
    all_variants, case_id, plane, rotations, CuttingPlane, RotationVector, ScaleVariant,
};

use super::{CaseResult, GenerationParams, PerVariantReport, VariantSummary};

/// Receives progress while shapes are exported.
pub trait ProgressSink {
    /// Called before the first variant of a shape.
    fn shape_started(&mut self, _shape: &str) {}

    /// Called after each variant report has been written.
    fn variant_finished(&mut self, _summary: &VariantSummary) {}
}

impl ProgressSink for () {}

/// Runs every case of the configured permutation space and writes one
/// report per scale variant.
#[derive(Debug, Clone)]
pub struct AnswerGenerator {
    params: GenerationParams,
    rotations: Vec<RotationVector>,
    planes: Vec<CuttingPlane>,
}

impl AnswerGenerator {
    /// Creates a generator and resolves its rotations and planes.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters do not validate.
    pub fn new(params: GenerationParams) -> Result<Self> {
        params.validate()?;
        let planes = params
            .plane_indices
            .iter()
            .map(|&index| plane(params.plane_scale, index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            rotations: rotations(params.all_rotations),
            planes,
            params,
        })
    }

    #[must_use]
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Number of cases in one variant report.
    #[must_use]
    pub fn cases_per_variant(&self) -> usize {
        self.rotations.len() * self.planes.len()
    }

    /// Cuts one scale variant of a shape with every rotation and plane.
    ///
    /// Rotations are the outer loop and planes the inner one. Degenerate
    /// sections are recorded as [`CaseResult::Empty`].
    ///
    /// # Errors
    ///
    /// Returns an error if a case fails for a reason other than a
    /// degenerate section.
    pub fn generate_variant(
        &self,
        shape: &Shape,
        variant: &ScaleVariant,
    ) -> Result<PerVariantReport> {
        let mut scaled = shape.scratch();
        scaled.name = variant.variant_name(shape.name());
        ScaleAxes::new(variant.vector).execute(&mut scaled.mesh)?;
        debug!(variant = %scaled.name, cases = self.cases_per_variant(), "generating variant");

        let mut cases = BTreeMap::new();
        let (mut correct, mut empty) = (0, 0);
        for rotation in &self.rotations {
            for cutting_plane in &self.planes {
                let id = case_id(&cutting_plane.label(), rotation);
                let answer = CreateAnswer::new(&scaled, *rotation, cutting_plane)
                    .with_ratio(self.params.ratio)
                    .with_reference_size(self.params.reference_size)
                    .with_tolerance(self.params.tolerance)
                    .execute()?;
                let result = match answer {
                    Answer::Section(section) => {
                        correct += 1;
                        CaseResult::Outline(ExtractBoundary::new(&section).execute()?)
                    }
                    Answer::Degenerate => {
                        empty += 1;
                        CaseResult::Empty
                    }
                };
                debug!(
                    variant = %scaled.name,
                    case = %id,
                    empty = matches!(result, CaseResult::Empty),
                    "case done"
                );
                cases.insert(id, result);
            }
        }

        Ok(PerVariantReport {
            variant: scaled.name,
            cases,
            correct,
            empty,
            finished_at: Local::now(),
        })
    }

    /// Exports all eight scale variants of a shape into `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a case fails or a report cannot be written.
    pub fn export_shape(&self, shape: &Shape, out_dir: &Path) -> Result<Vec<VariantSummary>> {
        self.export_shape_with(shape, out_dir, &mut ())
    }

    /// Like [`export_shape`](Self::export_shape), reporting progress to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if a case fails or a report cannot be written.
    pub fn export_shape_with(
        &self,
        shape: &Shape,
        out_dir: &Path,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<VariantSummary>> {
        fs::create_dir_all(out_dir)?;
        sink.shape_started(shape.name());

        let mut summaries = Vec::new();
        for variant in all_variants(self.params.shrink_factor) {
            let report = self.generate_variant(shape, &variant)?;
            let path = report.write(out_dir)?;
            let summary = VariantSummary::of(&report, path);
            info!(
                variant = %summary.variant,
                correct = summary.correct,
                empty = summary.empty,
                "variant exported"
            );
            sink.variant_finished(&summary);
            summaries.push(summary);
        }
        Ok(summaries)
    }

    /// Exports every shape of a group, in name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the group is unknown or any shape fails.
    pub fn export_group(
        &self,
        library: &ShapeLibrary,
        group_id: &str,
        out_dir: &Path,
    ) -> Result<Vec<VariantSummary>> {
        self.export_group_with(library, group_id, out_dir, &mut ())
    }

    /// Like [`export_group`](Self::export_group), reporting progress to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the group is unknown or any shape fails.
    pub fn export_group_with(
        &self,
        library: &ShapeLibrary,
        group_id: &str,
        out_dir: &Path,
        sink: &mut dyn ProgressSink,
    ) -> Result<Vec<VariantSummary>> {
        let shapes = library.shapes_in_group(group_id)?;
        info!(group = group_id, shapes = shapes.len(), "exporting group");
        let mut summaries = Vec::new();
        for shape in &shapes {
            summaries.extend(self.export_shape_with(shape, out_dir, sink)?);
        }
        Ok(summaries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::MakeBox;
    use crate::topology::Solid;

    fn cube() -> Shape {
        let mesh = MakeBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
            .execute()
            .unwrap();
        Shape::new(Solid::new("cube", mesh))
    }

    fn small_generator() -> AnswerGenerator {
        AnswerGenerator::new(GenerationParams {
            plane_indices: vec![1, 3],
            ..GenerationParams::default()
        })
        .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        shapes: Vec<String>,
        lines: Vec<String>,
    }

    impl ProgressSink for Recorder {
        fn shape_started(&mut self, shape: &str) {
            self.shapes.push(shape.to_string());
        }

        fn variant_finished(&mut self, summary: &VariantSummary) {
            self.lines.push(summary.progress_line());
        }
    }

    #[test]
    fn variant_report_covers_every_case() {
        let generator = AnswerGenerator::new(GenerationParams::default()).unwrap();
        assert_eq!(generator.cases_per_variant(), 120);

        let report = generator
            .generate_variant(&cube(), &ScaleVariant::identity())
            .unwrap();
        assert_eq!(report.variant, "cube.000");
        assert_eq!(report.cases.len(), 120);
        assert_eq!(report.correct + report.empty, 120);
        // Plane 1 passes through the centre of the cube for every rotation.
        for rotation in rotations(false) {
            let id = case_id("F01", &rotation);
            assert!(matches!(report.cases[&id], CaseResult::Outline(_)), "{id}");
        }
    }

    #[test]
    fn shrunk_cube_misses_the_outer_plane() {
        let generator = small_generator();
        let flat = ScaleVariant::from_pattern([false, false, true], 0.7);
        let report = generator.generate_variant(&cube(), &flat).unwrap();
        // Plane 3 sits at 0.8 of the catalog scale, outside a cube shrunk to 0.7
        // along Z, until a rotation swings the long axes onto Z.
        assert_eq!(report.cases["03.000"], CaseResult::Empty);
        assert!(matches!(report.cases["03.100"], CaseResult::Outline(_)));
    }

    #[test]
    fn export_writes_eight_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = Recorder::default();
        let summaries = small_generator()
            .export_shape_with(&cube(), dir.path(), &mut recorder)
            .unwrap();

        assert_eq!(summaries.len(), 8);
        assert_eq!(recorder.shapes, ["cube"]);
        assert_eq!(recorder.lines.len(), 8);
        for summary in &summaries {
            assert!(summary.path.exists());
            assert_eq!(summary.correct + summary.empty, 48);
        }
        assert!(dir.path().join("cube.000.json").exists());
        assert!(dir.path().join("cube.111.json").exists());
    }

    #[test]
    fn reports_are_byte_identical_across_runs() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let generator = small_generator();
        generator.export_shape(&cube(), first.path()).unwrap();
        generator.export_shape(&cube(), second.path()).unwrap();

        for variant in all_variants(0.7) {
            let name = format!("{}.json", variant.variant_name("cube"));
            let a = fs::read(first.path().join(&name)).unwrap();
            let b = fs::read(second.path().join(&name)).unwrap();
            assert_eq!(a, b, "{name}");
        }
    }

    #[test]
    fn unknown_group_is_missing() {
        let library = ShapeLibrary::default();
        let dir = tempfile::tempdir().unwrap();
        assert!(small_generator()
            .export_group(&library, "Classic.01", dir.path())
            .is_err());
    }
}
