use tracing::trace;

use crate::error::Result;
use crate::geometry::Plane;
use crate::math::{transform_point, Point3, Vector3, TOLERANCE};
use crate::operations::query::BoundingBox;
use crate::operations::transform::ApplyRotation;
use crate::permutations::{CuttingPlane, RotationVector};
use crate::topology::{Placement, Solid};

use super::{Bisect, DeleteLooseEdges, DeleteLooseVertices, MergeDuplicateFaces};

/// Distance under which a vertex counts as lying on the cutting plane.
pub const DEFAULT_BISECT_TOLERANCE: f64 = 1e-4;

/// Default world size of the longer side of a finished section.
pub const DEFAULT_REFERENCE_SIZE: f64 = 2.0;

/// Default uniform object scale applied before cutting.
pub const DEFAULT_RATIO: f64 = 2.0;

/// Outcome of cutting one shape with one plane.
#[derive(Debug, Clone)]
pub enum Answer {
    /// A flat section with at least one face, lying in world XY and
    /// normalised in size.
    Section(Solid),
    /// The plane missed the shape or only touched it at a point or along edges.
    Degenerate,
}

/// Produces the normalised cross-section of a shape for one rotation and
/// one catalog plane.
///
/// The shape is never modified; all work happens on a scratch copy that is
/// either returned inside the answer or dropped.
pub struct CreateAnswer<'a> {
    shape: &'a Solid,
    rotation: RotationVector,
    plane: &'a CuttingPlane,
    ratio: f64,
    reference_size: f64,
    tolerance: f64,
}

impl<'a> CreateAnswer<'a> {
    /// Creates a new `CreateAnswer` operation with default parameters.
    #[must_use]
    pub fn new(shape: &'a Solid, rotation: RotationVector, plane: &'a CuttingPlane) -> Self {
        Self {
            shape,
            rotation,
            plane,
            ratio: DEFAULT_RATIO,
            reference_size: DEFAULT_REFERENCE_SIZE,
            tolerance: DEFAULT_BISECT_TOLERANCE,
        }
    }

    /// Sets the uniform object scale applied before the cut.
    #[must_use]
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Sets the size of the longer XY side of the finished section.
    #[must_use]
    pub fn with_reference_size(mut self, reference_size: f64) -> Self {
        self.reference_size = reference_size;
        self
    }

    /// Sets the on-plane distance tolerance of the cut.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the ratio is not positive, the plane normal is
    /// zero, or the mesh is inconsistent.
    pub fn execute(&self) -> Result<Answer> {
        let mut scratch = self.shape.clone();
        scratch.mesh.set_contour_marks(false);

        scratch.placement = Placement {
            rotation: self.rotation.matrix(),
            ..Placement::default()
        };
        ApplyRotation::new().execute(&mut scratch)?;
        scratch.placement.scale = Vector3::repeat(self.ratio);

        let local_plane = self.local_plane(&scratch)?;
        scratch.mesh = Bisect::new(local_plane, self.tolerance).execute(&scratch.mesh)?;

        MergeDuplicateFaces::new().execute(&mut scratch.mesh);
        DeleteLooseEdges::new().execute(&mut scratch.mesh);
        DeleteLooseVertices::new().execute(&mut scratch.mesh);
        if scratch.mesh.face_count() == 0 {
            trace!(
                shape = %self.shape.name,
                plane = %self.plane.label(),
                rotation = %self.rotation,
                edges = scratch.mesh.edge_count(),
                "degenerate section"
            );
            return Ok(Answer::Degenerate);
        }
        scratch.mesh.set_contour_marks(true);

        scratch.placement.rotation = self.plane.orientation();
        recenter(&mut scratch);
        scratch.placement.location = Vector3::zeros();

        let aabb = BoundingBox::new(&scratch).execute()?;
        let mid = aabb.center();
        map_world(&mut scratch, |p| Point3::new(p.x - mid.x, p.y - mid.y, 0.0))?;

        let span = BoundingBox::new(&scratch).execute()?.span();
        let longest = span.x.max(span.y);
        if longest < TOLERANCE {
            return Ok(Answer::Degenerate);
        }
        let factor = self.reference_size / longest;
        map_world(&mut scratch, |p| Point3::new(p.x * factor, p.y * factor, p.z))?;

        Ok(Answer::Section(scratch))
    }

    /// Brings the catalog plane into the scratch solid's local frame.
    fn local_plane(&self, scratch: &Solid) -> Result<Plane> {
        let inverse = scratch.placement.inverse_matrix()?;
        let pivot = transform_point(&inverse, &self.plane.pivot);
        let linear = scratch.world_matrix().fixed_view::<3, 3>(0, 0).transpose();
        Plane::from_normal(pivot, linear * self.plane.normal)
    }
}

/// Moves the vertices so that their mean sits at the local origin.
fn recenter(solid: &mut Solid) {
    let count = solid.mesh.vertex_count();
    if count == 0 {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = solid
        .mesh
        .vertices()
        .fold(Vector3::zeros(), |acc, (_, v)| acc + v.point.coords)
        / count as f64;
    for (_, vertex) in solid.mesh.vertices_mut() {
        vertex.point -= mean;
    }
}

/// Edits vertices in world space and writes them back through the inverse
/// world matrix.
fn map_world(solid: &mut Solid, f: impl Fn(Point3) -> Point3) -> Result<()> {
    let matrix = solid.world_matrix();
    let inverse = solid.placement.inverse_matrix()?;
    for (_, vertex) in solid.mesh.vertices_mut() {
        let world = f(transform_point(&matrix, &vertex.point));
        vertex.point = transform_point(&inverse, &world);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::operations::creation::{MakeBox, MakePolyhedron};
    use crate::operations::query::{ExtractBoundary, Segment2};
    use crate::permutations::{plane, rotations};
    use crate::tessellation::Triangulate;

    const L_OUTLINE: [(f64, f64); 6] = [
        (-1.0, -1.0),
        (1.0, -1.0),
        (1.0, 0.0),
        (0.0, 0.0),
        (0.0, 1.0),
        (-1.0, 1.0),
    ];

    const U_OUTLINE: [(f64, f64); 8] = [
        (-1.0, -1.0),
        (1.0, -1.0),
        (1.0, 1.0),
        (0.5, 1.0),
        (0.5, -0.5),
        (-0.5, -0.5),
        (-0.5, 1.0),
        (-1.0, 1.0),
    ];

    fn cube(name: &str) -> Solid {
        let mesh = MakeBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
            .execute()
            .unwrap();
        Solid::new(name, mesh)
    }

    /// Extrudes a counter-clockwise outline between z = -1 and z = 1.
    fn prism(name: &str, outline: &[(f64, f64)]) -> Solid {
        let mut points = Vec::new();
        for z in [-1.0, 1.0] {
            points.extend(outline.iter().map(|&(x, y)| Point3::new(x, y, z)));
        }
        let n = outline.len();
        let mut faces = vec![(0..n).rev().collect::<Vec<_>>(), (n..2 * n).collect()];
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(vec![i, j, j + n, i + n]);
        }
        Solid::new(name, MakePolyhedron::new(points, faces).execute().unwrap())
    }

    fn triangulated(mut solid: Solid) -> Solid {
        Triangulate::new().execute(&mut solid.mesh).unwrap();
        solid
    }

    fn section(answer: Answer) -> Solid {
        match answer {
            Answer::Section(solid) => solid,
            Answer::Degenerate => panic!("expected a section"),
        }
    }

    fn assert_closed_loops(segments: &[Segment2]) {
        let mut degree: BTreeMap<(i64, i64), usize> = BTreeMap::new();
        #[allow(clippy::cast_possible_truncation)]
        let key = |p: [f64; 2]| ((p[0] * 1e6).round() as i64, (p[1] * 1e6).round() as i64);
        for s in segments {
            *degree.entry(key(s.0)).or_default() += 1;
            *degree.entry(key(s.1)).or_default() += 1;
        }
        assert!(degree.values().all(|&d| d == 2), "open outline: {degree:?}");
    }

    /// Cuts the shape with the catalog planes used by a pipeline run under
    /// every rotation and checks each outline.
    fn assert_every_rotation_closes(shape: &Solid) {
        for index in [1, 2, 10, 16, 20] {
            let cut = plane(20.0, index).unwrap();
            for rotation in rotations(false) {
                let answer = CreateAnswer::new(shape, rotation, &cut)
                    .with_ratio(20.0)
                    .with_reference_size(20.0)
                    .execute()
                    .unwrap();
                let Answer::Section(solid) = answer else {
                    continue;
                };
                let segments = ExtractBoundary::new(&solid)
                    .execute()
                    .unwrap_or_else(|e| panic!("{} plane {index} {rotation}: {e}", shape.name));
                assert!(segments.len() >= 3);
                assert_closed_loops(&segments);
                let longest = segments
                    .iter()
                    .flat_map(|s| [s.0, s.1])
                    .fold(0.0_f64, |m, p| m.max(p[0].abs()).max(p[1].abs()));
                assert!((longest - 10.0).abs() < 1e-6, "plane {index} {rotation}");
            }
        }
    }

    #[test]
    fn centred_cube_gives_a_square() {
        let shape = cube("cube");
        let cut = plane(20.0, 1).unwrap();
        let answer = CreateAnswer::new(&shape, RotationVector::new(0, 0, 0), &cut)
            .with_ratio(20.0)
            .with_reference_size(20.0)
            .execute()
            .unwrap();
        let solid = section(answer);
        assert!(solid.mesh.edges().all(|(_, e)| e.contour));

        let segments = ExtractBoundary::new(&solid).execute().unwrap();
        assert_eq!(segments.len(), 4);
        for s in &segments {
            for p in [s.0, s.1] {
                assert!((p[0].abs() - 10.0).abs() < 1e-9, "{p:?}");
                assert!((p[1].abs() - 10.0).abs() < 1e-9, "{p:?}");
            }
        }
        for p in solid.world_points() {
            assert!(p.z.abs() < 1e-9);
        }
    }

    #[test]
    fn plane_outside_the_shape_is_degenerate() {
        let shape = cube("cube");
        let far = CuttingPlane {
            index: 1,
            pivot: Point3::new(0.0, 0.0, 100.0),
            normal: Vector3::z(),
            offset: Vector3::zeros(),
        };
        let answer = CreateAnswer::new(&shape, RotationVector::new(0, 0, 0), &far)
            .with_ratio(20.0)
            .execute()
            .unwrap();
        assert!(matches!(answer, Answer::Degenerate));
    }

    #[test]
    fn face_contact_is_merged_to_one_face() {
        let mesh = MakeBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 0.8))
            .execute()
            .unwrap();
        let shape = Solid::new("slab", mesh);
        let cut = plane(20.0, 3).unwrap();
        let solid = section(
            CreateAnswer::new(&shape, RotationVector::new(0, 0, 0), &cut)
                .with_ratio(20.0)
                .execute()
                .unwrap(),
        );
        assert_eq!(solid.mesh.face_count(), 1);
        assert_eq!(ExtractBoundary::new(&solid).execute().unwrap().len(), 4);
    }

    #[test]
    fn every_rotation_of_the_cube_gives_closed_outlines() {
        assert_every_rotation_closes(&cube("cube"));
    }

    #[test]
    fn every_rotation_of_a_triangulated_cube_gives_closed_outlines() {
        assert_every_rotation_closes(&triangulated(cube("cube")));
    }

    #[test]
    fn every_rotation_of_concave_prisms_gives_closed_outlines() {
        assert_every_rotation_closes(&prism("l", &L_OUTLINE));
        assert_every_rotation_closes(&triangulated(prism("l", &L_OUTLINE)));
        assert_every_rotation_closes(&prism("u", &U_OUTLINE));
    }

    #[test]
    fn rotated_l_prism_section_has_an_outline() {
        let shape = prism("l", &L_OUTLINE);
        let cut = plane(20.0, 20).unwrap();
        let solid = section(
            CreateAnswer::new(&shape, RotationVector::new(90, 180, 180), &cut)
                .with_ratio(20.0)
                .with_reference_size(20.0)
                .execute()
                .unwrap(),
        );
        let segments = ExtractBoundary::new(&solid).execute().unwrap();
        assert_eq!(segments.len(), 4);
        assert_closed_loops(&segments);
    }

    #[test]
    fn shape_is_left_untouched() {
        let shape = cube("cube");
        let before = shape.mesh.points();
        let cut = plane(20.0, 16).unwrap();
        CreateAnswer::new(&shape, RotationVector::new(90, 0, 90), &cut)
            .with_ratio(20.0)
            .execute()
            .unwrap();
        assert_eq!(shape.mesh.points(), before);
    }
}
