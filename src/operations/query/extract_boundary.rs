use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::math::transform_point;
use crate::operations::modification::DeleteLooseVertices;
use crate::tessellation::Triangulate;
use crate::topology::Solid;

/// A 2D line segment in world X/Y coordinates.
///
/// Serialises as `[[x0, y0], [x1, y1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2(pub [f64; 2], pub [f64; 2]);

/// Extracts the outline of a flat solid as world-space X/Y segments.
///
/// Works on a copy: loose vertices are dropped, every face is triangulated,
/// and each edge used by exactly one triangle is part of the outline.
/// Segments come out in edge order, so equal inputs give equal outputs.
pub struct ExtractBoundary<'a> {
    solid: &'a Solid,
}

impl<'a> ExtractBoundary<'a> {
    /// Creates a new `ExtractBoundary` query.
    #[must_use]
    pub fn new(solid: &'a Solid) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the outline segments.
    ///
    /// # Errors
    ///
    /// Returns an error if a face cannot be triangulated.
    pub fn execute(&self) -> Result<Vec<Segment2>> {
        let mut mesh = self.solid.mesh.clone();
        DeleteLooseVertices::new().execute(&mut mesh);
        Triangulate::new().execute(&mut mesh)?;

        let matrix = self.solid.world_matrix();
        let mut segments = Vec::new();
        for (eid, faces) in mesh.edge_faces() {
            if faces.len() != 1 {
                continue;
            }
            let edge = mesh.edge(eid)?;
            let a = transform_point(&matrix, &mesh.vertex(edge.start)?.point);
            let b = transform_point(&matrix, &mesh.vertex(edge.end)?.point);
            segments.push(Segment2([a.x, a.y], [b.x, b.y]));
        }
        Ok(segments)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::topology::{Mesh, VertexId};

    fn flat_solid(coords: &[(f64, f64)]) -> Solid {
        let mut mesh = Mesh::new();
        let ids: Vec<VertexId> = coords
            .iter()
            .map(|&(x, y)| mesh.add_vertex(Point3::new(x, y, 0.0)))
            .collect();
        mesh.add_face(ids).unwrap();
        Solid::new("flat", mesh)
    }

    #[test]
    fn square_outline_skips_diagonal() {
        let solid = flat_solid(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let segments = ExtractBoundary::new(&solid).execute().unwrap();
        assert_eq!(segments.len(), 4);
        for Segment2(a, b) in &segments {
            let dx = (a[0] - b[0]).abs();
            let dy = (a[1] - b[1]).abs();
            assert!((dx + dy - 1.0).abs() < 1e-12, "not a side: {a:?} {b:?}");
        }
    }

    #[test]
    fn outline_is_in_world_coordinates() {
        let mut solid = flat_solid(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        solid.placement.location = Vector3::new(5.0, -5.0, 3.0);
        solid.placement.scale = Vector3::new(2.0, 2.0, 2.0);
        let segments = ExtractBoundary::new(&solid).execute().unwrap();
        assert_eq!(segments.len(), 3);
        assert!(segments
            .iter()
            .flat_map(|s| [s.0, s.1])
            .any(|p| p == [7.0, -5.0]));
    }

    #[test]
    fn loose_vertices_are_ignored() {
        let mut solid = flat_solid(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        solid.mesh.add_vertex(Point3::new(9.0, 9.0, 0.0));
        let segments = ExtractBoundary::new(&solid).execute().unwrap();
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn serialises_as_nested_arrays() {
        let json = serde_json::to_string(&Segment2([0.0, 1.5], [2.0, -1.0])).unwrap();
        assert_eq!(json, "[[0.0,1.5],[2.0,-1.0]]");
    }
}
