use crate::error::{GeometryError, Result};
use crate::math::{transform_point, Matrix4};
use crate::topology::Mesh;

/// Applies an arbitrary 4x4 transformation matrix to every vertex of a mesh.
pub struct GeneralTransform {
    matrix: Matrix4,
}

impl GeneralTransform {
    /// Creates a new `GeneralTransform` operation.
    #[must_use]
    pub fn new(matrix: Matrix4) -> Self {
        Self { matrix }
    }

    /// Executes the transformation, modifying the mesh in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform produces non-finite coordinates.
    pub fn execute(&self, mesh: &mut Mesh) -> Result<()> {
        for (_, vertex) in mesh.vertices_mut() {
            let point = transform_point(&self.matrix, &vertex.point);
            if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
                return Err(GeometryError::Degenerate(
                    "transform produced a non-finite coordinate".into(),
                )
                .into());
            }
            vertex.point = point;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};

    #[test]
    fn translation_moves_all_vertices() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let b = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        GeneralTransform::new(Matrix4::new_translation(&Vector3::new(0.0, 0.0, 5.0)))
            .execute(&mut mesh)
            .unwrap();
        assert_eq!(mesh.vertex(a).unwrap().point, Point3::new(1.0, 0.0, 5.0));
        assert_eq!(mesh.vertex(b).unwrap().point, Point3::new(0.0, 1.0, 5.0));
    }

    #[test]
    fn non_finite_result_is_rejected() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(1.0, 1.0, 1.0));
        let matrix = Matrix4::new_scaling(f64::INFINITY);
        assert!(GeneralTransform::new(matrix).execute(&mut mesh).is_err());
    }
}
