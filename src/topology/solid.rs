use crate::error::{GeometryError, Result};
use crate::math::{transform_point, Matrix4, Point3, Rotation3, Vector3};

use super::Mesh;

/// Object-level transform of a solid: `T(location) · R(rotation) · S(scale)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub location: Vector3,
    pub rotation: Rotation3,
    pub scale: Vector3,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            location: Vector3::zeros(),
            rotation: Rotation3::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Placement {
    /// Returns the local-to-world matrix.
    #[must_use]
    pub fn matrix(&self) -> Matrix4 {
        Matrix4::new_translation(&self.location)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Returns the world-to-local matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if a scale component is zero.
    pub fn inverse_matrix(&self) -> Result<Matrix4> {
        self.matrix()
            .try_inverse()
            .ok_or_else(|| GeometryError::SingularTransform.into())
    }
}

/// A named mesh with a placement in the world.
///
/// Solids are the disposable working objects of the pipeline: a shape is
/// cloned into a solid, edited, read back and dropped.
#[derive(Debug, Clone)]
pub struct Solid {
    pub name: String,
    pub mesh: Mesh,
    pub placement: Placement,
}

impl Solid {
    /// Creates a solid with an identity placement.
    #[must_use]
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            placement: Placement::default(),
        }
    }

    /// Returns the local-to-world matrix.
    #[must_use]
    pub fn world_matrix(&self) -> Matrix4 {
        self.placement.matrix()
    }

    /// Returns every vertex position in world coordinates.
    #[must_use]
    pub fn world_points(&self) -> Vec<Point3> {
        let matrix = self.world_matrix();
        self.mesh
            .points()
            .iter()
            .map(|p| transform_point(&matrix, p))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn matrix_scales_then_rotates_then_translates() {
        let placement = Placement {
            location: Vector3::new(10.0, 0.0, 0.0),
            rotation: Rotation3::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            scale: Vector3::new(2.0, 1.0, 1.0),
        };
        let p = transform_point(&placement.matrix(), &Point3::new(1.0, 0.0, 0.0));
        // (1,0,0) -> scale (2,0,0) -> rotate (0,2,0) -> translate (10,2,0)
        assert!((p - Point3::new(10.0, 2.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn inverse_undoes_matrix() {
        let placement = Placement {
            location: Vector3::new(1.0, 2.0, 3.0),
            rotation: Rotation3::from_euler_angles(0.3, -0.2, 1.1),
            scale: Vector3::new(20.0, 20.0, 20.0),
        };
        let q = Point3::new(0.5, -4.0, 7.0);
        let there = transform_point(&placement.matrix(), &q);
        let back = transform_point(&placement.inverse_matrix().unwrap(), &there);
        assert!((back - q).norm() < 1e-9);
    }

    #[test]
    fn zero_scale_is_singular() {
        let placement = Placement {
            scale: Vector3::new(0.0, 1.0, 1.0),
            ..Placement::default()
        };
        assert!(placement.inverse_matrix().is_err());
    }
}
