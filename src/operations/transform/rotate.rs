use crate::error::Result;
use crate::math::{Rotation3, Vector3};
use crate::topology::Solid;

use super::GeneralTransform;

/// Composes Euler angles (degrees) as `Rx · Ry · Rz`.
///
/// Each rotation is pre-multiplied onto the current orientation, starting from
/// the Z angle, so Z acts first on a point.
#[must_use]
pub fn euler_zyx(degrees: &Vector3) -> Rotation3 {
    let rot_z = Rotation3::from_axis_angle(&Vector3::z_axis(), degrees.z.to_radians());
    let rot_y = Rotation3::from_axis_angle(&Vector3::y_axis(), degrees.y.to_radians());
    let rot_x = Rotation3::from_axis_angle(&Vector3::x_axis(), degrees.x.to_radians());
    rot_x * (rot_y * rot_z)
}

/// Bakes a solid's placement rotation into its vertex coordinates.
///
/// Afterwards the placement rotation is the identity and the world-space
/// shape is unchanged.
#[derive(Debug, Default)]
pub struct ApplyRotation;

impl ApplyRotation {
    /// Creates a new `ApplyRotation` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation, modifying the solid in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform cannot be applied.
    pub fn execute(&self, solid: &mut Solid) -> Result<()> {
        let rotation = solid.placement.rotation;
        GeneralTransform::new(rotation.to_homogeneous()).execute(&mut solid.mesh)?;
        solid.placement.rotation = Rotation3::identity();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::operations::creation::MakeBox;

    #[test]
    fn quarter_turns_are_exact_enough() {
        let r = euler_zyx(&Vector3::new(0.0, 0.0, 90.0));
        let image = r * Point3::new(1.0, 0.0, 0.0);
        assert!((image - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn apply_rotation_keeps_world_positions() {
        let mesh = MakeBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0))
            .execute()
            .unwrap();
        let mut solid = Solid::new("box", mesh);
        solid.placement.rotation = euler_zyx(&Vector3::new(90.0, 0.0, 90.0));
        let before = solid.world_points();

        ApplyRotation::new().execute(&mut solid).unwrap();

        assert_eq!(solid.placement.rotation, Rotation3::identity());
        let after = solid.world_points();
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).norm() < 1e-12);
        }
    }
}
