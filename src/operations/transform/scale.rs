use crate::error::{OperationError, Result};
use crate::math::{Matrix4, Vector3};
use crate::topology::Mesh;

use super::GeneralTransform;

/// Scales mesh coordinates per axis about the local origin.
pub struct ScaleAxes {
    factors: Vector3,
}

impl ScaleAxes {
    /// Creates a new `ScaleAxes` operation.
    #[must_use]
    pub fn new(factors: Vector3) -> Self {
        Self { factors }
    }

    /// Executes the scaling, modifying the mesh in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if a factor is zero, negative or not finite.
    pub fn execute(&self, mesh: &mut Mesh) -> Result<()> {
        if self.factors.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "scale factors must be positive, got {:?}",
                self.factors
            ))
            .into());
        }
        GeneralTransform::new(Matrix4::new_nonuniform_scaling(&self.factors)).execute(mesh)
    }
}
