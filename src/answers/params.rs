use serde::{Deserialize, Serialize};

use crate::error::{OperationError, Result};
use crate::operations::modification::DEFAULT_BISECT_TOLERANCE;
use crate::permutations::{DEFAULT_SHRINK_FACTOR, PLANE_COUNT};

/// Catalog scale used when generating answers.
pub const PIPELINE_PLANE_SCALE: f64 = 20.0;

/// Object scale applied to a shape before it is cut.
pub const PIPELINE_RATIO: f64 = 20.0;

/// World size of the longer side of every exported outline.
pub const PIPELINE_REFERENCE_SIZE: f64 = 20.0;

/// Catalog planes exported for every rotation.
pub const PIPELINE_PLANE_INDICES: [usize; 5] = [1, 2, 10, 16, 20];

/// Tunables of answer generation.
///
/// Every field has a default, so an empty JSON object is a valid value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub plane_scale: f64,
    pub ratio: f64,
    pub reference_size: f64,
    pub tolerance: f64,
    pub shrink_factor: f64,
    pub plane_indices: Vec<usize>,
    /// Use all 64 rotations instead of the 24 canonical ones.
    pub all_rotations: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            plane_scale: PIPELINE_PLANE_SCALE,
            ratio: PIPELINE_RATIO,
            reference_size: PIPELINE_REFERENCE_SIZE,
            tolerance: DEFAULT_BISECT_TOLERANCE,
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            plane_indices: PIPELINE_PLANE_INDICES.to_vec(),
            all_rotations: false,
        }
    }
}

impl GenerationParams {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if a size, ratio or tolerance is not a positive
    /// number, or a plane index is outside the catalog.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("plane_scale", self.plane_scale),
            ("ratio", self.ratio),
            ("reference_size", self.reference_size),
            ("tolerance", self.tolerance),
            ("shrink_factor", self.shrink_factor),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(OperationError::InvalidInput(format!(
                    "{name} must be a positive number, got {value}"
                ))
                .into());
            }
        }
        if self.plane_indices.is_empty() {
            return Err(OperationError::InvalidInput("no plane indices given".into()).into());
        }
        if let Some(bad) = self
            .plane_indices
            .iter()
            .find(|i| !(1..=PLANE_COUNT).contains(*i))
        {
            return Err(OperationError::InvalidInput(format!(
                "plane index {bad} is outside 1..={PLANE_COUNT}"
            ))
            .into());
        }
        Ok(())
    }
}
