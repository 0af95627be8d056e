//! The configuration space of answer generation: rotations, cutting planes
//! and scale variants, and the identifiers of their combinations.

mod plane;
mod rotation;
mod scale;

pub use plane::{plane, planes, CuttingPlane, PLANE_COUNT};
pub use rotation::{rotations, RotationVector, QUARTER_TURNS};
pub use scale::{all_variants, scale_variants, ScaleVariant, DEFAULT_SHRINK_FACTOR};

/// Builds the case identifier of a plane label and a rotation.
///
/// The leading `F` of the label is dropped and each rotation component is
/// written as its quarter-turn digit: `F01` with `(90, 180, 270)` gives `01.123`.
#[must_use]
pub fn case_id(plane_label: &str, rotation: &RotationVector) -> String {
    let number = plane_label.get(1..).unwrap_or_default();
    let [x, y, z] = rotation.digits();
    format!("{number}.{x}{y}{z}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_id_example() {
        assert_eq!(case_id("F01", &RotationVector::new(90, 180, 270)), "01.123");
    }

    #[test]
    fn case_ids_are_unique_per_plane() {
        let ids: std::collections::HashSet<String> = rotations(false)
            .iter()
            .map(|r| case_id("F10", r))
            .collect();
        assert_eq!(ids.len(), 24);
        assert!(ids.contains("10.000"));
    }
}
