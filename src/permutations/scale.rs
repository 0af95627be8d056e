use crate::math::Vector3;

/// Default shrink factor applied to scaled axes.
pub const DEFAULT_SHRINK_FACTOR: f64 = 0.7;

/// Axis patterns in generation order; `true` marks a scaled axis.
const PATTERNS: [[bool; 3]; 7] = [
    [true, false, false],
    [false, true, false],
    [false, false, true],
    [true, true, false],
    [true, false, true],
    [false, true, true],
    [true, true, true],
];

/// A per-axis scale vector with its bitstring identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleVariant {
    pub vector: Vector3,
    pub id: String,
}

impl ScaleVariant {
    /// Builds a variant from an axis pattern.
    #[must_use]
    pub fn from_pattern(pattern: [bool; 3], factor: f64) -> Self {
        let pick = |scaled: bool| if scaled { factor } else { 1.0 };
        let id = pattern.iter().map(|&s| if s { '1' } else { '0' }).collect();
        Self {
            vector: Vector3::new(pick(pattern[0]), pick(pattern[1]), pick(pattern[2])),
            id,
        }
    }

    /// The unscaled variant, `000`.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_pattern([false; 3], 1.0)
    }

    /// Name of a shape copy scaled by this variant.
    #[must_use]
    pub fn variant_name(&self, shape_name: &str) -> String {
        format!("{shape_name}.{}", self.id)
    }
}

/// Returns the 7 non-identity scale variants built from `{1.0, factor}`.
#[must_use]
pub fn scale_variants(factor: f64) -> Vec<ScaleVariant> {
    PATTERNS
        .iter()
        .map(|&p| ScaleVariant::from_pattern(p, factor))
        .collect()
}

/// The identity variant followed by the 7 scaled ones.
#[must_use]
pub fn all_variants(factor: f64) -> Vec<ScaleVariant> {
    let mut variants = vec![ScaleVariant::identity()];
    variants.extend(scale_variants(factor));
    variants
}
