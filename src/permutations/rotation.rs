use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::{Rotation3, Vector3};
use crate::operations::transform::euler_zyx;

/// The four quarter-turn angles a rotation component may take.
pub const QUARTER_TURNS: [i32; 4] = [0, 90, 180, 270];

/// An orientation given as three quarter-turn angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RotationVector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl RotationVector {
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns `true` for members of the symmetry-reduced working set.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.x == 0 || (self.x == 90 && (self.y == 0 || self.y == 180))
    }

    /// Quarter-turn digits `x/90`, `y/90`, `z/90`.
    #[must_use]
    pub fn digits(&self) -> [i32; 3] {
        [self.x / 90, self.y / 90, self.z / 90]
    }

    /// Returns the rotation matrix `Rx · Ry · Rz` (Z applied first).
    #[must_use]
    pub fn matrix(&self) -> Rotation3 {
        euler_zyx(&Vector3::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.z),
        ))
    }
}

impl fmt::Display for RotationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Enumerates rotation vectors.
///
/// With `include_all`, returns all 64 combinations in (x outer, y middle,
/// z inner) order. Otherwise returns the 24 canonical vectors: those with
/// `x == 0`, plus those with `x == 90` and `y` in `{0, 180}`.
#[must_use]
pub fn rotations(include_all: bool) -> Vec<RotationVector> {
    let mut result = Vec::with_capacity(64);
    for x in QUARTER_TURNS {
        for y in QUARTER_TURNS {
            for z in QUARTER_TURNS {
                result.push(RotationVector::new(x, y, z));
            }
        }
    }
    if !include_all {
        result.retain(RotationVector::is_canonical);
    }
    result
}
