use crate::error::{OperationError, Result};
use crate::math::{Point3, Rotation3, Vector3};
use crate::operations::transform::euler_zyx;

/// Number of entries in the cutting-plane catalog.
pub const PLANE_COUNT: usize = 31;

/// Offset of the off-centre axis planes, relative to the catalog scale.
const AXIS_OFFSET: f64 = 0.8;

/// Elevation of the corner planes (the angle between a cube diagonal and a face).
const CORNER_ELEVATION: f64 = 35.27;

/// One entry of the cutting-plane catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CuttingPlane {
    /// 1-based catalog index.
    pub index: usize,
    /// A point on the plane, in world units.
    pub pivot: Point3,
    /// Plane normal (not necessarily unit length).
    pub normal: Vector3,
    /// Euler angles in degrees that turn the plane parallel to XY.
    pub offset: Vector3,
}

impl CuttingPlane {
    /// Catalog label, `F01` to `F31`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("F{:02}", self.index)
    }

    /// Rotation that presents a section cut by this plane face-on.
    #[must_use]
    pub fn orientation(&self) -> Rotation3 {
        euler_zyx(&self.offset)
    }
}

/// Raw catalog rows: pivot in scale units, normal, orientation offset.
#[rustfmt::skip]
const CATALOG: [([f64; 3], [f64; 3], [f64; 3]); PLANE_COUNT] = [
    ([0.0, 0.0, 0.0],           [0.0, 0.0, 1.0],   [0.0, 0.0, 0.0]),
    ([0.0, 0.0, -AXIS_OFFSET],  [0.0, 0.0, 1.0],   [0.0, 0.0, 0.0]),
    ([0.0, 0.0, AXIS_OFFSET],   [0.0, 0.0, 1.0],   [0.0, 0.0, 0.0]),
    ([0.0, 0.0, 0.0],           [0.0, 1.0, 0.0],   [90.0, 0.0, 0.0]),
    ([0.0, AXIS_OFFSET, 0.0],   [0.0, 1.0, 0.0],   [90.0, 0.0, 0.0]),
    ([0.0, -AXIS_OFFSET, 0.0],  [0.0, 1.0, 0.0],   [90.0, 0.0, 0.0]),
    ([0.0, 0.0, 0.0],           [1.0, 0.0, 0.0],   [0.0, 90.0, 0.0]),
    ([-AXIS_OFFSET, 0.0, 0.0],  [1.0, 0.0, 0.0],   [0.0, 90.0, 0.0]),
    ([AXIS_OFFSET, 0.0, 0.0],   [1.0, 0.0, 0.0],   [0.0, 90.0, 0.0]),
    ([0.0, 0.0, 0.0],           [0.0, 1.0, -1.0],  [-45.0, 0.0, 0.0]),
    ([0.0, 0.0, 0.0],           [-1.0, 0.0, -1.0], [0.0, -45.0, 0.0]),
    ([0.0, 0.0, 0.0],           [0.0, -1.0, -1.0], [45.0, 0.0, 0.0]),
    ([0.0, 0.0, 0.0],           [1.0, 0.0, -1.0],  [0.0, 45.0, 0.0]),
    ([0.0, 0.0, 0.0],           [1.0, 1.0, 0.0],   [90.0, 0.0, 45.0]),
    ([0.0, 0.0, 0.0],           [1.0, -1.0, 0.0],  [0.0, 90.0, 45.0]),
    ([0.0, 0.0, 0.0],           [-0.5, 0.5, 1.0],  [0.0, CORNER_ELEVATION, 45.0]),
    ([0.0, 0.0, 0.0],           [-0.5, -0.5, 1.0], [0.0, CORNER_ELEVATION, -45.0]),
    ([0.0, 0.0, 0.0],           [0.5, -0.5, 1.0],  [0.0, -CORNER_ELEVATION, 45.0]),
    ([0.0, 0.0, 0.0],           [0.5, 0.5, 1.0],   [0.0, -CORNER_ELEVATION, -45.0]),
    ([0.0, 1.0, 0.0],           [0.0, 1.0, -1.0],  [-45.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0],          [0.0, 1.0, -1.0],  [-45.0, 0.0, 0.0]),
    ([0.0, 0.0, 1.0],           [-1.0, 0.0, -1.0], [0.0, -45.0, 0.0]),
    ([0.0, 0.0, -1.0],          [-1.0, 0.0, -1.0], [0.0, -45.0, 0.0]),
    ([0.0, 1.0, 0.0],           [0.0, -1.0, -1.0], [45.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0],          [0.0, -1.0, -1.0], [45.0, 0.0, 0.0]),
    ([0.0, 0.0, 1.0],           [1.0, 0.0, -1.0],  [0.0, 45.0, 0.0]),
    ([0.0, 0.0, -1.0],          [1.0, 0.0, -1.0],  [0.0, 45.0, 0.0]),
    ([0.0, 1.0, 0.0],           [1.0, 1.0, 0.0],   [90.0, 0.0, 45.0]),
    ([0.0, -1.0, 0.0],          [1.0, 1.0, 0.0],   [90.0, 0.0, 45.0]),
    ([0.0, 1.0, 0.0],           [1.0, -1.0, 0.0],  [0.0, 90.0, 45.0]),
    ([0.0, -1.0, 0.0],          [1.0, -1.0, 0.0],  [0.0, 90.0, 45.0]),
];

/// Returns the full cutting-plane catalog with pivots multiplied by `scale`.
#[must_use]
pub fn planes(scale: f64) -> Vec<CuttingPlane> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, (pivot, normal, offset))| CuttingPlane {
            index: i + 1,
            pivot: Point3::new(pivot[0] * scale, pivot[1] * scale, pivot[2] * scale),
            normal: Vector3::new(normal[0], normal[1], normal[2]),
            offset: Vector3::new(offset[0], offset[1], offset[2]),
        })
        .collect()
}

/// Looks up one catalog entry by its 1-based index.
///
/// # Errors
///
/// Returns an error if `index` is outside `1..=31`.
pub fn plane(scale: f64, index: usize) -> Result<CuttingPlane> {
    if !(1..=PLANE_COUNT).contains(&index) {
        return Err(OperationError::InvalidInput(format!(
            "plane index {index} is outside 1..={PLANE_COUNT}"
        ))
        .into());
    }
    Ok(planes(scale).swap_remove(index - 1))
}
