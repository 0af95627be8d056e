use crate::error::{GeometryError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::Mesh;

use super::MakePolyhedron;

/// Quad loops of an axis-aligned box, counter-clockwise seen from outside.
const BOX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 4, 7, 3],
    [1, 2, 6, 5],
];

/// Creates an axis-aligned box mesh from two corner points.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, returning a closed mesh of six quads.
    ///
    /// # Errors
    ///
    /// Returns an error if the box has zero extent along any axis.
    pub fn execute(&self) -> Result<Mesh> {
        let lo = self.min_corner.inf(&self.max_corner);
        let hi = self.min_corner.sup(&self.max_corner);
        let extent = hi - lo;
        if extent.iter().any(|e| *e < TOLERANCE) {
            return Err(GeometryError::Degenerate("box has zero extent".into()).into());
        }

        let corners = vec![
            Point3::new(lo.x, lo.y, lo.z),
            Point3::new(hi.x, lo.y, lo.z),
            Point3::new(hi.x, hi.y, lo.z),
            Point3::new(lo.x, hi.y, lo.z),
            Point3::new(lo.x, lo.y, hi.z),
            Point3::new(hi.x, lo.y, hi.z),
            Point3::new(hi.x, hi.y, hi.z),
            Point3::new(lo.x, hi.y, hi.z),
        ];
        let faces = BOX_FACES.iter().map(|f| f.to_vec()).collect();
        MakePolyhedron::new(corners, faces).execute()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_3d::newell_normal;

    #[test]
    fn box_is_closed() {
        let mesh = MakeBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
            .execute()
            .unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.edge_faces().values().all(|faces| faces.len() == 2));
    }

    #[test]
    fn faces_point_outward() {
        let mesh = MakeBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0))
            .execute()
            .unwrap();
        let centre = Point3::new(1.0, 1.0, 1.0);
        for (fid, _) in mesh.faces() {
            let points = mesh.face_points(fid).unwrap();
            let normal = newell_normal(&points);
            assert!((points[0] - centre).dot(&normal) > 0.0);
        }
    }

    #[test]
    fn flat_box_fails() {
        let result = MakeBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0)).execute();
        assert!(result.is_err());
    }
}
