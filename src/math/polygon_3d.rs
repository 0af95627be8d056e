use crate::geometry::Plane;

use super::{Point3, Vector3, TOLERANCE};

/// Point-in-polygon test for a 3D point coplanar with the polygon.
///
/// Projects to the plane's UV coordinate system and uses the winding number
/// algorithm. Points within `tolerance` of an edge count as inside.
#[must_use]
pub fn point_in_polygon_3d(point: &Point3, polygon: &[Point3], plane: &Plane, tolerance: f64) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let (px, py) = plane.project(point);
    let uvs: Vec<(f64, f64)> = polygon.iter().map(|p| plane.project(p)).collect();

    winding_number_2d(px, py, &uvs) != 0 || on_boundary_2d(px, py, &uvs, tolerance)
}

/// Winding number of point `(px, py)` with respect to polygon `verts`.
///
/// Non-zero => inside, zero => outside.
fn winding_number_2d(px: f64, py: f64, verts: &[(f64, f64)]) -> i32 {
    let n = verts.len();
    let mut winding = 0i32;
    for i in 0..n {
        let (x0, y0) = verts[i];
        let (x1, y1) = verts[(i + 1) % n];

        if y0 <= py {
            if y1 > py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) > 0.0 {
                winding += 1;
            }
        } else if y1 <= py && cross_2d(x1 - x0, y1 - y0, px - x0, py - y0) < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Returns `true` if `(px, py)` lies within `tolerance` of any polygon edge.
fn on_boundary_2d(px: f64, py: f64, verts: &[(f64, f64)], tolerance: f64) -> bool {
    let n = verts.len();
    (0..n).any(|i| {
        let (x0, y0) = verts[i];
        let (x1, y1) = verts[(i + 1) % n];
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq < TOLERANCE {
            0.0
        } else {
            (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0)
        };
        let (cx, cy) = (x0 + dx * t, y0 + dy * t);
        (px - cx).hypot(py - cy) <= tolerance
    })
}

/// 2D cross product: `(ax * by - ay * bx)`.
#[inline]
fn cross_2d(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Newell normal of a polygon loop, unnormalized.
///
/// Its length is twice the polygon area, so a zero vector means the loop is
/// degenerate.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// Signed area of a 2D loop; positive when counter-clockwise.
#[must_use]
pub fn signed_area_2d(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        sum += cross_2d(x0, y0, x1, y1);
    }
    0.5 * sum
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn xy_plane() -> Plane {
        Plane::from_normal(p(0.0, 0.0, 0.0), v(0.0, 0.0, 1.0)).unwrap()
    }

    fn unit_square() -> Vec<Point3> {
        vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ]
    }

    // ── point_in_polygon_3d ──

    #[test]
    fn point_inside_square() {
        let plane = xy_plane();
        assert!(point_in_polygon_3d(&p(0.5, 0.5, 0.0), &unit_square(), &plane, 1e-9));
    }

    #[test]
    fn point_outside_square() {
        let plane = xy_plane();
        assert!(!point_in_polygon_3d(&p(2.0, 0.5, 0.0), &unit_square(), &plane, 1e-9));
    }

    #[test]
    fn point_on_edge_counts_as_inside() {
        let plane = xy_plane();
        assert!(point_in_polygon_3d(&p(1.0, 0.5, 0.0), &unit_square(), &plane, 1e-9));
        assert!(point_in_polygon_3d(&p(0.5, 0.0, 0.0), &unit_square(), &plane, 1e-9));
    }

    #[test]
    fn concave_notch_is_outside() {
        let plane = xy_plane();
        let l_shape = vec![
            p(0.0, 0.0, 0.0),
            p(2.0, 0.0, 0.0),
            p(2.0, 1.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(1.0, 2.0, 0.0),
            p(0.0, 2.0, 0.0),
        ];
        assert!(!point_in_polygon_3d(&p(1.5, 1.5, 0.0), &l_shape, &plane, 1e-9));
        assert!(point_in_polygon_3d(&p(0.5, 1.5, 0.0), &l_shape, &plane, 1e-9));
    }

    // ── normals and areas ──

    #[test]
    fn newell_normal_of_ccw_square_points_up() {
        let n = newell_normal(&unit_square());
        assert!((n.z - 2.0).abs() < TOLERANCE);
        assert!(n.x.abs() < TOLERANCE && n.y.abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_orientation() {
        let ccw = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!((signed_area_2d(&ccw) - 1.0).abs() < TOLERANCE);
        assert!((signed_area_2d(&cw) + 1.0).abs() < TOLERANCE);
    }
}
