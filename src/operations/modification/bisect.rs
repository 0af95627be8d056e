use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::Result;
use crate::geometry::Plane;
use crate::math::polygon_3d::{newell_normal, point_in_polygon_3d, signed_area_2d};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{EdgeId, Mesh, VertexId};

/// Side of the cutting plane a vertex lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Below,
    On,
    Above,
}

/// Cuts a closed mesh with a plane and keeps only the section.
///
/// Everything strictly above and strictly below the plane is cleared. What
/// remains is the geometry lying on the plane: input vertices, edges and
/// faces within `tolerance` of it, one new vertex per edge crossing it, one
/// cut edge per face span inside the face, and fill faces closing every
/// bounded loop of those edges. Fill faces are wound counter-clockwise around
/// the plane normal and their edges carry the contour mark.
pub struct Bisect {
    plane: Plane,
    tolerance: f64,
}

impl Bisect {
    /// Creates a new `Bisect` operation.
    #[must_use]
    pub fn new(plane: Plane, tolerance: f64) -> Self {
        Self { plane, tolerance }
    }

    /// Executes the cut, returning the section as a new mesh.
    ///
    /// The section may be empty, a lone point or a set of edges without
    /// faces when the plane misses or only touches the mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the input mesh references missing entities.
    pub fn execute(&self, mesh: &Mesh) -> Result<Mesh> {
        let sides: HashMap<VertexId, Side> = mesh
            .vertices()
            .map(|(id, v)| (id, self.classify(&v.point)))
            .collect();

        let mut section = Mesh::new();

        let mut kept: HashMap<VertexId, VertexId> = HashMap::new();
        for (id, vertex) in mesh.vertices() {
            if sides[&id] == Side::On {
                kept.insert(id, section.add_vertex(vertex.point));
            }
        }

        let mut crossings: HashMap<EdgeId, VertexId> = HashMap::new();
        for (eid, edge) in mesh.edges() {
            let (a, b) = (edge.start, edge.end);
            if !crosses(sides[&a], sides[&b]) {
                continue;
            }
            let pa = mesh.vertex(a)?.point;
            let pb = mesh.vertex(b)?.point;
            let da = self.plane.signed_distance(&pa);
            let db = self.plane.signed_distance(&pb);
            let t = da / (da - db);
            crossings.insert(eid, section.add_vertex(pa + (pb - pa) * t));
        }

        for (eid, edge) in mesh.edges() {
            if let (Some(&a), Some(&b)) = (kept.get(&edge.start), kept.get(&edge.end)) {
                let id = section.add_edge(a, b)?;
                section.edge_mut(id)?.contour = mesh.edge(eid)?.contour;
            }
        }

        for (fid, face) in mesh.faces() {
            if face.vertices.iter().all(|v| sides[v] == Side::On) {
                let loop_ids = face.vertices.iter().map(|v| kept[v]).collect();
                section.add_face(loop_ids)?;
                continue;
            }

            let mut hits = Vec::new();
            for (v, w) in face.vertex_pairs() {
                if let Some(&id) = kept.get(&v) {
                    hits.push(id);
                }
                if crosses(sides[&v], sides[&w]) {
                    if let Some(&id) = mesh.find_edge(v, w).and_then(|e| crossings.get(&e)) {
                        hits.push(id);
                    }
                }
            }
            if hits.len() < 2 {
                continue;
            }

            let polygon = mesh.face_points(fid)?;
            self.connect_face_hits(&mut section, &polygon, hits)?;
        }

        self.fill(&mut section)?;
        Ok(section)
    }

    fn classify(&self, point: &Point3) -> Side {
        let distance = self.plane.signed_distance(point);
        if distance > self.tolerance {
            Side::Above
        } else if distance < -self.tolerance {
            Side::Below
        } else {
            Side::On
        }
    }

    /// Joins consecutive on-plane points of one face where the span between
    /// them lies inside the face.
    fn connect_face_hits(
        &self,
        section: &mut Mesh,
        polygon: &[Point3],
        mut hits: Vec<VertexId>,
    ) -> Result<()> {
        let face_normal = newell_normal(polygon);
        let direction = face_normal.cross(self.plane.normal());
        if direction.norm() < TOLERANCE {
            return Ok(());
        }
        let Ok(face_plane) = Plane::from_normal(polygon[0], face_normal) else {
            return Ok(());
        };

        let mut keyed = Vec::with_capacity(hits.len());
        for id in hits.drain(..) {
            let point = section.vertex(id)?.point;
            keyed.push((point.coords.dot(&direction), id, point));
        }
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        keyed.dedup_by_key(|entry| entry.1);

        for pair in keyed.windows(2) {
            let (_, a, pa) = pair[0];
            let (_, b, pb) = pair[1];
            if a == b || (pb - pa).norm() < TOLERANCE {
                continue;
            }
            let midpoint = Point3::from((pa.coords + pb.coords) * 0.5);
            if point_in_polygon_3d(&midpoint, polygon, &face_plane, self.tolerance) {
                section.add_edge(a, b)?;
            }
        }
        Ok(())
    }

    /// Adds a face for every bounded loop of the section's edge graph.
    ///
    /// Walks the planar map keeping each face on the left: at the head of a
    /// half-edge, the walk continues along the first outgoing edge clockwise
    /// from the reversed half-edge. Loops with positive area are the bounded
    /// faces; the single negative loop of each component is its outside.
    fn fill(&self, section: &mut Mesh) -> Result<()> {
        let adjacency = self.planar_adjacency(section)?;
        if adjacency.is_empty() {
            return Ok(());
        }

        let half_edge_count: usize = adjacency.values().map(Vec::len).sum();
        let mut visited: HashSet<(VertexId, VertexId)> = HashSet::new();
        let mut loops = Vec::new();

        for (&start, neighbours) in &adjacency {
            for &first in neighbours {
                if visited.contains(&(start, first)) {
                    continue;
                }
                let mut cycle = Vec::new();
                let (mut from, mut to) = (start, first);
                loop {
                    visited.insert((from, to));
                    cycle.push(from);
                    let Some(next) = turn(&adjacency, from, to) else {
                        break;
                    };
                    from = to;
                    to = next;
                    if (from, to) == (start, first) || cycle.len() > half_edge_count {
                        break;
                    }
                }
                loops.push(cycle);
            }
        }

        for cycle in loops {
            if cycle.len() < 3 || has_repeats(&cycle) {
                continue;
            }
            let mut uv = Vec::with_capacity(cycle.len());
            for &id in &cycle {
                uv.push(self.plane.project(&section.vertex(id)?.point));
            }
            if signed_area_2d(&uv) <= self.tolerance * self.tolerance {
                continue;
            }
            let pairs: Vec<(VertexId, VertexId)> = cycle
                .iter()
                .zip(cycle.iter().cycle().skip(1))
                .map(|(&a, &b)| (a, b))
                .collect();
            section.add_face(cycle)?;
            for (a, b) in pairs {
                if let Some(eid) = section.find_edge(a, b) {
                    section.edge_mut(eid)?.contour = true;
                }
            }
        }
        Ok(())
    }

    /// Neighbour lists of the section graph, sorted counter-clockwise
    /// around each vertex, with dangling edges pruned away.
    fn planar_adjacency(&self, section: &Mesh) -> Result<BTreeMap<VertexId, Vec<VertexId>>> {
        let mut adjacency: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
        for (_, edge) in section.edges() {
            adjacency.entry(edge.start).or_default().push(edge.end);
            adjacency.entry(edge.end).or_default().push(edge.start);
        }

        let mut dangling: Vec<VertexId> = adjacency
            .iter()
            .filter(|(_, n)| n.len() < 2)
            .map(|(&v, _)| v)
            .collect();
        while let Some(v) = dangling.pop() {
            let Some(neighbours) = adjacency.remove(&v) else {
                continue;
            };
            for w in neighbours {
                if let Some(list) = adjacency.get_mut(&w) {
                    list.retain(|&x| x != v);
                    if list.len() < 2 {
                        dangling.push(w);
                    }
                }
            }
        }

        for (&v, neighbours) in &mut adjacency {
            let (cu, cv) = self.plane.project(&section.vertex(v)?.point);
            let mut keyed = Vec::with_capacity(neighbours.len());
            for &w in neighbours.iter() {
                let (wu, wv) = self.plane.project(&section.vertex(w)?.point);
                keyed.push(((wv - cv).atan2(wu - cu), w));
            }
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            *neighbours = keyed.into_iter().map(|(_, w)| w).collect();
        }
        Ok(adjacency)
    }
}

fn crosses(a: Side, b: Side) -> bool {
    matches!(
        (a, b),
        (Side::Above, Side::Below) | (Side::Below, Side::Above)
    )
}

/// Next vertex after walking `from -> to` with the face on the left.
fn turn(
    adjacency: &BTreeMap<VertexId, Vec<VertexId>>,
    from: VertexId,
    to: VertexId,
) -> Option<VertexId> {
    let around = adjacency.get(&to)?;
    let back = around.iter().position(|&w| w == from)?;
    Some(around[(back + around.len() - 1) % around.len()])
}

fn has_repeats(cycle: &[VertexId]) -> bool {
    let mut seen = HashSet::with_capacity(cycle.len());
    !cycle.iter().all(|v| seen.insert(*v))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use crate::operations::creation::{MakeBox, MakePolyhedron};

    fn cube() -> Mesh {
        MakeBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
            .execute()
            .unwrap()
    }

    fn z_plane(z: f64) -> Plane {
        Plane::from_normal(Point3::new(0.0, 0.0, z), Vector3::z()).unwrap()
    }

    #[test]
    fn cube_mid_cut_is_a_square() {
        let section = Bisect::new(z_plane(0.0), 1e-4).execute(&cube()).unwrap();
        assert_eq!(section.vertex_count(), 4);
        assert_eq!(section.edge_count(), 4);
        assert_eq!(section.face_count(), 1);
        for point in section.points() {
            assert!(point.z.abs() < 1e-12);
            assert!((point.x.abs() - 1.0).abs() < 1e-12);
            assert!((point.y.abs() - 1.0).abs() < 1e-12);
        }
        assert!(section.edges().all(|(_, e)| e.contour));
    }

    #[test]
    fn fill_face_follows_plane_normal() {
        let plane = Plane::from_normal(Point3::origin(), Vector3::new(1.0, 1.0, 0.0)).unwrap();
        let normal = *plane.normal();
        let section = Bisect::new(plane, 1e-4).execute(&cube()).unwrap();
        assert_eq!(section.face_count(), 1);
        let (fid, _) = section.faces().next().unwrap();
        let n = newell_normal(&section.face_points(fid).unwrap());
        assert!(n.dot(&normal) > 0.0);
    }

    #[test]
    fn missing_plane_leaves_nothing() {
        let section = Bisect::new(z_plane(5.0), 1e-4).execute(&cube()).unwrap();
        assert!(section.is_empty());
    }

    #[test]
    fn corner_touch_has_no_face() {
        let tetra = MakePolyhedron::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![0, 3, 2]],
        )
        .execute()
        .unwrap();
        let section = Bisect::new(z_plane(1.0), 1e-4).execute(&tetra).unwrap();
        assert_eq!(section.vertex_count(), 1);
        assert_eq!(section.face_count(), 0);
    }

    #[test]
    fn coplanar_face_is_kept() {
        let section = Bisect::new(z_plane(1.0), 1e-4).execute(&cube()).unwrap();
        // The top face itself plus the fill face over the same loop.
        assert_eq!(section.vertex_count(), 4);
        assert_eq!(section.edge_count(), 4);
        assert_eq!(section.face_count(), 2);
    }

    #[test]
    fn l_shaped_prism_cut_keeps_concave_outline() {
        let outline = [
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 1.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, 2.0),
        ];
        let mut points = Vec::new();
        for z in [-1.0, 1.0] {
            points.extend(outline.iter().map(|&(x, y)| Point3::new(x, y, z)));
        }
        let n = outline.len();
        let mut faces = vec![(0..n).rev().collect::<Vec<_>>(), (n..2 * n).collect()];
        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(vec![i, j, j + n, i + n]);
        }
        let prism = MakePolyhedron::new(points, faces).execute().unwrap();

        let section = Bisect::new(z_plane(0.0), 1e-4).execute(&prism).unwrap();
        assert_eq!(section.vertex_count(), 6);
        assert_eq!(section.edge_count(), 6);
        assert_eq!(section.face_count(), 1);
    }
}
