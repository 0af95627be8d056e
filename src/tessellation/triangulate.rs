use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation};

use crate::error::{Result, TessellationError};
use crate::geometry::Plane;
use crate::math::polygon_3d::newell_normal;
use crate::math::TOLERANCE;
use crate::topology::{FaceId, Mesh, VertexId};

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// Splits every face of a mesh with more than three vertices into triangles.
///
/// Each face is projected to its own plane and triangulated with a
/// constrained Delaunay triangulation, which maximises the smallest angle of
/// the result. No vertices are added; new diagonals become edges of the mesh.
/// Triangles keep the winding of the face they came from.
#[derive(Debug, Default)]
pub struct Triangulate;

impl Triangulate {
    /// Creates a new `Triangulate` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation, modifying the mesh in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if a face has no area or its outline cannot be
    /// triangulated without crossing itself.
    pub fn execute(&self, mesh: &mut Mesh) -> Result<()> {
        let polygons: Vec<FaceId> = mesh
            .faces()
            .filter(|(_, f)| f.vertices.len() > 3)
            .map(|(id, _)| id)
            .collect();

        for fid in polygons {
            let triangles = triangulate_face(mesh, fid)?;
            mesh.remove_face(fid);
            for triangle in triangles {
                mesh.add_face(triangle.to_vec())?;
            }
        }
        Ok(())
    }
}

fn triangulate_face(mesh: &Mesh, fid: FaceId) -> Result<Vec<[VertexId; 3]>> {
    let loop_ids = mesh.face(fid)?.vertices.clone();
    let points = mesh.face_points(fid)?;
    let normal = newell_normal(&points);
    if normal.norm() < TOLERANCE {
        return Err(TessellationError::Failed("face has no area".into()).into());
    }
    let plane = Plane::from_normal(points[0], normal)?;

    let mut cdt = Cdt::new();
    let mut handles = Vec::with_capacity(points.len());
    let mut owners: HashMap<usize, VertexId> = HashMap::new();
    for (point, &vid) in points.iter().zip(&loop_ids) {
        let (u, v) = plane.project(point);
        let handle = cdt
            .insert(SpadePoint2::new(snap(u), snap(v)))
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        if owners.insert(handle.index(), vid).is_some() {
            return Err(TessellationError::Failed("face outline touches itself".into()).into());
        }
        handles.push(handle);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if !cdt.can_add_constraint(from, to) {
            return Err(TessellationError::Failed("face outline crosses itself".into()).into());
        }
        cdt.add_constraint(from, to);
    }

    let interior = classify_interior_faces(&cdt);
    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        if !interior.contains(&face.fix().index()) {
            continue;
        }
        let mut triangle = [loop_ids[0]; 3];
        for (slot, vertex) in triangle.iter_mut().zip(face.vertices()) {
            *slot = owners[&vertex.fix().index()];
        }
        triangles.push(triangle);
    }
    Ok(triangles)
}

/// Flushes rounding noise to zero. spade refuses nonzero coordinates
/// smaller than [`spade::MIN_ALLOWED_VALUE`].
fn snap(c: f64) -> f64 {
    if c.abs() < TOLERANCE {
        0.0
    } else {
        c
    }
}

/// Classifies which inner faces of the CDT are inside the outline using flood-fill.
///
/// Starts from faces adjacent to the outer (infinite) face at depth 0. Each time
/// a constraint edge is crossed, depth increments. Odd depth = interior.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() != outer_fix {
            continue;
        }
        if let Some(inner) = edge.rev().face().as_inner() {
            let idx = inner.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, depth);
            if depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((inner.fix(), depth));
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let Some(neighbour) = edge.rev().face().as_inner() else {
                continue;
            };
            let idx = neighbour.fix().index();
            if depth_map.contains_key(&idx) {
                continue;
            }
            let next_depth = depth + u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
            depth_map.insert(idx, next_depth);
            if next_depth % 2 == 1 {
                interior.insert(idx);
            }
            queue.push_back((neighbour.fix(), next_depth));
        }
    }

    interior
}
