pub mod edge;
pub mod face;
pub mod solid;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use face::{FaceData, FaceId};
pub use solid::{Placement, Solid};
pub use vertex::{VertexData, VertexId};

use std::collections::{BTreeMap, HashMap};

use crate::error::TopologyError;
use crate::math::Point3;
use slotmap::SlotMap;

/// Arena that owns the vertices, edges and faces of one mesh.
///
/// Entities reference each other via typed IDs (generational indices),
/// avoiding self-referential structures and enabling safe mutation.
/// Iteration follows insertion order, so every traversal is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    faces: SlotMap<FaceId, FaceData>,
    edge_index: HashMap<(VertexId, VertexId), EdgeId>,
}

/// Canonical key for an unordered vertex pair.
fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Mesh {
    /// Creates a new, empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the mesh has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        self.vertices.insert(VertexData::new(point))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Iterates over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Iterates mutably over all vertices.
    pub fn vertices_mut(&mut self) -> impl Iterator<Item = (VertexId, &mut VertexData)> {
        self.vertices.iter_mut()
    }

    /// Returns the positions of all vertices.
    #[must_use]
    pub fn points(&self) -> Vec<Point3> {
        self.vertices.values().map(|v| v.point).collect()
    }

    /// Removes a vertex together with every edge and face that uses it.
    pub fn remove_vertex(&mut self, id: VertexId) {
        let incident: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|(_, e)| e.start == id || e.end == id)
            .map(|(eid, _)| eid)
            .collect();
        for eid in incident {
            self.remove_edge(eid);
        }
        let faces: Vec<FaceId> = self
            .faces
            .iter()
            .filter(|(_, f)| f.vertices.contains(&id))
            .map(|(fid, _)| fid)
            .collect();
        for fid in faces {
            self.faces.remove(fid);
        }
        self.vertices.remove(id);
    }

    // --- Edge operations ---

    /// Returns the edge joining `a` and `b`, in either direction.
    #[must_use]
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&edge_key(a, b)).copied()
    }

    /// Inserts an edge between two vertices, or returns the existing one.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing or both ends are the same vertex.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, TopologyError> {
        if a == b {
            return Err(TopologyError::InvalidTopology(
                "edge endpoints must be distinct".into(),
            ));
        }
        self.vertex(a)?;
        self.vertex(b)?;
        if let Some(existing) = self.find_edge(a, b) {
            return Ok(existing);
        }
        let id = self.edges.insert(EdgeData::new(a, b));
        self.edge_index.insert(edge_key(a, b), id);
        Ok(id)
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, TopologyError> {
        self.edges
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Returns a mutable reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut EdgeData, TopologyError> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("edge".into()))
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Removes an edge together with every face that uses it.
    pub fn remove_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.remove(id) else {
            return;
        };
        let key = edge_key(edge.start, edge.end);
        self.edge_index.remove(&key);
        let faces: Vec<FaceId> = self
            .faces
            .iter()
            .filter(|(_, f)| f.vertex_pairs().any(|(a, b)| edge_key(a, b) == key))
            .map(|(fid, _)| fid)
            .collect();
        for fid in faces {
            self.faces.remove(fid);
        }
    }

    /// Sets or clears the contour mark on every edge.
    pub fn set_contour_marks(&mut self, marked: bool) {
        for edge in self.edges.values_mut() {
            edge.contour = marked;
        }
    }

    // --- Face operations ---

    /// Inserts a face from a vertex loop, creating missing edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop has fewer than three vertices, repeats a
    /// vertex, or references a missing vertex.
    pub fn add_face(&mut self, vertices: Vec<VertexId>) -> Result<FaceId, TopologyError> {
        if vertices.len() < 3 {
            return Err(TopologyError::InvalidTopology(
                "face needs at least 3 vertices".into(),
            ));
        }
        for (i, v) in vertices.iter().enumerate() {
            if vertices[i + 1..].contains(v) {
                return Err(TopologyError::InvalidTopology(
                    "face repeats a vertex".into(),
                ));
            }
        }
        let face = FaceData { vertices };
        for (a, b) in face.vertex_pairs() {
            self.add_edge(a, b)?;
        }
        Ok(self.faces.insert(face))
    }

    /// Returns a reference to the face data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the mesh.
    pub fn face(&self, id: FaceId) -> Result<&FaceData, TopologyError> {
        self.faces
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("face".into()))
    }

    /// Iterates over all faces.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &FaceData)> {
        self.faces.iter()
    }

    /// Removes a face, leaving its edges and vertices in place.
    pub fn remove_face(&mut self, id: FaceId) {
        self.faces.remove(id);
    }

    /// Returns the positions of a face's vertex loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the face or one of its vertices is missing.
    pub fn face_points(&self, id: FaceId) -> Result<Vec<Point3>, TopologyError> {
        self.face(id)?
            .vertices
            .iter()
            .map(|&v| self.vertex(v).map(|d| d.point))
            .collect()
    }

    // --- Incidence ---

    /// Maps every edge to the faces that use it (edges without faces map to an empty list).
    #[must_use]
    pub fn edge_faces(&self) -> BTreeMap<EdgeId, Vec<FaceId>> {
        let mut map: BTreeMap<EdgeId, Vec<FaceId>> =
            self.edges.keys().map(|e| (e, Vec::new())).collect();
        for (fid, face) in &self.faces {
            for (a, b) in face.vertex_pairs() {
                if let Some(eid) = self.find_edge(a, b) {
                    map.entry(eid).or_default().push(fid);
                }
            }
        }
        map
    }

    /// Counts the edges incident to every vertex.
    #[must_use]
    pub fn vertex_edge_counts(&self) -> BTreeMap<VertexId, usize> {
        let mut counts: BTreeMap<VertexId, usize> =
            self.vertices.keys().map(|v| (v, 0)).collect();
        for edge in self.edges.values() {
            *counts.entry(edge.start).or_default() += 1;
            *counts.entry(edge.end).or_default() += 1;
        }
        counts
    }
}
