use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a face in a mesh.
    pub struct FaceId;
}

/// Data associated with a mesh face.
///
/// A face is a closed loop of at least three distinct vertices. Consecutive
/// vertices (and the last/first pair) are joined by edges.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The ordered vertex loop.
    pub vertices: Vec<VertexId>,
}

impl FaceData {
    /// Iterates over the consecutive vertex pairs of the loop, closing it.
    pub fn vertex_pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Returns `true` if every vertex of this face also belongs to `other`.
    #[must_use]
    pub fn is_covered_by(&self, other: &FaceData) -> bool {
        self.vertices.iter().all(|v| other.vertices.contains(v))
    }
}
