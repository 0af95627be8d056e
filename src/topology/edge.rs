use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a mesh.
    pub struct EdgeId;
}

/// Data associated with a mesh edge.
///
/// An edge connects two distinct vertices. There is at most one edge per
/// unordered vertex pair.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// Contour mark, set on the outline of a finished section.
    pub contour: bool,
}

impl EdgeData {
    /// Creates an unmarked edge between two vertices.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self {
            start,
            end,
            contour: false,
        }
    }
}
