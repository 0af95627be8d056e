use crate::error::{Result, TopologyError};
use crate::math::Point3;
use crate::topology::{Mesh, VertexId};

/// Creates a mesh from a vertex list and face index loops.
pub struct MakePolyhedron {
    points: Vec<Point3>,
    faces: Vec<Vec<usize>>,
}

impl MakePolyhedron {
    /// Creates a new `MakePolyhedron` operation.
    #[must_use]
    pub fn new(points: Vec<Point3>, faces: Vec<Vec<usize>>) -> Self {
        Self { points, faces }
    }

    /// Executes the operation, returning the mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if a face index is out of range or a face loop is
    /// degenerate (fewer than three vertices, or a repeated vertex).
    pub fn execute(&self) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        let ids: Vec<VertexId> = self.points.iter().map(|&p| mesh.add_vertex(p)).collect();

        for face in &self.faces {
            let mut loop_ids = Vec::with_capacity(face.len());
            for &index in face {
                let id = ids.get(index).ok_or(TopologyError::IndexOutOfRange {
                    index,
                    count: ids.len(),
                })?;
                loop_ids.push(*id);
            }
            mesh.add_face(loop_ids)?;
        }

        Ok(mesh)
    }
}
