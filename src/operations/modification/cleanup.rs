use std::collections::BTreeSet;

use crate::topology::{FaceId, Mesh};

/// Removes faces that duplicate a neighbouring face.
///
/// Two faces sharing an edge are the same when the later one has no vertex
/// outside the earlier one. The later face is removed; edges and vertices
/// are left in place.
#[derive(Debug, Default)]
pub struct MergeDuplicateFaces;

impl MergeDuplicateFaces {
    /// Creates a new `MergeDuplicateFaces` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation and returns the number of faces removed.
    pub fn execute(&self, mesh: &mut Mesh) -> usize {
        let mut doomed: BTreeSet<FaceId> = BTreeSet::new();
        for faces in mesh.edge_faces().values() {
            for (i, &first) in faces.iter().enumerate() {
                if doomed.contains(&first) {
                    continue;
                }
                let Ok(first_data) = mesh.face(first) else {
                    continue;
                };
                for &second in &faces[i + 1..] {
                    if second == first || doomed.contains(&second) {
                        continue;
                    }
                    if let Ok(second_data) = mesh.face(second) {
                        if second_data.is_covered_by(first_data) {
                            doomed.insert(second);
                        }
                    }
                }
            }
        }
        for &fid in &doomed {
            mesh.remove_face(fid);
        }
        doomed.len()
    }
}

/// Removes edges that no face uses.
#[derive(Debug, Default)]
pub struct DeleteLooseEdges;

impl DeleteLooseEdges {
    /// Creates a new `DeleteLooseEdges` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation and returns the number of edges removed.
    pub fn execute(&self, mesh: &mut Mesh) -> usize {
        let loose: Vec<_> = mesh
            .edge_faces()
            .into_iter()
            .filter(|(_, faces)| faces.is_empty())
            .map(|(eid, _)| eid)
            .collect();
        for &eid in &loose {
            mesh.remove_edge(eid);
        }
        loose.len()
    }
}

/// Removes vertices that no edge uses.
#[derive(Debug, Default)]
pub struct DeleteLooseVertices;

impl DeleteLooseVertices {
    /// Creates a new `DeleteLooseVertices` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation and returns the number of vertices removed.
    pub fn execute(&self, mesh: &mut Mesh) -> usize {
        let loose: Vec<_> = mesh
            .vertex_edge_counts()
            .into_iter()
            .filter(|(_, count)| *count == 0)
            .map(|(vid, _)| vid)
            .collect();
        for &vid in &loose {
            mesh.remove_vertex(vid);
        }
        loose.len()
    }
}
