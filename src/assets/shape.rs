use crate::error::{AssetError, Result};
use crate::math::Point3;
use crate::operations::creation::MakePolyhedron;
use crate::topology::{Mesh, Solid};

use super::ShapeAsset;

/// A base shape: a named, immutable mesh.
///
/// Shapes hand out copies; nothing edits a shape once it is built.
#[derive(Debug, Clone)]
pub struct Shape {
    solid: Solid,
}

impl Shape {
    /// Wraps a solid as a shape.
    #[must_use]
    pub fn new(solid: Solid) -> Self {
        Self { solid }
    }

    /// Builds a shape from its library entry.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinate is not finite, the asset has no
    /// faces, or a face loop is invalid.
    pub fn from_asset(asset: &ShapeAsset) -> Result<Self> {
        let invalid = |reason: String| AssetError::Invalid {
            name: asset.name.clone(),
            reason,
        };

        if asset.faces.is_empty() {
            return Err(invalid("no faces".into()).into());
        }
        let all_finite = asset
            .vertices
            .iter()
            .flatten()
            .all(|c| c.is_finite());
        if !all_finite {
            return Err(invalid("non-finite coordinate".into()).into());
        }

        let points = asset
            .vertices
            .iter()
            .map(|&[x, y, z]| Point3::new(x, y, z))
            .collect();
        let mesh = MakePolyhedron::new(points, asset.faces.clone())
            .execute()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            solid: Solid::new(asset.name.clone(), mesh),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.solid.name
    }

    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.solid.mesh
    }

    /// Returns a fresh working copy of the shape.
    #[must_use]
    pub fn scratch(&self) -> Solid {
        self.solid.clone()
    }
}
