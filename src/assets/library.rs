use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::GenerationParams;
use crate::error::{AssetError, Result};

use super::Shape;

/// One shape as stored in the library file.
///
/// Placement keys (`location`, `rotation`, `scale`) may appear in the file
/// but are ignored: every answer starts from the bare mesh and applies its
/// own rotation and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeAsset {
    pub name: String,
    /// Collection the shape belongs to, e.g. `Classic.01`.
    pub collection: String,
    pub vertices: Vec<[f64; 3]>,
    /// Face loops as indices into `vertices`.
    pub faces: Vec<Vec<usize>>,
}

/// A set of base shapes grouped into collections, plus the generation
/// settings of the project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeLibrary {
    #[serde(default)]
    pub generation: GenerationParams,
    pub shapes: Vec<ShapeAsset>,
}

impl ShapeLibrary {
    /// Reads a library from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or two shapes
    /// share a name.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let library: Self = serde_json::from_reader(BufReader::new(file))?;
        library.check_names()?;
        debug!(path = %path.display(), shapes = library.shapes.len(), "loaded shape library");
        Ok(library)
    }

    fn check_names(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for asset in &self.shapes {
            if !seen.insert(asset.name.as_str()) {
                return Err(AssetError::Invalid {
                    name: asset.name.clone(),
                    reason: "duplicate shape name".into(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Builds the shape with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if no such shape exists or its mesh is invalid.
    pub fn shape(&self, name: &str) -> Result<Shape> {
        let asset = self
            .shapes
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| AssetError::MissingAsset(name.to_string()))?;
        Shape::from_asset(asset)
    }

    /// Builds every shape whose collection name starts with `group_id`,
    /// sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the group has no shapes or a mesh is invalid.
    pub fn shapes_in_group(&self, group_id: &str) -> Result<Vec<Shape>> {
        let mut assets: Vec<&ShapeAsset> = self
            .shapes
            .iter()
            .filter(|a| a.collection.starts_with(group_id))
            .collect();
        if assets.is_empty() {
            return Err(AssetError::MissingAsset(format!("group {group_id}")).into());
        }
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        assets.into_iter().map(Shape::from_asset).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    const LIBRARY: &str = r#"{
        "generation": { "ratio": 10.0 },
        "shapes": [
            {
                "name": "b-wedge",
                "collection": "Classic.01",
                "vertices": [[0,0,0],[1,0,0],[0,1,0],[0,0,1]],
                "faces": [[0,2,1],[0,1,3],[1,2,3],[0,3,2]]
            },
            {
                "name": "a-wedge",
                "collection": "Classic.01.extra",
                "vertices": [[0,0,0],[1,0,0],[0,1,0],[0,0,1]],
                "faces": [[0,2,1],[0,1,3],[1,2,3],[0,3,2]],
                "scale": [2, 2, 2]
            },
            {
                "name": "other",
                "collection": "Classic.02",
                "vertices": [[0,0,0],[1,0,0],[0,1,0],[0,0,1]],
                "faces": [[0,2,1],[0,1,3],[1,2,3],[0,3,2]]
            }
        ]
    }"#;

    fn library() -> ShapeLibrary {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(LIBRARY.as_bytes()).unwrap();
        ShapeLibrary::load(file.path()).unwrap()
    }

    #[test]
    fn group_members_are_sorted_by_name() {
        let shapes = library().shapes_in_group("Classic.01").unwrap();
        let names: Vec<&str> = shapes.iter().map(Shape::name).collect();
        assert_eq!(names, ["a-wedge", "b-wedge"]);
    }

    #[test]
    fn generation_section_overrides_defaults() {
        let library = library();
        assert!((library.generation.ratio - 10.0).abs() < f64::EPSILON);
        assert_eq!(library.generation.plane_indices, vec![1, 2, 10, 16, 20]);
    }

    #[test]
    fn missing_group_and_shape_are_reported() {
        let library = library();
        assert!(library.shapes_in_group("Classic.09").is_err());
        assert!(library.shape("nope").is_err());
        assert_eq!(library.shape("other").unwrap().name(), "other");
    }

    #[test]
    fn placement_keys_are_ignored() {
        let wedge = library().shape("a-wedge").unwrap().scratch();
        let reach = wedge
            .world_points()
            .iter()
            .fold(0.0_f64, |m, p| m.max(p.x).max(p.y).max(p.z));
        assert!((reach - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut library = library();
        library.shapes.push(library.shapes[0].clone());
        assert!(library.check_names().is_err());
    }
}
