//! The base shapes of a project, read from a JSON library file.

mod library;
mod shape;

pub use library::{ShapeAsset, ShapeLibrary};
pub use shape::Shape;
