mod bounding_box;
mod extract_boundary;

pub use bounding_box::{Aabb, BoundingBox};
pub use extract_boundary::{ExtractBoundary, Segment2};
