pub mod answers;
pub mod assets;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod permutations;
pub mod pipeline;
pub mod tessellation;
pub mod topology;

pub use error::{Result, SectionError};
