mod bisect;
mod cleanup;
mod create_answer;

pub use bisect::Bisect;
pub use cleanup::{DeleteLooseEdges, DeleteLooseVertices, MergeDuplicateFaces};
pub use create_answer::{
    Answer, CreateAnswer, DEFAULT_BISECT_TOLERANCE, DEFAULT_RATIO, DEFAULT_REFERENCE_SIZE,
};
