mod triangulate;

pub use triangulate::Triangulate;
