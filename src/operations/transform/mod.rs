mod general;
mod rotate;
mod scale;

pub use general::GeneralTransform;
pub use rotate::{euler_zyx, ApplyRotation};
pub use scale::ScaleAxes;
