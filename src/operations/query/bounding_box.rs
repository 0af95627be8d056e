use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::Solid;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Extent along each axis.
    #[must_use]
    pub fn span(&self) -> Vector3 {
        self.max - self.min
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Point3 {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }
}

/// Computes the world-space axis-aligned bounding box of a solid.
pub struct BoundingBox<'a> {
    solid: &'a Solid,
}

impl<'a> BoundingBox<'a> {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: &'a Solid) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid has no vertices.
    pub fn execute(&self) -> Result<Aabb> {
        let mut points = self.solid.world_points().into_iter();

        let first = points.next().ok_or_else(|| {
            OperationError::InvalidInput(format!("solid {} has no vertices", self.solid.name))
        })?;
        let (min, max) = points.fold((first, first), |(lo, hi), p| (lo.inf(&p), hi.sup(&p)));
        Ok(Aabb { min, max })
    }
}
