use crate::errors::Result;
use crate::spatial_ref::CoordTransform;
use crate::vector::Geometry;

/// # Geometry Transformations
///
/// These methods provide map projection of a `Geometry`.
impl Geometry {
    /// Apply a coordinate transformation to every coordinate, mutating the
    /// [`Geometry`] in-place.
    ///
    /// Stops at the first coordinate that fails to transform, leaving the
    /// coordinates before it transformed.
    pub fn transform_inplace(&mut self, transform: &CoordTransform) -> Result<()> {
        self.try_apply_coords_mut(&mut |coord| {
            *coord = transform.transform_point(*coord)?;
            Ok(())
        })
    }

    /// Apply a coordinate transformation to a clone of `Self`.
    pub fn transform(&self, transform: &CoordTransform) -> Result<Geometry> {
        let mut geometry = self.clone();
        geometry.transform_inplace(transform)?;
        Ok(geometry)
    }
}
