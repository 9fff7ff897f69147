use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::errors::{GeokitError, Result};
use crate::spatial_ref::{create_projection, MapProjection, ProjectionParameters};
use crate::vector::Coord;

/// Applies a [`MapProjection`] to coordinates, in either direction.
///
/// Cloning is cheap: clones share the projection and its cached inverse.
#[derive(Clone)]
pub struct CoordTransform {
    projection: Arc<dyn MapProjection>,
    reversed: bool,
}

impl CoordTransform {
    /// Wraps `projection`, applying it in its own role.
    pub fn new(projection: Box<dyn MapProjection>) -> Self {
        CoordTransform {
            projection: Arc::from(projection),
            reversed: false,
        }
    }

    /// Constructs a transformation from a projection name and parameters.
    ///
    /// See: [`create_projection`]
    pub fn from_projection(name: &str, parameters: ProjectionParameters) -> Result<Self> {
        Ok(Self::new(create_projection(name, parameters)?))
    }

    /// The transformation going the other way.
    pub fn inverse(&self) -> CoordTransform {
        CoordTransform {
            projection: Arc::clone(&self.projection),
            reversed: !self.reversed,
        }
    }

    /// `true` when this transformation maps metres to degrees.
    pub fn is_inverse(&self) -> bool {
        self.projection.is_inverse() != self.reversed
    }

    fn projection(&self) -> Result<&dyn MapProjection> {
        if self.reversed {
            self.projection.inverse()
        } else {
            Ok(self.projection.as_ref())
        }
    }

    pub fn transform_point(&self, coord: Coord) -> Result<Coord> {
        self.projection()?.transform(coord)
    }

    /// Transform coordinates in place.
    ///
    /// # Arguments
    /// * `x` - slice of x coordinates
    /// * `y` - slice of y coordinates (must match x in length)
    ///
    /// Either every coordinate is transformed or, on error, none is.
    pub fn transform_coords(&self, x: &mut [f64], y: &mut [f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(GeokitError::InvalidArgument {
                argument: "y",
                msg: format!(
                    "transform coordinate slices have different lengths: {} != {}",
                    x.len(),
                    y.len()
                ),
            });
        }
        let projection = self.projection()?;
        let transformed = x
            .iter()
            .zip(y.iter())
            .map(|(&x, &y)| projection.transform(Coord { x, y }))
            .collect::<Result<Vec<_>>>()?;
        for ((x, y), coord) in x.iter_mut().zip(y.iter_mut()).zip(transformed) {
            *x = coord.x;
            *y = coord.y;
        }
        Ok(())
    }

    /// Transform bounding box, densifying the edges to account for nonlinear
    /// transformations.
    ///
    /// # Arguments
    /// * `bounds` - array of [xmin, ymin, xmax, ymax]
    /// * `densify_pts` - number of points added between the corners of each
    ///                   edge (recommended: 21, 0 projects the corners only)
    ///
    /// # Returns
    /// `Ok([f64; 4])` with the extent of the transformed boundary
    /// `Err` if the bounds are inverted or a boundary point fails to transform.
    pub fn transform_bounds(&self, bounds: &[f64; 4], densify_pts: usize) -> Result<[f64; 4]> {
        let [min_x, min_y, max_x, max_y] = *bounds;
        if !(min_x <= max_x && min_y <= max_y) {
            return Err(GeokitError::InvalidArgument {
                argument: "bounds",
                msg: format!("{bounds:?} is not [xmin, ymin, xmax, ymax]"),
            });
        }
        let projection = self.projection()?;
        let steps = densify_pts + 1;
        let mut out = [f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY];
        let mut include = |x: f64, y: f64| -> Result<()> {
            let coord = projection.transform(Coord { x, y })?;
            out[0] = out[0].min(coord.x);
            out[1] = out[1].min(coord.y);
            out[2] = out[2].max(coord.x);
            out[3] = out[3].max(coord.y);
            Ok(())
        };
        for i in 0..steps {
            let t = i as f64 / steps as f64;
            let x = min_x + (max_x - min_x) * t;
            let y = min_y + (max_y - min_y) * t;
            include(x, min_y)?;
            include(max_x, y)?;
            include(max_x - (x - min_x), max_y)?;
            include(min_x, max_y - (y - min_y))?;
        }
        Ok(out)
    }
}

impl Debug for CoordTransform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordTransform")
            .field("projection", &self.projection.name())
            .field("inverse", &self.is_inverse())
            .finish()
    }
}
