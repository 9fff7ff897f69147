//! Map projections and coordinate transformations
//!
//! Projections are built by name from a [`ProjectionParameters`] list and
//! applied through a [`CoordTransform`], to coordinate slices, bounding boxes
//! or whole geometries (see [`Geometry::transform`](crate::vector::Geometry::transform)).
//!
//! ```
//! use geokit::spatial_ref::{CoordTransform, Ellipsoid, ProjectionParameters};
//!
//! # fn main() -> geokit::errors::Result<()> {
//! let params = ProjectionParameters::for_ellipsoid(Ellipsoid::GRS80)
//!     .with("central_meridian", -96.0)
//!     .with("latitude_of_origin", 23.0)
//!     .with("standard_parallel_1", 29.5)
//!     .with("standard_parallel_2", 45.5);
//! let to_albers = CoordTransform::from_projection("albers_conic_equal_area", params)?;
//!
//! let mut xs = [-122.4, -74.0];
//! let mut ys = [37.8, 40.7];
//! to_albers.transform_coords(&mut xs, &mut ys)?;
//! to_albers.inverse().transform_coords(&mut xs, &mut ys)?;
//! assert!((xs[0] + 122.4).abs() < 1e-8);
//! # Ok(())
//! # }
//! ```

mod albers;
mod distance;
mod ellipsoid;
mod parameters;
mod projection;
mod transform;

pub use albers::AlbersProjection;
pub use distance::{air_distance, EARTH_RADIUS_KM};
pub use ellipsoid::Ellipsoid;
pub use parameters::ProjectionParameters;
pub use projection::{create_projection, MapProjection};
pub use transform::CoordTransform;
