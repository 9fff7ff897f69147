use std::fmt::Debug;

use crate::errors::{GeokitError, Result};
use crate::spatial_ref::{AlbersProjection, ProjectionParameters};
use crate::vector::Coord;

/// A map projection between geographic degrees and projected metres.
///
/// An instance has a fixed role: a forward projection maps degrees to metres
/// in [`MapProjection::transform`], an inverse one maps metres to degrees.
pub trait MapProjection: Debug + Send + Sync {
    /// Projection name, e.g. `albers_conic_equal_area`.
    fn name(&self) -> &str;

    fn parameters(&self) -> &ProjectionParameters;

    /// Project a `(longitude, latitude)` pair in degrees.
    fn degrees_to_meters(&self, coord: Coord) -> Result<Coord>;

    /// Unproject an `(x, y)` pair in metres.
    fn meters_to_degrees(&self, coord: Coord) -> Result<Coord>;

    fn is_inverse(&self) -> bool;

    /// A projection with the opposite role and the same parameters. Built on
    /// first use and cached.
    fn inverse(&self) -> Result<&dyn MapProjection>;

    fn transform(&self, coord: Coord) -> Result<Coord> {
        if self.is_inverse() {
            self.meters_to_degrees(coord)
        } else {
            self.degrees_to_meters(coord)
        }
    }
}

/// Build a forward projection by name.
///
/// Recognised names: `albers_conic_equal_area` and `albers`.
pub fn create_projection(name: &str, parameters: ProjectionParameters) -> Result<Box<dyn MapProjection>> {
    match name.to_ascii_lowercase().as_str() {
        "albers_conic_equal_area" | "albers" => {
            Ok(Box::new(AlbersProjection::new(parameters)?))
        }
        _ => Err(GeokitError::UnsupportedProjection(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::spatial_ref::Ellipsoid;

    #[test]
    fn test_unknown_projection() {
        let err = create_projection("transverse_mercator", ProjectionParameters::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn test_albers_by_name() {
        let params = ProjectionParameters::for_ellipsoid(Ellipsoid::WGS84)
            .with("central_meridian", 0.0)
            .with("latitude_of_origin", 0.0)
            .with("standard_parallel_1", 20.0)
            .with("standard_parallel_2", 60.0);
        let projection = create_projection("Albers", params).unwrap();
        assert_eq!(projection.name(), "albers_conic_equal_area");
        assert!(!projection.is_inverse());
        assert!(projection.inverse().unwrap().is_inverse());
    }

    #[test]
    fn test_missing_parameter_fails_construction() {
        let params = ProjectionParameters::for_ellipsoid(Ellipsoid::WGS84);
        let err = create_projection("albers", params).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }
}
