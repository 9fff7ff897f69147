use crate::errors::{GeokitError, Result};
use crate::vector::Coord;

/// Radius of the sphere used by [`air_distance`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Great-circle distance in kilometres between two `(longitude, latitude)`
/// positions in degrees.
///
/// Fails with [`GeokitError::OutOfRange`] for a longitude outside
/// `[-180, 180]` or a latitude outside `[-90, 90]`.
pub fn air_distance(from: Coord, to: Coord) -> Result<f64> {
    check_position(from)?;
    check_position(to)?;
    if from == to {
        return Ok(0.0);
    }
    let (lat1, lon1) = (from.y.to_radians(), from.x.to_radians());
    let (lat2, lon2) = (to.y.to_radians(), to.x.to_radians());
    let cos_angle = lat1.cos() * lon1.cos() * lat2.cos() * lon2.cos()
        + lat1.cos() * lon1.sin() * lat2.cos() * lon2.sin()
        + lat1.sin() * lat2.sin();
    // rounding can push nearby points just past 1
    Ok(EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos())
}

fn check_position(coord: Coord) -> Result<()> {
    if !(-180.0..=180.0).contains(&coord.x) {
        return Err(GeokitError::OutOfRange {
            name: "longitude",
            value: coord.x,
            msg: "must be within [-180, 180]".to_string(),
        });
    }
    if !(-90.0..=90.0).contains(&coord.y) {
        return Err(GeokitError::OutOfRange {
            name: "latitude",
            value: coord.y,
            msg: "must be within [-90, 90]".to_string(),
        });
    }
    Ok(())
}
