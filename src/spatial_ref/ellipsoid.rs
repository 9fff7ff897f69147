/// Reference ellipsoid, in metres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    pub semi_major: f64,
    pub semi_minor: f64,
}

impl Ellipsoid {
    /// a = 6378137, 1/f = 298.257223563
    pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 6_356_752.314_245_179);
    /// a = 6378137, 1/f = 298.257222101
    pub const GRS80: Ellipsoid = Ellipsoid::new(6_378_137.0, 6_356_752.314_140_356);
    pub const CLARKE_1866: Ellipsoid = Ellipsoid::new(6_378_206.4, 6_356_583.8);

    pub const fn new(semi_major: f64, semi_minor: f64) -> Self {
        Ellipsoid {
            semi_major,
            semi_minor,
        }
    }

    /// A sphere of the given radius.
    pub const fn sphere(radius: f64) -> Self {
        Ellipsoid::new(radius, radius)
    }

    /// An infinite inverse flattening describes a sphere.
    pub fn from_inverse_flattening(semi_major: f64, inverse_flattening: f64) -> Self {
        if inverse_flattening.is_infinite() || inverse_flattening == 0.0 {
            return Ellipsoid::sphere(semi_major);
        }
        Ellipsoid::new(semi_major, semi_major * (1.0 - 1.0 / inverse_flattening))
    }

    pub fn is_sphere(&self) -> bool {
        self.semi_major == self.semi_minor
    }

    pub fn inverse_flattening(&self) -> f64 {
        if self.is_sphere() {
            return f64::INFINITY;
        }
        self.semi_major / (self.semi_major - self.semi_minor)
    }

    /// First eccentricity squared, `1 - b²/a²`.
    pub fn eccentricity_squared(&self) -> f64 {
        1.0 - (self.semi_minor * self.semi_minor) / (self.semi_major * self.semi_major)
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_near;

    #[test]
    fn test_wgs84() {
        let wgs84 = Ellipsoid::WGS84;
        assert_near!(wgs84.semi_minor, 6_356_752.314_245, epsilon = 1e-6);
        assert_near!(wgs84.eccentricity_squared(), 0.006_694_379_990_14, epsilon = 1e-12);
        assert_near!(wgs84.inverse_flattening(), 298.257_223_563, epsilon = 1e-6);
    }

    #[test]
    fn test_from_inverse_flattening() {
        let grs80 = Ellipsoid::from_inverse_flattening(6_378_137.0, 298.257_222_101);
        assert_near!(grs80.semi_minor, Ellipsoid::GRS80.semi_minor, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere() {
        let sphere = Ellipsoid::from_inverse_flattening(6_371_000.0, f64::INFINITY);
        assert!(sphere.is_sphere());
        assert_eq!(sphere.eccentricity(), 0.0);
        assert!(sphere.inverse_flattening().is_infinite());
    }
}
