use std::f64::consts::FRAC_PI_2;

use once_cell::sync::OnceCell;

use crate::errors::{GeokitError, Result};
use crate::spatial_ref::{Ellipsoid, MapProjection, ProjectionParameters};
use crate::vector::Coord;

const TOL: f64 = 1e-10;
const EPS: f64 = 1e-7;
const MAX_ITER: usize = 15;

/// Albers Equal-Area Conic projection, on a sphere or an ellipsoid.
///
/// Parameters, angles in degrees and lengths in metres:
///
/// | Name                  | Required | Default |
/// |-----------------------|----------|---------|
/// | `semi_major`          | yes      |         |
/// | `semi_minor`          | yes      |         |
/// | `central_meridian`    | yes      |         |
/// | `latitude_of_origin`  | yes      |         |
/// | `standard_parallel_1` | yes      |         |
/// | `standard_parallel_2` | yes      |         |
/// | `scale_factor`        | no       | 1       |
/// | `false_easting`       | no       | 0       |
/// | `false_northing`      | no       | 0       |
///
/// The sphere formulas apply when `semi_major == semi_minor`. The inverse on
/// the ellipsoid solves for latitude iteratively and fails with
/// [`GeokitError::NoConvergence`] rather than return an imprecise value.
///
/// ```
/// use geokit::spatial_ref::{AlbersProjection, Ellipsoid, MapProjection, ProjectionParameters};
/// use geokit::vector::Coord;
///
/// let params = ProjectionParameters::for_ellipsoid(Ellipsoid::WGS84)
///     .with("central_meridian", -96.0)
///     .with("latitude_of_origin", 37.5)
///     .with("standard_parallel_1", 29.5)
///     .with("standard_parallel_2", 45.5);
/// let albers = AlbersProjection::new(params).unwrap();
/// let projected = albers.degrees_to_meters(Coord { x: -96.0, y: 37.5 }).unwrap();
/// assert!(projected.x.abs() < 1e-6 && projected.y.abs() < 1e-6);
/// ```
#[derive(Debug)]
pub struct AlbersProjection {
    parameters: ProjectionParameters,
    is_inverse: bool,
    is_spherical: bool,
    e: f64,
    es: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
    global_scale: f64,
    n: f64,
    c: f64,
    rho0: f64,
    ec: f64,
    inverse: OnceCell<Box<AlbersProjection>>,
}

impl AlbersProjection {
    pub const NAME: &'static str = "albers_conic_equal_area";

    /// A forward projection.
    pub fn new(parameters: ProjectionParameters) -> Result<Self> {
        Self::with_role(parameters, false)
    }

    fn with_role(parameters: ProjectionParameters, is_inverse: bool) -> Result<Self> {
        let ellipsoid = Ellipsoid::new(
            parameters.get("semi_major")?,
            parameters.get("semi_minor")?,
        );
        if !(ellipsoid.semi_major > 0.0 && ellipsoid.semi_minor > 0.0) {
            return Err(GeokitError::OutOfRange {
                name: "semi_major",
                value: ellipsoid.semi_major,
                msg: "ellipsoid axes must be positive".to_string(),
            });
        }
        let central_meridian = parameters.get("central_meridian")?.to_radians();
        let latitude_of_origin = parameters.get("latitude_of_origin")?.to_radians();
        let phi1 = parameters.get("standard_parallel_1")?.to_radians();
        let phi2 = parameters.get("standard_parallel_2")?.to_radians();
        let scale_factor = parameters.get_or("scale_factor", 1.0);

        if (phi1 + phi2).abs() < TOL {
            return Err(GeokitError::OutOfRange {
                name: "standard_parallel_2",
                value: phi2.to_degrees(),
                msg: format!(
                    "standard parallels {} and {} are antipodal",
                    phi1.to_degrees(),
                    phi2.to_degrees()
                ),
            });
        }

        let mut albers = AlbersProjection {
            is_inverse,
            is_spherical: ellipsoid.is_sphere(),
            e: ellipsoid.eccentricity(),
            es: ellipsoid.eccentricity_squared(),
            central_meridian,
            false_easting: parameters.get_or("false_easting", 0.0),
            false_northing: parameters.get_or("false_northing", 0.0),
            global_scale: scale_factor * ellipsoid.semi_major,
            n: 0.0,
            c: 0.0,
            rho0: 0.0,
            ec: f64::NAN,
            inverse: OnceCell::new(),
            parameters,
        };

        let (sin_phi1, cos_phi1) = phi1.sin_cos();
        let secant = (phi1 - phi2).abs() >= TOL;
        if albers.is_spherical {
            let n = if secant {
                0.5 * (sin_phi1 + phi2.sin())
            } else {
                sin_phi1
            };
            albers.n = n;
            albers.c = cos_phi1 * cos_phi1 + 2.0 * n * sin_phi1;
            albers.rho0 = (albers.c - 2.0 * n * latitude_of_origin.sin()).sqrt() / n;
        } else {
            let m1 = albers.msfn(sin_phi1, cos_phi1);
            let q1 = albers.qsfn(sin_phi1);
            let n = if secant {
                let (sin_phi2, cos_phi2) = phi2.sin_cos();
                let m2 = albers.msfn(sin_phi2, cos_phi2);
                let q2 = albers.qsfn(sin_phi2);
                (m1 * m1 - m2 * m2) / (q2 - q1)
            } else {
                sin_phi1
            };
            let e = albers.e;
            albers.n = n;
            albers.c = m1 * m1 + n * q1;
            albers.rho0 = (albers.c - n * albers.qsfn(latitude_of_origin.sin())).sqrt() / n;
            albers.ec = 1.0 - 0.5 * (1.0 - albers.es) * ((1.0 - e) / (1.0 + e)).ln() / e;
        }
        Ok(albers)
    }

    fn msfn(&self, sin_phi: f64, cos_phi: f64) -> f64 {
        cos_phi / (1.0 - sin_phi * sin_phi * self.es).sqrt()
    }

    fn qsfn(&self, sin_phi: f64) -> f64 {
        if self.e < EPS {
            return 2.0 * sin_phi;
        }
        let con = self.e * sin_phi;
        (1.0 - self.es)
            * (sin_phi / (1.0 - con * con) - (0.5 / self.e) * ((1.0 - con) / (1.0 + con)).ln())
    }

    /// Latitude from authalic `q`, by fixed-point iteration.
    fn phi1(&self, qs: f64) -> Result<f64> {
        let mut phi = (0.5 * qs).asin();
        if self.e < EPS {
            return Ok(phi);
        }
        for _ in 0..MAX_ITER {
            let (sin_phi, cos_phi) = phi.sin_cos();
            let con = self.e * sin_phi;
            let com = 1.0 - con * con;
            let dphi = 0.5 * com * com / cos_phi
                * (qs / (1.0 - self.es) - sin_phi / com
                    + 0.5 / self.e * ((1.0 - con) / (1.0 + con)).ln());
            phi += dphi;
            if dphi.abs() <= TOL {
                return Ok(phi);
            }
        }
        Err(GeokitError::NoConvergence {
            method_name: "meters_to_degrees",
            iterations: MAX_ITER,
        })
    }
}

impl MapProjection for AlbersProjection {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parameters(&self) -> &ProjectionParameters {
        &self.parameters
    }

    fn degrees_to_meters(&self, coord: Coord) -> Result<Coord> {
        let theta = (coord.x.to_radians() - self.central_meridian) * self.n;
        let lat = coord.y.to_radians();
        let rho = if self.is_spherical {
            self.c - 2.0 * self.n * lat.sin()
        } else {
            self.c - self.n * self.qsfn(lat.sin())
        };
        if rho < 0.0 {
            return Err(GeokitError::InvalidOperation {
                method_name: "degrees_to_meters",
                msg: format!("negative radius for ({}, {})", coord.x, coord.y),
            });
        }
        let rho = rho.sqrt() / self.n;
        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        Ok(Coord {
            x: self.global_scale * x + self.false_easting,
            y: self.global_scale * y + self.false_northing,
        })
    }

    fn meters_to_degrees(&self, coord: Coord) -> Result<Coord> {
        let mut x = (coord.x - self.false_easting) / self.global_scale;
        let mut y = self.rho0 - (coord.y - self.false_northing) / self.global_scale;
        let mut rho = x.hypot(y);

        let (lon, lat) = if rho != 0.0 {
            if self.n < 0.0 {
                rho = -rho;
                x = -x;
                y = -y;
            }
            let lon = x.atan2(y) / self.n;
            let q = rho * self.n;
            let lat = if self.is_spherical {
                let sin_lat = (self.c - q * q) / (2.0 * self.n);
                if sin_lat.abs() <= 1.0 {
                    sin_lat.asin()
                } else {
                    FRAC_PI_2.copysign(sin_lat)
                }
            } else {
                let qs = (self.c - q * q) / self.n;
                if (self.ec - qs.abs()).abs() > EPS {
                    self.phi1(qs)?
                } else {
                    FRAC_PI_2.copysign(qs)
                }
            };
            (lon, lat)
        } else if self.n > 0.0 {
            (0.0, FRAC_PI_2)
        } else {
            (0.0, -FRAC_PI_2)
        };

        Ok(Coord {
            x: (lon + self.central_meridian).to_degrees(),
            y: lat.to_degrees(),
        })
    }

    fn is_inverse(&self) -> bool {
        self.is_inverse
    }

    fn inverse(&self) -> Result<&dyn MapProjection> {
        let inverse = self.inverse.get_or_try_init(|| {
            tracing::debug!(projection = Self::NAME, "building inverse projection");
            Self::with_role(self.parameters.clone(), !self.is_inverse).map(Box::new)
        })?;
        Ok(&**inverse)
    }
}
