//! Vector geometry model and its text/binary codecs
//!
//! ## Reading and writing
//!
//! ```
//! use geokit::vector::Geometry;
//!
//! let geometry = Geometry::from_wkt("LINESTRING (50 31, 54 31, 54 29)").unwrap();
//! let wkb = geometry.wkb().unwrap();
//! assert_eq!(Geometry::from_wkb(&wkb).unwrap(), geometry);
//! println!("{}", geometry.wkt());
//! ```

pub use crate::vector::envelope::Envelope;
pub use crate::vector::factory::GeometryFactory;
pub use crate::vector::geometry::{
    Geometry, GeometryCollection, GeometryType, LineString, LinearRing, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};
pub use crate::vector::precision::PrecisionModel;

use crate::errors::Result;

/// Planar coordinate shared with `geo-types`.
pub type Coord = geo_types::Coord<f64>;

/// Convert object to a geokit geometry.
pub trait ToGeokit {
    fn to_geokit(&self) -> Result<Geometry>;
}

pub mod algorithm;
mod envelope;
mod factory;
mod geometry;
mod ops;
mod precision;
pub mod wkb;
pub mod wkt;
