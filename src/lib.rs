//! Vector geometry codecs, ESRI Shapefile and dBASE engines, and map
//! projections for Rust.
//!
//! * [`vector`]: the geometry model with its WKT and WKB readers and writers.
//! * [`dbase`]: dBASE III attribute tables.
//! * [`shapefile`]: `.shp`/`.shx`/`.dbf` triads, read sequentially or through a spatial index.
//! * [`spatial_ref`]: Albers Equal-Area Conic projection and great-circle distances.
//!
//! ## Use
//!
//! ```no_run
//! use geokit::shapefile::ShapefileDataReader;
//!
//! # fn main() -> geokit::errors::Result<()> {
//! let reader = ShapefileDataReader::open("fixtures/roads.shp")?;
//! println!("{:?}", reader.column_names());
//! for feature in reader {
//!     let feature = feature?;
//!     println!("{} {:?}", feature.geometry.wkt(), feature.values);
//! }
//! # Ok(())
//! # }
//! ```

#![crate_name = "geokit"]
#![crate_type = "lib"]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod backpatch;
pub mod byte_order;
pub mod config;
pub mod dbase;
pub mod errors;
pub mod shapefile;
pub mod spatial_ref;
pub mod vector;

#[cfg(test)]
pub(crate) mod test_utils;
