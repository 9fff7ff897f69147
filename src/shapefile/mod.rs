//! ESRI Shapefile engine (`.shp`, `.shx` and `.dbf`)
//!
//! ## Writing and querying
//!
//! ```no_run
//! use geokit::dbase::DbaseFieldType;
//! use geokit::shapefile::{QueryableShapefileReader, ShapefileDataWriter};
//! use geokit::vector::{Envelope, Geometry};
//!
//! # fn main() -> geokit::errors::Result<()> {
//! let mut writer = ShapefileDataWriter::create("stations.shp")?;
//! writer.add_column("NAME", DbaseFieldType::Character, 24, 0)?;
//! writer.write(&Geometry::from_wkt("POINT (2.35 48.85)")?, &["Châtelet".into()])?;
//! writer.close()?;
//!
//! let mut reader = QueryableShapefileReader::open("stations.shp")?;
//! for feature in reader.query(&Envelope::new(2.0, 3.0, 48.0, 49.0))? {
//!     println!("{} {:?}", feature.geometry, feature.values);
//! }
//! # Ok(())
//! # }
//! ```

mod data;
pub mod handlers;
mod header;
mod index;
mod queryable;
mod reader;
mod shape_type;
mod writer;

pub use data::{Feature, ShapefileDataReader, ShapefileDataWriter, GEOMETRY_COLUMN};
pub use header::ShapefileHeader;
pub use index::{IndexEntry, ShapefileIndexReader};
pub use queryable::{QueryableShapefileReader, ShapefileRecordPointer};
pub use reader::{ShapeRecord, ShapefileReader};
pub use shape_type::{shape_type_of, ShapeType};
pub use writer::ShapefileWriter;
