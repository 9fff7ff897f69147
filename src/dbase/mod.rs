//! dBASE III attribute tables (`.dbf`)
//!
//! ```no_run
//! use geokit::dbase::{DbaseFieldType, DbaseFileReader, DbaseFileWriter};
//!
//! # fn main() -> geokit::errors::Result<()> {
//! let mut writer = DbaseFileWriter::create("cities.dbf")?;
//! writer.add_column("NAME", DbaseFieldType::Character, 32, 0)?;
//! writer.add_column("POP", DbaseFieldType::Numeric, 10, 0)?;
//! writer.write(&["Lyon".into(), 513_275.into()])?;
//! writer.close()?;
//!
//! for record in DbaseFileReader::open("cities.dbf")? {
//!     println!("{:?}", record?);
//! }
//! # Ok(())
//! # }
//! ```

mod field;
mod header;
mod reader;
mod writer;

pub use field::{DbaseFieldDescriptor, DbaseFieldType, FieldValue};
pub use header::DbaseFileHeader;
pub use reader::{DbaseFileReader, DbaseRecord};
pub use writer::DbaseFileWriter;
