use std::fs::File;
use std::io::{BufReader, Cursor, ErrorKind as IoErrorKind, Read};
use std::path::Path;

use crate::byte_order::ReadBytesExt;
use crate::errors::{GeokitError, Result};
use crate::shapefile::handlers::{handler_for, ShapeHandler};
use crate::shapefile::header::HEADER_WORDS;
use crate::shapefile::{ShapeType, ShapefileHeader};
use crate::vector::{Geometry, GeometryCollection, GeometryFactory};

/// A decoded `.shp` record.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRecord {
    pub record_number: i32,
    pub geometry: Geometry,
}

/// Forward-only reader over the geometries of a `.shp` file.
pub struct ShapefileReader<R: Read> {
    reader: R,
    header: ShapefileHeader,
    handler: Option<Box<dyn ShapeHandler>>,
    factory: GeometryFactory,
    /// Words consumed so far, header included.
    position: i64,
    content: Vec<u8>,
}

impl ShapefileReader<BufReader<File>> {
    /// Open the `.shp` file next to `path`, whatever its extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref().with_extension("shp"))?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read> ShapefileReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let header = ShapefileHeader::read(&mut reader)?;
        let handler = match header.shape_type {
            ShapeType::Null => None,
            shape_type => Some(handler_for(shape_type)?),
        };
        Ok(ShapefileReader {
            reader,
            header,
            handler,
            factory: GeometryFactory::default(),
            position: HEADER_WORDS as i64,
            content: Vec::new(),
        })
    }

    /// Create geometries with `factory` instead of the default floating one.
    pub fn with_factory(mut self, factory: GeometryFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn header(&self) -> &ShapefileHeader {
        &self.header
    }

    /// Read the next record, or `Ok(None)` at the end of the file.
    pub fn read_record(&mut self) -> Result<Option<ShapeRecord>> {
        if self.position >= self.header.file_length as i64 {
            return Ok(None);
        }
        let record_number = match self.reader.read_i32_be() {
            Ok(n) => n,
            Err(e) if e.kind() == IoErrorKind::UnexpectedEof => {
                tracing::warn!(
                    declared_words = self.header.file_length,
                    read_words = self.position,
                    "shapefile ends before its declared length"
                );
                self.position = self.header.file_length as i64;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let content_length = self.reader.read_i32_be()?;
        let byte_length = usize::try_from(content_length)
            .map_err(|_| {
                GeokitError::format(
                    "shapefile",
                    format!("record {record_number} has negative length {content_length}"),
                )
            })?
            * 2;
        let handler = self.handler.as_ref().ok_or_else(|| {
            GeokitError::format("shapefile", "records found in a file of Null shapes")
        })?;
        self.content.resize(byte_length, 0);
        self.reader.read_exact(&mut self.content)?;
        self.position += 4 + content_length as i64;
        let geometry = handler.read(&mut Cursor::new(&self.content), &self.factory)?;
        Ok(Some(ShapeRecord {
            record_number,
            geometry,
        }))
    }

    /// Read every remaining geometry into one collection.
    pub fn read_all(self) -> Result<GeometryCollection> {
        let geometries = self.collect::<Result<Vec<_>>>()?;
        Ok(GeometryCollection::new(geometries))
    }
}

impl<R: Read> Iterator for ShapefileReader<R> {
    type Item = Result<Geometry>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.read_record();
        if record.is_err() {
            self.position = self.header.file_length as i64;
        }
        record.map(|record| record.map(|r| r.geometry)).transpose()
    }
}
