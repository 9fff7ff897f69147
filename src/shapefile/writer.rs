use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use crate::backpatch::BackpatchedFile;
use crate::byte_order::WriteBytesExt;
use crate::errors::{GeokitError, Result};
use crate::shapefile::handlers::{handler_for, ShapeHandler};
use crate::shapefile::{shape_type_of, ShapeType, ShapefileHeader};
use crate::vector::{Envelope, Geometry};

/// A shape record encoded in memory, waiting to be appended.
pub(crate) struct EncodedShape {
    shape_type: ShapeType,
    content: Vec<u8>,
    content_length: i32,
    envelope: Envelope,
}

/// Streaming `.shp` + `.shx` writer.
///
/// The first geometry fixes the shape type of the file. Both headers are
/// written provisionally on creation and rewritten with the final length and
/// bounding box when the writer is closed or dropped.
pub struct ShapefileWriter {
    shp: BackpatchedFile<ShapefileHeader>,
    shx: BackpatchedFile<ShapefileHeader>,
    handler: Option<Box<dyn ShapeHandler>>,
    num_records: i32,
}

impl ShapefileWriter {
    /// Create (or truncate) the `.shp` and `.shx` files next to `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let header = ShapefileHeader::new(ShapeType::Null);
        let mut shp = BackpatchedFile::create(path.with_extension("shp"), header.clone())?;
        let mut shx = BackpatchedFile::create(path.with_extension("shx"), header)?;
        shp.write_provisional_header()?;
        shx.write_provisional_header()?;
        Ok(ShapefileWriter {
            shp,
            shx,
            handler: None,
            num_records: 0,
        })
    }

    /// Open an existing `.shp`/`.shx` pair to add records after the current ones.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (shp_path, shx_path) = (path.with_extension("shp"), path.with_extension("shx"));
        let shp_header = ShapefileHeader::read(&mut BufReader::new(File::open(&shp_path)?))?;
        let shx_header = ShapefileHeader::read(&mut BufReader::new(File::open(&shx_path)?))?;
        if shp_header.shape_type != shx_header.shape_type {
            return Err(GeokitError::ShapeTypeMismatch {
                expected: shp_header.shape_type,
                found: shx_header.shape_type,
            });
        }
        let handler = match shp_header.shape_type {
            ShapeType::Null => None,
            shape_type => Some(handler_for(shape_type)?),
        };
        let num_records = shx_header.index_record_count();
        tracing::debug!(
            path = %shp_path.display(),
            records = num_records,
            shape_type = %shp_header.shape_type,
            "appending to shapefile"
        );
        Ok(ShapefileWriter {
            shp: BackpatchedFile::append(shp_path, shp_header)?,
            shx: BackpatchedFile::append(shx_path, shx_header)?,
            handler,
            num_records,
        })
    }

    pub fn header(&self) -> &ShapefileHeader {
        self.shp.header()
    }

    pub fn num_records(&self) -> i32 {
        self.num_records
    }

    pub fn write(&mut self, geometry: &Geometry) -> Result<()> {
        let shape = self.encode(geometry)?;
        self.write_encoded(shape)
    }

    /// Encode `geometry` without touching the files or the shape type lock.
    pub(crate) fn encode(&self, geometry: &Geometry) -> Result<EncodedShape> {
        let shape_type = shape_type_of(geometry)?;
        let unlocked;
        let handler: &dyn ShapeHandler = match &self.handler {
            Some(handler) => &**handler,
            None => {
                unlocked = handler_for(shape_type)?;
                &*unlocked
            }
        };
        if handler.shape_type() != shape_type {
            return Err(GeokitError::ShapeTypeMismatch {
                expected: handler.shape_type(),
                found: shape_type,
            });
        }
        let content_length = handler.content_length(geometry)?;
        let mut content = Vec::with_capacity(content_length as usize * 2);
        handler.write(geometry, &mut content)?;
        Ok(EncodedShape {
            shape_type,
            content,
            content_length,
            envelope: geometry.envelope(),
        })
    }

    /// The first record written fixes the shape type of the file.
    fn lock_shape_type(&mut self, shape_type: ShapeType) -> Result<()> {
        if self.handler.is_none() {
            self.handler = Some(handler_for(shape_type)?);
            self.shp.header_mut().shape_type = shape_type;
            self.shx.header_mut().shape_type = shape_type;
        }
        Ok(())
    }

    pub(crate) fn write_encoded(&mut self, shape: EncodedShape) -> Result<()> {
        let EncodedShape {
            shape_type,
            content,
            content_length,
            envelope,
        } = shape;
        self.lock_shape_type(shape_type)?;
        let offset = self.shp.header().file_length;
        let record_number = self.num_records + 1;
        self.shp.write_i32_be(record_number)?;
        self.shp.write_i32_be(content_length)?;
        self.shp.write_all(&content)?;
        self.shx.write_i32_be(offset)?;
        self.shx.write_i32_be(content_length)?;
        self.num_records = record_number;

        for header in [self.shp.header_mut(), self.shx.header_mut()] {
            header.bounds.expand_to_include(&envelope);
        }
        self.shp.header_mut().file_length += 4 + content_length;
        self.shx.header_mut().file_length += 4;
        Ok(())
    }

    /// Backpatch both headers and release the files.
    pub fn close(self) -> Result<()> {
        let ShapefileWriter { shp, shx, .. } = self;
        let shp_result = shp.close();
        shx.close()?;
        shp_result
    }
}
