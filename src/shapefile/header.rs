use std::io::{Read, Write};

use crate::backpatch::FileHeader;
use crate::byte_order::{ReadBytesExt, WriteBytesExt};
use crate::errors::{GeokitError, Result};
use crate::shapefile::ShapeType;
use crate::vector::Envelope;

pub(crate) const FILE_CODE: i32 = 9994;
pub(crate) const VERSION: i32 = 1000;
/// Header size in 16-bit words.
pub(crate) const HEADER_WORDS: i32 = 50;

/// The 100-byte header shared by `.shp` and `.shx` files.
///
/// `file_length` counts 16-bit words, header included.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapefileHeader {
    pub file_length: i32,
    pub version: i32,
    pub shape_type: ShapeType,
    pub bounds: Envelope,
}

impl ShapefileHeader {
    /// Header of a file holding no records yet.
    pub fn new(shape_type: ShapeType) -> Self {
        ShapefileHeader {
            file_length: HEADER_WORDS,
            version: VERSION,
            shape_type,
            bounds: Envelope::null(),
        }
    }

    pub fn read<R: Read + ?Sized>(r: &mut R) -> Result<Self> {
        let file_code = r.read_i32_be()?;
        if file_code != FILE_CODE {
            return Err(GeokitError::format(
                "shapefile",
                format!("file code {file_code} is not {FILE_CODE}"),
            ));
        }
        let mut unused = [0u8; 20];
        r.read_exact(&mut unused)?;
        let file_length = r.read_i32_be()?;
        let version = r.read_i32_le()?;
        if version != VERSION {
            tracing::warn!(version, "shapefile version is not {VERSION}");
        }
        let shape_type = ShapeType::from_code(r.read_i32_le()?)?;
        let min_x = r.read_f64_le()?;
        let min_y = r.read_f64_le()?;
        let max_x = r.read_f64_le()?;
        let max_y = r.read_f64_le()?;
        // z and m ranges
        let mut unused = [0u8; 32];
        r.read_exact(&mut unused)?;

        let bounds = if file_length <= HEADER_WORDS && min_x == 0.0 && max_x == 0.0 {
            Envelope::null()
        } else {
            Envelope::new(min_x, max_x, min_y, max_y)
        };
        Ok(ShapefileHeader {
            file_length,
            version,
            shape_type,
            bounds,
        })
    }

    /// Number of records described by an `.shx` header.
    pub fn index_record_count(&self) -> i32 {
        (self.file_length - HEADER_WORDS) / 4
    }
}

impl FileHeader for ShapefileHeader {
    fn write_header<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_i32_be(FILE_CODE)?;
        w.write_all(&[0u8; 20])?;
        w.write_i32_be(self.file_length)?;
        w.write_i32_le(self.version)?;
        w.write_i32_le(self.shape_type.code())?;
        for v in self.bounds.to_bounds() {
            w.write_f64_le(v)?;
        }
        w.write_all(&[0u8; 32])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_layout() {
        let header = ShapefileHeader {
            file_length: 164,
            version: VERSION,
            shape_type: ShapeType::Polygon,
            bounds: Envelope::new(-10.0, 10.0, -5.0, 5.0),
        };
        let mut buf = Vec::new();
        header.write_header(&mut buf).unwrap();
        assert_eq!(buf.len(), 100);
        assert_eq!(&buf[..4], &9994i32.to_be_bytes());
        assert_eq!(&buf[24..28], &164i32.to_be_bytes());
        assert_eq!(&buf[28..32], &1000i32.to_le_bytes());
        assert_eq!(&buf[32..36], &5i32.to_le_bytes());
        assert_eq!(&buf[36..44], &(-10.0f64).to_le_bytes());
        assert_eq!(&buf[44..52], &(-5.0f64).to_le_bytes());

        let parsed = ShapefileHeader::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_bad_file_code() {
        let mut buf = Vec::new();
        ShapefileHeader::new(ShapeType::Point)
            .write_header(&mut buf)
            .unwrap();
        buf[3] = 0;
        let err = ShapefileHeader::read(&mut Cursor::new(&buf)).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Format);
    }

    #[test]
    fn test_version_mismatch_is_tolerated() {
        let mut buf = Vec::new();
        ShapefileHeader::new(ShapeType::Point)
            .write_header(&mut buf)
            .unwrap();
        buf[28..32].copy_from_slice(&999i32.to_le_bytes());
        let parsed = ShapefileHeader::read(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.version, 999);
        assert_eq!(parsed.index_record_count(), 0);
        assert!(parsed.bounds.is_null());
    }
}
