//! Well-Known Binary geometry codec.
//!
//! Each geometry, including every member of a multi-geometry or collection,
//! starts with its own byte-order flag and type code, so one buffer may mix
//! big- and little-endian parts.

mod reader;
mod writer;

pub use reader::WkbReader;
pub use writer::WkbWriter;

use crate::errors::{GeokitError, Result};

/// OGC simple features type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum WkbGeometryType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl WkbGeometryType {
    pub fn from_code(code: u32) -> Result<Self> {
        Ok(match code {
            1 => WkbGeometryType::Point,
            2 => WkbGeometryType::LineString,
            3 => WkbGeometryType::Polygon,
            4 => WkbGeometryType::MultiPoint,
            5 => WkbGeometryType::MultiLineString,
            6 => WkbGeometryType::MultiPolygon,
            7 => WkbGeometryType::GeometryCollection,
            other => {
                return Err(GeokitError::format(
                    "WKB",
                    format!("unknown geometry type code {other}"),
                ))
            }
        })
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;
    use crate::errors::ErrorKind;
    use crate::vector::wkt::WktReader;
    use crate::vector::{Geometry, Point};

    fn wkt(text: &str) -> Geometry {
        WktReader::default().read(text).unwrap()
    }

    #[test]
    fn test_point_layout() {
        let bytes = WkbWriter::new(ByteOrder::LittleEndian)
            .write(&wkt("POINT (1 2)"))
            .unwrap();
        assert_eq!(
            bytes,
            vec![
                1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xf0, 0x3f, 0, 0, 0, 0, 0, 0, 0, 0x40
            ]
        );
        let bytes = WkbWriter::new(ByteOrder::BigEndian)
            .write(&wkt("POINT (1 2)"))
            .unwrap();
        assert_eq!(&bytes[..5], &[0, 0, 0, 0, 1]);
        assert_eq!(&bytes[5..7], &[0x3f, 0xf0]);
    }

    #[test]
    fn test_bit_exact_round_trips() {
        let samples = [
            "POINT (3 4)",
            "LINESTRING (50 31, 54 31, 54 29)",
            "LINESTRING EMPTY",
            "POLYGON ((1 1, 10 1, 10 10, 1 10, 1 1), (4 4, 5 4, 5 5, 4 5, 4 4))",
            "POLYGON EMPTY",
            "MULTIPOINT (23 24, 34 35)",
            "MULTILINESTRING ((10 10, 20 20), (15 15, 30 15))",
            "MULTIPOLYGON (((10 10, 10 20, 20 20, 10 10)), ((60 60, 70 70, 80 60, 60 60)))",
            "GEOMETRYCOLLECTION (POINT (10 10), LINESTRING (15 15, 20 20), GEOMETRYCOLLECTION EMPTY)",
        ];
        for order in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let writer = WkbWriter::new(order);
            for text in samples {
                let geometry = wkt(text);
                let bytes = writer.write(&geometry).unwrap();
                let decoded = WkbReader::default().read(&bytes).unwrap();
                assert_eq!(decoded, geometry, "{text} in {order:?}");
                assert_eq!(writer.write(&decoded).unwrap(), bytes, "{text} in {order:?}");
            }
        }
    }

    #[test]
    fn test_children_declare_their_own_byte_order() {
        // little-endian multipoint holding one big-endian and one little-endian point
        let mut bytes = vec![1, 4, 0, 0, 0, 2, 0, 0, 0];
        bytes.extend(WkbWriter::new(ByteOrder::BigEndian).write(&wkt("POINT (1 2)")).unwrap());
        bytes.extend(WkbWriter::new(ByteOrder::LittleEndian).write(&wkt("POINT (3 4)")).unwrap());
        let geometry = WkbReader::default().read(&bytes).unwrap();
        assert_eq!(geometry, wkt("MULTIPOINT (1 2, 3 4)"));
    }

    #[test]
    fn test_empty_point_is_nan() {
        let bytes = WkbWriter::default()
            .write(&Geometry::Point(Point::empty()))
            .unwrap();
        assert_eq!(bytes.len(), 21);
        assert!(f64::from_le_bytes(bytes[5..13].try_into().unwrap()).is_nan());
        let decoded = WkbReader::default().read(&bytes).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_errors() {
        let reader = WkbReader::default();
        let err = reader.read(&[2, 1, 0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        let err = reader.read(&[1, 8, 0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        let err = reader.read(&[1, 1, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        // a multipoint whose member is a linestring
        let mut bytes = vec![1, 4, 0, 0, 0, 1, 0, 0, 0];
        bytes.extend(WkbWriter::default().write(&wkt("LINESTRING (1 2, 3 4)")).unwrap());
        assert_eq!(reader.read(&bytes).unwrap_err().kind(), ErrorKind::Format);

        let ring = wkt("LINEARRING (0 0, 1 0, 1 1, 0 0)");
        let err = WkbWriter::default().write(&ring).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
