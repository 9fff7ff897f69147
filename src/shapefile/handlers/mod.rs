//! Per-shape-type record codecs.
//!
//! A record's content starts with its shape type code. Null-shape content
//! (code 0, two words) reads back as the handler's empty geometry, and empty
//! geometries are written that way.

use std::io::{Read, Write};

use crate::byte_order::{ReadBytesExt, WriteBytesExt};
use crate::errors::{GeokitError, Result};
use crate::shapefile::{shape_type_of, ShapeType};
use crate::vector::{Coord, Envelope, Geometry, GeometryFactory};

mod multi_point;
mod point;
mod polygon;
mod polyline;

pub use multi_point::MultiPointHandler;
pub use point::PointHandler;
pub use polygon::PolygonHandler;
pub use polyline::PolyLineHandler;

/// Content length in words of a null shape.
const NULL_SHAPE_WORDS: i32 = 2;
/// Upper bound for allocations sized from counts found in a file.
const MAX_PREALLOCATION: usize = 1 << 16;

pub trait ShapeHandler {
    fn shape_type(&self) -> ShapeType;

    /// Decode record content, starting at its shape type code.
    fn read(&self, r: &mut dyn Read, factory: &GeometryFactory) -> Result<Geometry>;

    /// Encode `geometry` as record content, shape type code included.
    fn write(&self, geometry: &Geometry, w: &mut dyn Write) -> Result<()>;

    /// Content length of `geometry` in 16-bit words.
    fn content_length(&self, geometry: &Geometry) -> Result<i32>;
}

/// The codec for files of `shape_type`.
pub fn handler_for(shape_type: ShapeType) -> Result<Box<dyn ShapeHandler>> {
    match shape_type {
        ShapeType::Point => Ok(Box::new(PointHandler)),
        ShapeType::PolyLine => Ok(Box::new(PolyLineHandler)),
        ShapeType::Polygon => Ok(Box::new(PolygonHandler)),
        ShapeType::MultiPoint => Ok(Box::new(MultiPointHandler)),
        other => Err(GeokitError::UnsupportedShapeType(other)),
    }
}

/// Read the content's shape type. `Ok(false)` means a null shape.
fn read_shape_type(r: &mut dyn Read, expected: ShapeType) -> Result<bool> {
    let found = ShapeType::from_code(r.read_i32_le()?)?;
    if found == ShapeType::Null {
        return Ok(false);
    }
    if found != expected {
        return Err(GeokitError::ShapeTypeMismatch { expected, found });
    }
    Ok(true)
}

fn write_null_shape(w: &mut dyn Write) -> Result<()> {
    w.write_i32_le(ShapeType::Null.code())?;
    Ok(())
}

fn mismatch(expected: ShapeType, geometry: &Geometry) -> GeokitError {
    match shape_type_of(geometry) {
        Ok(found) => GeokitError::ShapeTypeMismatch { expected, found },
        Err(e) => e,
    }
}

fn read_count(r: &mut dyn Read, what: &str) -> Result<usize> {
    let count = r.read_i32_le()?;
    usize::try_from(count)
        .map_err(|_| GeokitError::format("shapefile", format!("negative {what} count {count}")))
}

fn read_coords(r: &mut dyn Read, n: usize, factory: &GeometryFactory) -> Result<Vec<Coord>> {
    let mut coords = Vec::with_capacity(n.min(MAX_PREALLOCATION));
    for _ in 0..n {
        let x = r.read_f64_le()?;
        let y = r.read_f64_le()?;
        coords.push(factory.precision_model().precise(Coord { x, y }));
    }
    Ok(coords)
}

fn skip_bounding_box(r: &mut dyn Read) -> Result<()> {
    let mut bbox = [0u8; 32];
    r.read_exact(&mut bbox)?;
    Ok(())
}

fn write_bounding_box(w: &mut dyn Write, bounds: &Envelope) -> Result<()> {
    for v in bounds.to_bounds() {
        w.write_f64_le(v)?;
    }
    Ok(())
}

fn write_coords<'a>(w: &mut dyn Write, coords: impl IntoIterator<Item = &'a Coord>) -> Result<()> {
    for c in coords {
        w.write_f64_le(c.x)?;
        w.write_f64_le(c.y)?;
    }
    Ok(())
}

/// Read the part/point layout shared by PolyLine and Polygon content and
/// split the points into parts.
fn read_parts(r: &mut dyn Read, factory: &GeometryFactory) -> Result<Vec<Vec<Coord>>> {
    skip_bounding_box(r)?;
    let num_parts = read_count(r, "part")?;
    let num_points = read_count(r, "point")?;
    let mut offsets = Vec::with_capacity(num_parts.min(MAX_PREALLOCATION));
    for _ in 0..num_parts {
        offsets.push(read_count(r, "part offset")?);
    }
    let mut parts = Vec::with_capacity(offsets.len());
    for (i, &start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(num_points);
        if start > end || end > num_points {
            return Err(GeokitError::format(
                "shapefile",
                format!("part {i} spans points {start}..{end} of {num_points}"),
            ));
        }
        parts.push(read_coords(r, end - start, factory)?);
    }
    Ok(parts)
}

/// Write the part/point layout shared by PolyLine and Polygon content.
fn write_parts(
    w: &mut dyn Write,
    shape_type: ShapeType,
    bounds: &Envelope,
    parts: &[&[Coord]],
) -> Result<()> {
    let num_points: usize = parts.iter().map(|p| p.len()).sum();
    w.write_i32_le(shape_type.code())?;
    write_bounding_box(w, bounds)?;
    w.write_i32_le(parts.len() as i32)?;
    w.write_i32_le(num_points as i32)?;
    let mut offset = 0;
    for part in parts {
        w.write_i32_le(offset as i32)?;
        offset += part.len();
    }
    for part in parts {
        write_coords(w, part.iter())?;
    }
    Ok(())
}

fn parts_content_length(num_parts: usize, num_points: usize) -> i32 {
    (22 + 2 * num_parts + 8 * num_points) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    pub(super) fn encode(handler: &dyn ShapeHandler, geometry: &Geometry) -> Vec<u8> {
        let mut buf = Vec::new();
        handler.write(geometry, &mut buf).unwrap();
        assert_eq!(
            buf.len() as i32,
            handler.content_length(geometry).unwrap() * 2,
            "content length of {geometry}"
        );
        buf
    }

    pub(super) fn decode(handler: &dyn ShapeHandler, buf: &[u8]) -> Result<Geometry> {
        handler.read(&mut Cursor::new(buf), &GeometryFactory::default())
    }

    #[test]
    fn test_handler_for() {
        for shape_type in [
            ShapeType::Point,
            ShapeType::PolyLine,
            ShapeType::Polygon,
            ShapeType::MultiPoint,
        ] {
            assert_eq!(handler_for(shape_type).unwrap().shape_type(), shape_type);
        }
        for shape_type in [ShapeType::PointZ, ShapeType::PolygonM, ShapeType::Null] {
            let err = handler_for(shape_type).err().unwrap();
            assert_eq!(err.kind(), crate::errors::ErrorKind::Unsupported);
        }
    }

    #[test]
    fn test_mismatched_content() {
        let point = Geometry::from_wkt("POINT (1 2)").unwrap();
        let buf = encode(&PointHandler, &point);
        let err = decode(&PolygonHandler, &buf).unwrap_err();
        assert!(matches!(
            err,
            GeokitError::ShapeTypeMismatch {
                expected: ShapeType::Polygon,
                found: ShapeType::Point
            }
        ));
        assert_eq!(err.kind(), crate::errors::ErrorKind::Format);
    }

    #[test]
    fn test_bad_part_offsets() {
        let line = Geometry::from_wkt("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))").unwrap();
        let mut buf = encode(&PolyLineHandler, &line);
        // second part offset past the point count
        buf[48..52].copy_from_slice(&9i32.to_le_bytes());
        let err = decode(&PolyLineHandler, &buf).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Format);
    }
}
