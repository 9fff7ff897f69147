use std::io::{Read, Write};

use super::{
    mismatch, read_coords, read_shape_type, write_coords, write_null_shape, ShapeHandler,
    NULL_SHAPE_WORDS,
};
use crate::byte_order::WriteBytesExt;
use crate::errors::Result;
use crate::shapefile::ShapeType;
use crate::vector::{Geometry, GeometryFactory};

/// Point records: two doubles.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointHandler;

impl ShapeHandler for PointHandler {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Point
    }

    fn read(&self, r: &mut dyn Read, factory: &GeometryFactory) -> Result<Geometry> {
        if !read_shape_type(r, ShapeType::Point)? {
            return Ok(factory.create_empty_point().into());
        }
        let coords = read_coords(r, 1, factory)?;
        Ok(factory.create_point(coords[0]).into())
    }

    fn write(&self, geometry: &Geometry, w: &mut dyn Write) -> Result<()> {
        let Geometry::Point(point) = geometry else {
            return Err(mismatch(ShapeType::Point, geometry));
        };
        match point.coord() {
            Some(coord) => {
                w.write_i32_le(ShapeType::Point.code())?;
                write_coords(w, [coord].iter())
            }
            None => write_null_shape(w),
        }
    }

    fn content_length(&self, geometry: &Geometry) -> Result<i32> {
        match geometry {
            Geometry::Point(p) if p.is_empty() => Ok(NULL_SHAPE_WORDS),
            Geometry::Point(_) => Ok(10),
            _ => Err(mismatch(ShapeType::Point, geometry)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapefile::handlers::tests::{decode, encode};
    use crate::vector::Point;

    #[test]
    fn test_point_content() {
        let point = Geometry::from_wkt("POINT (-1.5 2.25)").unwrap();
        let buf = encode(&PointHandler, &point);
        assert_eq!(&buf[..4], &1i32.to_le_bytes());
        assert_eq!(&buf[4..12], &(-1.5f64).to_le_bytes());
        assert_eq!(decode(&PointHandler, &buf).unwrap(), point);
    }

    #[test]
    fn test_empty_point_is_null_shape() {
        let empty = Geometry::Point(Point::empty());
        let buf = encode(&PointHandler, &empty);
        assert_eq!(buf, 0i32.to_le_bytes());
        assert_eq!(decode(&PointHandler, &buf).unwrap(), empty);
    }

    #[test]
    fn test_wrong_geometry() {
        let line = Geometry::from_wkt("LINESTRING (0 0, 1 1)").unwrap();
        assert!(PointHandler.content_length(&line).is_err());
        assert!(PointHandler.write(&line, &mut Vec::new()).is_err());
    }
}
