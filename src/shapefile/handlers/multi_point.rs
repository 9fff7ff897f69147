use std::io::{Read, Write};

use super::{
    mismatch, read_coords, read_count, read_shape_type, skip_bounding_box, write_bounding_box,
    write_coords, write_null_shape, ShapeHandler, NULL_SHAPE_WORDS,
};
use crate::byte_order::WriteBytesExt;
use crate::errors::Result;
use crate::shapefile::ShapeType;
use crate::vector::{Coord, Geometry, GeometryFactory};

/// MultiPoint records: bounding box, point count, points.
#[derive(Clone, Copy, Debug, Default)]
pub struct MultiPointHandler;

fn non_empty_coords(geometry: &Geometry) -> Result<Vec<Coord>> {
    match geometry {
        Geometry::MultiPoint(mp) => Ok(mp.points().iter().filter_map(|p| p.coord()).collect()),
        _ => Err(mismatch(ShapeType::MultiPoint, geometry)),
    }
}

impl ShapeHandler for MultiPointHandler {
    fn shape_type(&self) -> ShapeType {
        ShapeType::MultiPoint
    }

    fn read(&self, r: &mut dyn Read, factory: &GeometryFactory) -> Result<Geometry> {
        if !read_shape_type(r, ShapeType::MultiPoint)? {
            return Ok(factory.create_multi_point(Vec::new()).into());
        }
        skip_bounding_box(r)?;
        let num_points = read_count(r, "point")?;
        let coords = read_coords(r, num_points, factory)?;
        Ok(factory.create_multi_point_from_coords(coords).into())
    }

    fn write(&self, geometry: &Geometry, w: &mut dyn Write) -> Result<()> {
        let coords = non_empty_coords(geometry)?;
        if coords.is_empty() {
            return write_null_shape(w);
        }
        w.write_i32_le(ShapeType::MultiPoint.code())?;
        write_bounding_box(w, &geometry.envelope())?;
        w.write_i32_le(coords.len() as i32)?;
        write_coords(w, coords.iter())
    }

    fn content_length(&self, geometry: &Geometry) -> Result<i32> {
        let n = non_empty_coords(geometry)?.len();
        if n == 0 {
            return Ok(NULL_SHAPE_WORDS);
        }
        Ok(20 + 8 * n as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapefile::handlers::tests::{decode, encode};

    #[test]
    fn test_multi_point_content() {
        let geometry = Geometry::from_wkt("MULTIPOINT (0 0, 10 5, -3 7)").unwrap();
        let buf = encode(&MultiPointHandler, &geometry);
        assert_eq!(buf.len(), 2 * (20 + 8 * 3));
        assert_eq!(&buf[4..12], &(-3.0f64).to_le_bytes());
        assert_eq!(&buf[36..40], &3i32.to_le_bytes());
        assert_eq!(decode(&MultiPointHandler, &buf).unwrap(), geometry);
    }

    #[test]
    fn test_empty_multi_point() {
        let geometry = Geometry::from_wkt("MULTIPOINT EMPTY").unwrap();
        let buf = encode(&MultiPointHandler, &geometry);
        assert_eq!(decode(&MultiPointHandler, &buf).unwrap(), geometry);
    }
}
