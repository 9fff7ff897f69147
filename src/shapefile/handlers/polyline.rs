use std::io::{Read, Write};

use super::{
    mismatch, parts_content_length, read_parts, read_shape_type, write_null_shape, write_parts,
    ShapeHandler, NULL_SHAPE_WORDS,
};
use crate::errors::Result;
use crate::shapefile::ShapeType;
use crate::vector::{Coord, Geometry, GeometryFactory};

/// PolyLine records: one part per line string.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolyLineHandler;

fn line_parts(geometry: &Geometry) -> Result<Vec<&[Coord]>> {
    let parts: Vec<&[Coord]> = match geometry {
        Geometry::LineString(line) => vec![line.coords()],
        Geometry::LinearRing(ring) => vec![ring.coords()],
        Geometry::MultiLineString(multi) => multi.lines().iter().map(|l| l.coords()).collect(),
        _ => return Err(mismatch(ShapeType::PolyLine, geometry)),
    };
    Ok(parts.into_iter().filter(|p| !p.is_empty()).collect())
}

impl ShapeHandler for PolyLineHandler {
    fn shape_type(&self) -> ShapeType {
        ShapeType::PolyLine
    }

    /// A single part reads as a LineString, anything else as a MultiLineString.
    fn read(&self, r: &mut dyn Read, factory: &GeometryFactory) -> Result<Geometry> {
        if !read_shape_type(r, ShapeType::PolyLine)? {
            return Ok(factory.create_multi_line_string(Vec::new()).into());
        }
        let mut lines: Vec<_> = read_parts(r, factory)?
            .into_iter()
            .map(|coords| factory.create_line_string(coords))
            .collect();
        if lines.len() == 1 {
            if let Some(line) = lines.pop() {
                return Ok(line.into());
            }
        }
        Ok(factory.create_multi_line_string(lines).into())
    }

    fn write(&self, geometry: &Geometry, w: &mut dyn Write) -> Result<()> {
        let parts = line_parts(geometry)?;
        if parts.is_empty() {
            return write_null_shape(w);
        }
        write_parts(w, ShapeType::PolyLine, &geometry.envelope(), &parts)
    }

    fn content_length(&self, geometry: &Geometry) -> Result<i32> {
        let parts = line_parts(geometry)?;
        if parts.is_empty() {
            return Ok(NULL_SHAPE_WORDS);
        }
        let num_points = parts.iter().map(|p| p.len()).sum();
        Ok(parts_content_length(parts.len(), num_points))
    }
}
