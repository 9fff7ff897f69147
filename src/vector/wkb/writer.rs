use std::io::Write;

use crate::byte_order::{ByteOrder, WriteBytesExt};
use crate::errors::{GeokitError, Result};
use crate::vector::wkb::WkbGeometryType;
use crate::vector::{Coord, Geometry, LineString, Point, Polygon};

/// Encodes geometries as Well-Known Binary in one byte order.
#[derive(Clone, Copy, Debug, Default)]
pub struct WkbWriter {
    byte_order: ByteOrder,
}

impl WkbWriter {
    pub fn new(byte_order: ByteOrder) -> Self {
        WkbWriter { byte_order }
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn write(&self, geometry: &Geometry) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(geometry, &mut buf)?;
        Ok(buf)
    }

    /// Write `geometry` with a full header, recursing into children with their own headers.
    pub fn write_to<W: Write + ?Sized>(&self, geometry: &Geometry, w: &mut W) -> Result<()> {
        match geometry {
            Geometry::Point(p) => self.write_point(p, w),
            Geometry::LineString(l) => self.write_line_string(l, w),
            Geometry::Polygon(p) => self.write_polygon(p, w),
            Geometry::MultiPoint(m) => {
                self.write_header(WkbGeometryType::MultiPoint, w)?;
                self.write_count(m.points().len(), w)?;
                m.points().iter().try_for_each(|p| self.write_point(p, w))
            }
            Geometry::MultiLineString(m) => {
                self.write_header(WkbGeometryType::MultiLineString, w)?;
                self.write_count(m.lines().len(), w)?;
                m.lines()
                    .iter()
                    .try_for_each(|l| self.write_line_string(l, w))
            }
            Geometry::MultiPolygon(m) => {
                self.write_header(WkbGeometryType::MultiPolygon, w)?;
                self.write_count(m.polygons().len(), w)?;
                m.polygons()
                    .iter()
                    .try_for_each(|p| self.write_polygon(p, w))
            }
            Geometry::GeometryCollection(c) => {
                self.write_header(WkbGeometryType::GeometryCollection, w)?;
                self.write_count(c.geometries().len(), w)?;
                c.geometries().iter().try_for_each(|g| self.write_to(g, w))
            }
            Geometry::LinearRing(_) => Err(GeokitError::UnsupportedGeometryType("LinearRing")),
        }
    }

    fn write_header<W: Write + ?Sized>(&self, t: WkbGeometryType, w: &mut W) -> Result<()> {
        w.write_u8(self.byte_order.wkb_flag())?;
        w.write_u32_with(t.code(), self.byte_order)?;
        Ok(())
    }

    fn write_count<W: Write + ?Sized>(&self, count: usize, w: &mut W) -> Result<()> {
        let count = u32::try_from(count).map_err(|_| GeokitError::InvalidArgument {
            argument: "geometry",
            msg: format!("{count} members do not fit a WKB count"),
        })?;
        w.write_u32_with(count, self.byte_order)?;
        Ok(())
    }

    fn write_coordinate<W: Write + ?Sized>(&self, c: Coord, w: &mut W) -> Result<()> {
        w.write_f64_with(c.x, self.byte_order)?;
        w.write_f64_with(c.y, self.byte_order)?;
        Ok(())
    }

    fn write_coordinates<W: Write + ?Sized>(&self, coords: &[Coord], w: &mut W) -> Result<()> {
        self.write_count(coords.len(), w)?;
        coords
            .iter()
            .try_for_each(|c| self.write_coordinate(*c, w))
    }

    fn write_point<W: Write + ?Sized>(&self, point: &Point, w: &mut W) -> Result<()> {
        self.write_header(WkbGeometryType::Point, w)?;
        // empty points have no coordinate, NaN NaN is the usual stand-in
        let c = point.coord().unwrap_or(Coord {
            x: f64::NAN,
            y: f64::NAN,
        });
        self.write_coordinate(c, w)
    }

    fn write_line_string<W: Write + ?Sized>(&self, line: &LineString, w: &mut W) -> Result<()> {
        self.write_header(WkbGeometryType::LineString, w)?;
        self.write_coordinates(line.coords(), w)
    }

    fn write_polygon<W: Write + ?Sized>(&self, polygon: &Polygon, w: &mut W) -> Result<()> {
        self.write_header(WkbGeometryType::Polygon, w)?;
        if polygon.is_empty() {
            return self.write_count(0, w);
        }
        self.write_count(1 + polygon.num_interior_rings(), w)?;
        polygon
            .rings()
            .try_for_each(|ring| self.write_coordinates(ring.coords(), w))
    }
}
