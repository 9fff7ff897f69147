use std::io::{Cursor, Read};

use crate::byte_order::{ByteOrder, ReadBytesExt};
use crate::errors::{GeokitError, Result};
use crate::vector::wkb::WkbGeometryType;
use crate::vector::{
    Coord, Geometry, GeometryFactory, LineString, LinearRing, Point, Polygon,
};

// counts come from untrusted input, so never pre-allocate more than this
const MAX_PREALLOCATION: usize = 4096;

/// Decodes Well-Known Binary into [`Geometry`] values.
#[derive(Clone, Copy, Debug, Default)]
pub struct WkbReader {
    factory: GeometryFactory,
}

impl WkbReader {
    pub fn new(factory: GeometryFactory) -> Self {
        WkbReader { factory }
    }

    pub fn read(&self, wkb: &[u8]) -> Result<Geometry> {
        self.read_from(&mut Cursor::new(wkb))
    }

    /// Decode one geometry from the stream, leaving it positioned after it.
    pub fn read_from<R: Read + ?Sized>(&self, reader: &mut R) -> Result<Geometry> {
        let (order, geometry_type) = read_header(reader)?;
        self.read_body(reader, order, geometry_type)
    }

    fn read_body<R: Read + ?Sized>(
        &self,
        r: &mut R,
        order: ByteOrder,
        geometry_type: WkbGeometryType,
    ) -> Result<Geometry> {
        Ok(match geometry_type {
            WkbGeometryType::Point => self.read_point(r, order)?.into(),
            WkbGeometryType::LineString => {
                LineString::new(self.read_coordinates(r, order)?).into()
            }
            WkbGeometryType::Polygon => self.read_polygon(r, order)?.into(),
            WkbGeometryType::MultiPoint => {
                let points = self.read_children(r, order, WkbGeometryType::MultiPoint, |g| {
                    match g {
                        Geometry::Point(p) => Some(p),
                        _ => None,
                    }
                })?;
                self.factory.create_multi_point(points).into()
            }
            WkbGeometryType::MultiLineString => {
                let lines =
                    self.read_children(r, order, WkbGeometryType::MultiLineString, |g| match g {
                        Geometry::LineString(l) => Some(l),
                        _ => None,
                    })?;
                self.factory.create_multi_line_string(lines).into()
            }
            WkbGeometryType::MultiPolygon => {
                let polygons =
                    self.read_children(r, order, WkbGeometryType::MultiPolygon, |g| match g {
                        Geometry::Polygon(p) => Some(p),
                        _ => None,
                    })?;
                self.factory.create_multi_polygon(polygons).into()
            }
            WkbGeometryType::GeometryCollection => {
                let geometries =
                    self.read_children(r, order, WkbGeometryType::GeometryCollection, Some)?;
                self.factory.create_geometry_collection(geometries).into()
            }
        })
    }

    fn read_coordinate<R: Read + ?Sized>(&self, r: &mut R, order: ByteOrder) -> Result<Coord> {
        let x = r.read_f64_with(order)?;
        let y = r.read_f64_with(order)?;
        Ok(self.factory.precision_model().precise(Coord { x, y }))
    }

    fn read_point<R: Read + ?Sized>(&self, r: &mut R, order: ByteOrder) -> Result<Point> {
        let c = self.read_coordinate(r, order)?;
        if c.x.is_nan() && c.y.is_nan() {
            return Ok(Point::empty());
        }
        Ok(Point::new(c))
    }

    fn read_coordinates<R: Read + ?Sized>(
        &self,
        r: &mut R,
        order: ByteOrder,
    ) -> Result<Vec<Coord>> {
        let count = r.read_u32_with(order)? as usize;
        let mut coords = Vec::with_capacity(count.min(MAX_PREALLOCATION));
        for _ in 0..count {
            coords.push(self.read_coordinate(r, order)?);
        }
        Ok(coords)
    }

    fn read_polygon<R: Read + ?Sized>(&self, r: &mut R, order: ByteOrder) -> Result<Polygon> {
        let ring_count = r.read_u32_with(order)? as usize;
        if ring_count == 0 {
            return Ok(Polygon::empty());
        }
        let shell = LinearRing::new(self.read_coordinates(r, order)?)?;
        let mut holes = Vec::with_capacity((ring_count - 1).min(MAX_PREALLOCATION));
        for _ in 1..ring_count {
            holes.push(LinearRing::new(self.read_coordinates(r, order)?)?);
        }
        self.factory.create_polygon(shell, holes)
    }

    /// Every child carries its own byte order and type header.
    fn read_children<R: Read + ?Sized, T>(
        &self,
        r: &mut R,
        order: ByteOrder,
        parent: WkbGeometryType,
        accept: impl Fn(Geometry) -> Option<T>,
    ) -> Result<Vec<T>> {
        let count = r.read_u32_with(order)? as usize;
        let mut children = Vec::with_capacity(count.min(MAX_PREALLOCATION));
        for _ in 0..count {
            let (child_order, child_type) = read_header(r)?;
            let child = self.read_body(r, child_order, child_type)?;
            let child = accept(child).ok_or_else(|| {
                GeokitError::format(
                    "WKB",
                    format!("{child_type:?} cannot be a member of a {parent:?}"),
                )
            })?;
            children.push(child);
        }
        Ok(children)
    }
}

fn read_header<R: Read + ?Sized>(r: &mut R) -> Result<(ByteOrder, WkbGeometryType)> {
    let order = ByteOrder::from_wkb_flag(r.read_u8()?)?;
    let code = r.read_u32_with(order)?;
    Ok((order, WkbGeometryType::from_code(code)?))
}
