use std::fmt::{self, Display, Formatter};

use crate::errors::{GeokitError, Result};
use crate::vector::algorithm;
use crate::vector::{Coord, Envelope};

/// The kind of a [`Geometry`], independent of its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub fn name(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::LinearRing => "LinearRing",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A point, possibly empty.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point(Option<Coord>);

impl Point {
    pub fn new(coord: Coord) -> Self {
        Point(Some(coord))
    }

    pub fn empty() -> Self {
        Point(None)
    }

    pub fn coord(&self) -> Option<Coord> {
        self.0
    }

    pub fn x(&self) -> Option<f64> {
        self.0.map(|c| c.x)
    }

    pub fn y(&self) -> Option<f64> {
        self.0.map(|c| c.y)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Coord> for Point {
    fn from(coord: Coord) -> Self {
        Point::new(coord)
    }
}

/// An ordered, possibly empty, sequence of coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineString(Vec<Coord>);

impl LineString {
    pub fn new(coords: Vec<Coord>) -> Self {
        LineString(coords)
    }

    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    pub fn into_coords(self) -> Vec<Coord> {
        self.0
    }

    pub fn num_points(&self) -> usize {
        self.0.len()
    }

    pub fn point_n(&self, n: usize) -> Option<Point> {
        self.0.get(n).copied().map(Point::new)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }
}

impl From<Vec<Coord>> for LineString {
    fn from(coords: Vec<Coord>) -> Self {
        LineString(coords)
    }
}

/// A closed line string used as a polygon boundary.
///
/// A ring is either empty or holds at least four coordinates with the first equal
/// to the last.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearRing(Vec<Coord>);

impl LinearRing {
    pub fn new(coords: Vec<Coord>) -> Result<Self> {
        if coords.is_empty() {
            return Ok(LinearRing(coords));
        }
        if coords.first() != coords.last() {
            return Err(GeokitError::InvalidGeometry {
                msg: "points of a LinearRing do not form a closed linestring".to_string(),
            });
        }
        if coords.len() < 4 {
            return Err(GeokitError::InvalidGeometry {
                msg: format!(
                    "invalid number of points in LinearRing (found {} - must be 0 or >= 4)",
                    coords.len()
                ),
            });
        }
        Ok(LinearRing(coords))
    }

    pub fn empty() -> Self {
        LinearRing(Vec::new())
    }

    pub fn coords(&self) -> &[Coord] {
        &self.0
    }

    pub fn into_coords(self) -> Vec<Coord> {
        self.0
    }

    pub fn num_points(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Counter-clockwise rings have a positive signed area.
    pub fn is_ccw(&self) -> bool {
        algorithm::is_ccw(&self.0)
    }

    pub fn area(&self) -> f64 {
        algorithm::ring_area(&self.0)
    }

    /// The same ring traversed in the opposite direction.
    pub fn reversed(&self) -> LinearRing {
        let mut coords = self.0.clone();
        coords.reverse();
        LinearRing(coords)
    }
}

/// A shell with zero or more holes. An empty shell means an empty polygon.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    shell: LinearRing,
    holes: Vec<LinearRing>,
}

impl Polygon {
    pub fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Result<Self> {
        if shell.is_empty() && holes.iter().any(|h| !h.is_empty()) {
            return Err(GeokitError::InvalidGeometry {
                msg: "shell is empty but holes are not".to_string(),
            });
        }
        Ok(Polygon { shell, holes })
    }

    pub fn empty() -> Self {
        Polygon::default()
    }

    pub fn exterior(&self) -> &LinearRing {
        &self.shell
    }

    pub fn interiors(&self) -> &[LinearRing] {
        &self.holes
    }

    pub fn num_interior_rings(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    /// Shell first, then holes.
    pub fn rings(&self) -> impl Iterator<Item = &LinearRing> {
        std::iter::once(&self.shell).chain(self.holes.iter())
    }

    fn rings_mut(&mut self) -> impl Iterator<Item = &mut LinearRing> {
        std::iter::once(&mut self.shell).chain(self.holes.iter_mut())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPoint(Vec<Point>);

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        MultiPoint(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Point::is_empty)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiLineString(Vec<LineString>);

impl MultiLineString {
    pub fn new(lines: Vec<LineString>) -> Self {
        MultiLineString(lines)
    }

    pub fn lines(&self) -> &[LineString] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(LineString::is_empty)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPolygon(Vec<Polygon>);

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        MultiPolygon(polygons)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Polygon::is_empty)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryCollection(Vec<Geometry>);

impl GeometryCollection {
    pub fn new(geometries: Vec<Geometry>) -> Self {
        GeometryCollection(geometries)
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.0
    }

    pub fn into_geometries(self) -> Vec<Geometry> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Geometry::is_empty)
    }
}

/// A vector geometry: a closed set of variants traversed by pattern matching.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::LinearRing(_) => GeometryType::LinearRing,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn geometry_name(&self) -> &'static str {
        self.geometry_type().name()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(g) => g.is_empty(),
            Geometry::LineString(g) => g.is_empty(),
            Geometry::LinearRing(g) => g.is_empty(),
            Geometry::Polygon(g) => g.is_empty(),
            Geometry::MultiPoint(g) => g.is_empty(),
            Geometry::MultiLineString(g) => g.is_empty(),
            Geometry::MultiPolygon(g) => g.is_empty(),
            Geometry::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// Number of direct children for collections, `1` for everything else.
    pub fn num_geometries(&self) -> usize {
        match self {
            Geometry::MultiPoint(g) => g.0.len(),
            Geometry::MultiLineString(g) => g.0.len(),
            Geometry::MultiPolygon(g) => g.0.len(),
            Geometry::GeometryCollection(g) => g.0.len(),
            _ => 1,
        }
    }

    /// All coordinates in traversal order.
    pub fn coordinates(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.num_points());
        self.visit_coords(&mut |c| out.push(*c));
        out
    }

    pub fn num_points(&self) -> usize {
        let mut n = 0;
        self.visit_coords(&mut |_| n += 1);
        n
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        self.visit_coords(&mut |c| env.expand_to_include_coord(*c));
        env
    }

    fn visit_coords(&self, f: &mut impl FnMut(&Coord)) {
        match self {
            Geometry::Point(p) => p.0.iter().for_each(f),
            Geometry::LineString(l) => l.0.iter().for_each(f),
            Geometry::LinearRing(r) => r.0.iter().for_each(f),
            Geometry::Polygon(p) => p.rings().flat_map(|r| r.0.iter()).for_each(f),
            Geometry::MultiPoint(m) => m.0.iter().flat_map(|p| p.0.iter()).for_each(f),
            Geometry::MultiLineString(m) => m.0.iter().flat_map(|l| l.0.iter()).for_each(f),
            Geometry::MultiPolygon(m) => m
                .0
                .iter()
                .flat_map(|p| p.rings())
                .flat_map(|r| r.0.iter())
                .for_each(f),
            Geometry::GeometryCollection(c) => c.0.iter().for_each(|g| g.visit_coords(&mut *f)),
        }
    }

    /// Mutate every coordinate in place. Structure is left untouched.
    ///
    /// Precision snapping and map projection both go through here.
    pub fn apply_coords_mut(&mut self, f: &mut impl FnMut(&mut Coord)) {
        match self {
            Geometry::Point(p) => p.0.iter_mut().for_each(f),
            Geometry::LineString(l) => l.0.iter_mut().for_each(f),
            Geometry::LinearRing(r) => r.0.iter_mut().for_each(f),
            Geometry::Polygon(p) => p.rings_mut().flat_map(|r| r.0.iter_mut()).for_each(f),
            Geometry::MultiPoint(m) => m.0.iter_mut().flat_map(|p| p.0.iter_mut()).for_each(f),
            Geometry::MultiLineString(m) => {
                m.0.iter_mut().flat_map(|l| l.0.iter_mut()).for_each(f)
            }
            Geometry::MultiPolygon(m) => m
                .0
                .iter_mut()
                .flat_map(|p| p.rings_mut())
                .flat_map(|r| r.0.iter_mut())
                .for_each(f),
            Geometry::GeometryCollection(c) => {
                c.0.iter_mut().for_each(|g| g.apply_coords_mut(&mut *f))
            }
        }
    }

    /// Fallible variant of [`Geometry::apply_coords_mut`]; stops at the first error.
    pub fn try_apply_coords_mut(
        &mut self,
        f: &mut impl FnMut(&mut Coord) -> Result<()>,
    ) -> Result<()> {
        let mut outcome = Ok(());
        self.apply_coords_mut(&mut |c| {
            if outcome.is_ok() {
                outcome = f(c);
            }
        });
        outcome
    }
}

impl Display for Geometry {
    /// Writes the geometry as WKT, pretty-printed with `{:#}`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = if f.alternate() {
            crate::vector::wkt::WktWriter::formatted().write(self)
        } else {
            crate::vector::wkt::WktWriter::new().write(self)
        };
        f.write_str(&text)
    }
}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Geometry {
                fn from(g: $variant) -> Self {
                    Geometry::$variant(g)
                }
            }
        )*
    };
}

impl_from_variant!(
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection
);
