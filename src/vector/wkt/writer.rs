use crate::vector::{
    Coord, Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Point,
    Polygon, PrecisionModel,
};

const INDENT: usize = 2;
const EMPTY: &str = "EMPTY";

/// Renders geometries as WKT.
///
/// Numbers use the shortest representation that reads back to the same `f64`
/// and never switch to exponent notation. In formatted mode nested members are
/// placed on new lines indented by two spaces per level.
#[derive(Clone, Copy, Debug, Default)]
pub struct WktWriter {
    formatted: bool,
    precision_model: PrecisionModel,
}

impl WktWriter {
    pub fn new() -> Self {
        WktWriter::default()
    }

    pub fn formatted() -> Self {
        WktWriter {
            formatted: true,
            ..Default::default()
        }
    }

    /// Round coordinates through `precision_model` before emitting them.
    pub fn with_precision_model(mut self, precision_model: PrecisionModel) -> Self {
        self.precision_model = precision_model;
        self
    }

    pub fn write(&self, geometry: &Geometry) -> String {
        let mut out = String::new();
        self.geometry_tagged_text(geometry, 0, &mut out);
        out
    }

    fn indent(&self, level: usize, out: &mut String) {
        if !self.formatted || level == 0 {
            return;
        }
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(INDENT * level));
    }

    fn geometry_tagged_text(&self, geometry: &Geometry, level: usize, out: &mut String) {
        self.indent(level, out);
        match geometry {
            Geometry::Point(p) => {
                out.push_str("POINT ");
                self.point_text(p, out);
            }
            Geometry::LineString(l) => {
                out.push_str("LINESTRING ");
                self.line_string_text(l.coords(), level, false, out);
            }
            // rings have no tag of their own in simple features WKT
            Geometry::LinearRing(r) => {
                out.push_str("LINESTRING ");
                self.line_string_text(r.coords(), level, false, out);
            }
            Geometry::Polygon(p) => {
                out.push_str("POLYGON ");
                self.polygon_text(p, level, false, out);
            }
            Geometry::MultiPoint(m) => {
                out.push_str("MULTIPOINT ");
                self.multi_point_text(m, out);
            }
            Geometry::MultiLineString(m) => {
                out.push_str("MULTILINESTRING ");
                self.multi_line_string_text(m, level, out);
            }
            Geometry::MultiPolygon(m) => {
                out.push_str("MULTIPOLYGON ");
                self.multi_polygon_text(m, level, out);
            }
            Geometry::GeometryCollection(c) => {
                out.push_str("GEOMETRYCOLLECTION ");
                self.geometry_collection_text(c, level, out);
            }
        }
    }

    fn coordinate(&self, coord: Coord, out: &mut String) {
        let c = self.precision_model.precise(coord);
        out.push_str(&format!("{} {}", c.x, c.y));
    }

    fn point_text(&self, point: &Point, out: &mut String) {
        match point.coord() {
            None => out.push_str(EMPTY),
            Some(c) => {
                out.push('(');
                self.coordinate(c, out);
                out.push(')');
            }
        }
    }

    fn line_string_text(&self, coords: &[Coord], level: usize, do_indent: bool, out: &mut String) {
        if coords.is_empty() {
            out.push_str(EMPTY);
            return;
        }
        if do_indent {
            self.indent(level, out);
        }
        out.push('(');
        for (i, c) in coords.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
                // long lines wrap every ten points
                if i % 10 == 0 {
                    self.indent(level + 2, out);
                }
            }
            self.coordinate(*c, out);
        }
        out.push(')');
    }

    fn polygon_text(&self, polygon: &Polygon, level: usize, indent_first: bool, out: &mut String) {
        if polygon.is_empty() {
            out.push_str(EMPTY);
            return;
        }
        if indent_first {
            self.indent(level, out);
        }
        out.push('(');
        self.line_string_text(polygon.exterior().coords(), level, false, out);
        for hole in polygon.interiors() {
            out.push_str(", ");
            self.line_string_text(hole.coords(), level + 1, true, out);
        }
        out.push(')');
    }

    fn multi_point_text(&self, multi_point: &MultiPoint, out: &mut String) {
        if multi_point.is_empty() {
            out.push_str(EMPTY);
            return;
        }
        out.push('(');
        for (i, point) in multi_point.points().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match point.coord() {
                Some(c) => self.coordinate(c, out),
                None => out.push_str(EMPTY),
            }
        }
        out.push(')');
    }

    fn multi_line_string_text(&self, lines: &MultiLineString, level: usize, out: &mut String) {
        if lines.is_empty() {
            out.push_str(EMPTY);
            return;
        }
        out.push('(');
        for (i, line) in lines.lines().iter().enumerate() {
            let (level, do_indent) = if i > 0 {
                out.push_str(", ");
                (level + 1, true)
            } else {
                (level, false)
            };
            self.line_string_text(line.coords(), level, do_indent, out);
        }
        out.push(')');
    }

    fn multi_polygon_text(&self, polygons: &MultiPolygon, level: usize, out: &mut String) {
        if polygons.is_empty() {
            out.push_str(EMPTY);
            return;
        }
        out.push('(');
        for (i, polygon) in polygons.polygons().iter().enumerate() {
            let (level, do_indent) = if i > 0 {
                out.push_str(", ");
                (level + 1, true)
            } else {
                (level, false)
            };
            self.polygon_text(polygon, level, do_indent, out);
        }
        out.push(')');
    }

    fn geometry_collection_text(
        &self,
        collection: &GeometryCollection,
        level: usize,
        out: &mut String,
    ) {
        if collection.is_empty() {
            out.push_str(EMPTY);
            return;
        }
        out.push('(');
        for (i, geometry) in collection.geometries().iter().enumerate() {
            let level = if i > 0 {
                out.push_str(", ");
                level + 1
            } else {
                level
            };
            self.geometry_tagged_text(geometry, level, out);
        }
        out.push(')');
    }
}
