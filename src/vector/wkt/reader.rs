use std::iter::Peekable;

use crate::errors::{GeokitError, Result};
use crate::vector::wkt::tokenizer::{Token, Tokenizer};
use crate::vector::{
    Coord, Geometry, GeometryCollection, GeometryFactory, LineString, LinearRing,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};

const EMPTY: &str = "EMPTY";

/// Parses WKT text into [`Geometry`] values built by a [`GeometryFactory`].
#[derive(Clone, Copy, Debug, Default)]
pub struct WktReader {
    factory: GeometryFactory,
}

impl WktReader {
    pub fn new(factory: GeometryFactory) -> Self {
        WktReader { factory }
    }

    pub fn factory(&self) -> &GeometryFactory {
        &self.factory
    }

    /// Parse exactly one tagged geometry. Trailing tokens are an error.
    pub fn read(&self, wkt: &str) -> Result<Geometry> {
        let mut parser = Parser {
            tokens: Tokenizer::new(wkt).peekable(),
            factory: &self.factory,
        };
        let geometry = parser.geometry_tagged_text()?;
        match parser.tokens.next() {
            None => Ok(geometry),
            Some(token) => Err(GeokitError::parse("end of input", token?.to_string())),
        }
    }
}

struct Parser<'a, 'f> {
    tokens: Peekable<Tokenizer<'a>>,
    factory: &'f GeometryFactory,
}

fn describe(token: Option<Token>) -> String {
    token.map_or_else(|| "end of input".to_string(), |t| t.to_string())
}

impl Parser<'_, '_> {
    fn next_token(&mut self) -> Result<Option<Token>> {
        self.tokens.next().transpose()
    }

    fn peek_is(&mut self, expected: &Token) -> bool {
        matches!(self.tokens.peek(), Some(Ok(t)) if t == expected)
    }

    fn next_number(&mut self) -> Result<f64> {
        match self.next_token()? {
            Some(Token::Number(n)) => Ok(n),
            other => Err(GeokitError::parse("number", describe(other))),
        }
    }

    fn next_word(&mut self) -> Result<String> {
        match self.next_token()? {
            Some(Token::Word(w)) => Ok(w.to_ascii_uppercase()),
            other => Err(GeokitError::parse("a geometry tag", describe(other))),
        }
    }

    /// `EMPTY` yields `false`, `(` yields `true`.
    fn next_empty_or_opener(&mut self) -> Result<bool> {
        match self.next_token()? {
            Some(Token::Word(w)) if w.eq_ignore_ascii_case(EMPTY) => Ok(false),
            Some(Token::LeftParen) => Ok(true),
            other => Err(GeokitError::parse("'EMPTY' or '('", describe(other))),
        }
    }

    /// `,` yields `true`, `)` yields `false`.
    fn next_closer_or_comma(&mut self) -> Result<bool> {
        match self.next_token()? {
            Some(Token::Comma) => Ok(true),
            Some(Token::RightParen) => Ok(false),
            other => Err(GeokitError::parse("')' or ','", describe(other))),
        }
    }

    fn next_closer(&mut self) -> Result<()> {
        match self.next_token()? {
            Some(Token::RightParen) => Ok(()),
            other => Err(GeokitError::parse("')'", describe(other))),
        }
    }

    /// Parse `EMPTY` or a parenthesized, comma-separated list of `item`.
    fn list<T>(&mut self, mut item: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = Vec::new();
        if !self.next_empty_or_opener()? {
            return Ok(items);
        }
        loop {
            items.push(item(self)?);
            if !self.next_closer_or_comma()? {
                return Ok(items);
            }
        }
    }

    fn precise_coordinate(&mut self) -> Result<Coord> {
        let x = self.next_number()?;
        let y = self.next_number()?;
        Ok(self.factory.precision_model().precise(Coord { x, y }))
    }

    fn coordinates(&mut self) -> Result<Vec<Coord>> {
        self.list(Self::precise_coordinate)
    }

    fn geometry_tagged_text(&mut self) -> Result<Geometry> {
        let tag = self.next_word()?;
        Ok(match tag.as_str() {
            "POINT" => self.point_text()?.into(),
            "LINESTRING" => self.line_string_text()?.into(),
            "LINEARRING" => self.linear_ring_text()?.into(),
            "POLYGON" => self.polygon_text()?.into(),
            "MULTIPOINT" => self.multi_point_text()?.into(),
            "MULTILINESTRING" => self.multi_line_string_text()?.into(),
            "MULTIPOLYGON" => self.multi_polygon_text()?.into(),
            "GEOMETRYCOLLECTION" => self.geometry_collection_text()?.into(),
            _ => return Err(GeokitError::parse("a geometry tag", tag.as_str())),
        })
    }

    fn point_text(&mut self) -> Result<Point> {
        if !self.next_empty_or_opener()? {
            return Ok(self.factory.create_empty_point());
        }
        let coord = self.precise_coordinate()?;
        self.next_closer()?;
        Ok(Point::new(coord))
    }

    fn line_string_text(&mut self) -> Result<LineString> {
        Ok(LineString::new(self.coordinates()?))
    }

    fn linear_ring_text(&mut self) -> Result<LinearRing> {
        LinearRing::new(self.coordinates()?)
    }

    fn polygon_text(&mut self) -> Result<Polygon> {
        let mut rings = self.list(Self::linear_ring_text)?.into_iter();
        match rings.next() {
            None => Ok(Polygon::empty()),
            Some(shell) => self.factory.create_polygon(shell, rings.collect()),
        }
    }

    /// Members are bare coordinate pairs as most writers emit them; the strict
    /// `((x y), (x y))` form and `EMPTY` members are accepted too.
    fn multi_point_text(&mut self) -> Result<MultiPoint> {
        let points = self.list(|p| {
            if p.peek_is(&Token::LeftParen) {
                return p.point_text();
            }
            if matches!(p.tokens.peek(), Some(Ok(Token::Word(_)))) {
                return match p.next_word()?.as_str() {
                    EMPTY => Ok(Point::empty()),
                    other => Err(GeokitError::parse("a coordinate", other)),
                };
            }
            Ok(Point::new(p.precise_coordinate()?))
        })?;
        Ok(self.factory.create_multi_point(points))
    }

    fn multi_line_string_text(&mut self) -> Result<MultiLineString> {
        let lines = self.list(Self::line_string_text)?;
        Ok(self.factory.create_multi_line_string(lines))
    }

    fn multi_polygon_text(&mut self) -> Result<MultiPolygon> {
        let polygons = self.list(Self::polygon_text)?;
        Ok(self.factory.create_multi_polygon(polygons))
    }

    fn geometry_collection_text(&mut self) -> Result<GeometryCollection> {
        let geometries = self.list(Self::geometry_tagged_text)?;
        Ok(self.factory.create_geometry_collection(geometries))
    }
}
