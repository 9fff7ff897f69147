use std::fmt::{self, Display, Formatter};

use crate::errors::{GeokitError, Result};
use crate::vector::Geometry;

/// ESRI shape type codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Null,
    Point,
    PolyLine,
    Polygon,
    MultiPoint,
    PointZ,
    PolyLineZ,
    PolygonZ,
    MultiPointZ,
    PointM,
    PolyLineM,
    PolygonM,
    MultiPointM,
    MultiPatch,
}

impl ShapeType {
    pub fn from_code(code: i32) -> Result<Self> {
        let shape_type = match code {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            31 => ShapeType::MultiPatch,
            _ => {
                return Err(GeokitError::format(
                    "shapefile",
                    format!("unknown shape type code {code}"),
                ))
            }
        };
        Ok(shape_type)
    }

    pub fn code(self) -> i32 {
        match self {
            ShapeType::Null => 0,
            ShapeType::Point => 1,
            ShapeType::PolyLine => 3,
            ShapeType::Polygon => 5,
            ShapeType::MultiPoint => 8,
            ShapeType::PointZ => 11,
            ShapeType::PolyLineZ => 13,
            ShapeType::PolygonZ => 15,
            ShapeType::MultiPointZ => 18,
            ShapeType::PointM => 21,
            ShapeType::PolyLineM => 23,
            ShapeType::PolygonM => 25,
            ShapeType::MultiPointM => 28,
            ShapeType::MultiPatch => 31,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
            ShapeType::PointZ => "PointZ",
            ShapeType::PolyLineZ => "PolyLineZ",
            ShapeType::PolygonZ => "PolygonZ",
            ShapeType::MultiPointZ => "MultiPointZ",
            ShapeType::PointM => "PointM",
            ShapeType::PolyLineM => "PolyLineM",
            ShapeType::PolygonM => "PolygonM",
            ShapeType::MultiPointM => "MultiPointM",
            ShapeType::MultiPatch => "MultiPatch",
        }
    }
}

impl Display for ShapeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The shape type a geometry is stored as.
pub fn shape_type_of(geometry: &Geometry) -> Result<ShapeType> {
    match geometry {
        Geometry::Point(_) => Ok(ShapeType::Point),
        Geometry::LineString(_) | Geometry::LinearRing(_) | Geometry::MultiLineString(_) => {
            Ok(ShapeType::PolyLine)
        }
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Ok(ShapeType::Polygon),
        Geometry::MultiPoint(_) => Ok(ShapeType::MultiPoint),
        Geometry::GeometryCollection(_) => {
            Err(GeokitError::UnsupportedGeometryType("GeometryCollection"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        for code in [0, 1, 3, 5, 8, 11, 13, 15, 18, 21, 23, 25, 28, 31] {
            assert_eq!(ShapeType::from_code(code).unwrap().code(), code);
        }
        let err = ShapeType::from_code(2).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Format);
        assert_eq!(ShapeType::PolyLine.to_string(), "PolyLine");
    }

    #[test]
    fn test_shape_type_of() {
        let cases = [
            ("POINT (1 2)", ShapeType::Point),
            ("LINESTRING (0 0, 1 1)", ShapeType::PolyLine),
            ("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))", ShapeType::PolyLine),
            ("POLYGON ((0 0, 1 0, 1 1, 0 0))", ShapeType::Polygon),
            ("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 0)))", ShapeType::Polygon),
            ("MULTIPOINT (0 0, 1 1)", ShapeType::MultiPoint),
        ];
        for (wkt, expected) in cases {
            let geometry = Geometry::from_wkt(wkt).unwrap();
            assert_eq!(shape_type_of(&geometry).unwrap(), expected, "{wkt}");
        }
        let collection = Geometry::from_wkt("GEOMETRYCOLLECTION (POINT (1 2))").unwrap();
        assert!(shape_type_of(&collection).is_err());
    }
}
