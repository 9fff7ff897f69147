use std::convert::TryFrom;

use crate::errors::GeokitError;
use crate::vector::{Geometry, Point, Polygon};

fn point_to_geo(point: &Point) -> Result<geo_types::Point<f64>, GeokitError> {
    point
        .coord()
        .map(geo_types::Point)
        .ok_or_else(|| GeokitError::InvalidGeometry {
            msg: "an empty point has no geo-types equivalent".to_string(),
        })
}

fn polygon_to_geo(polygon: &Polygon) -> geo_types::Polygon<f64> {
    let ring = |coords: &[crate::vector::Coord]| geo_types::LineString(coords.to_vec());
    geo_types::Polygon::new(
        ring(polygon.exterior().coords()),
        polygon.interiors().iter().map(|h| ring(h.coords())).collect(),
    )
}

impl TryFrom<&Geometry> for geo_types::Geometry<f64> {
    type Error = GeokitError;

    fn try_from(geo: &Geometry) -> Result<geo_types::Geometry<f64>, Self::Error> {
        match geo {
            Geometry::Point(p) => Ok(geo_types::Geometry::Point(point_to_geo(p)?)),
            Geometry::LineString(l) => Ok(geo_types::Geometry::LineString(
                geo_types::LineString(l.coords().to_vec()),
            )),
            Geometry::LinearRing(r) => Ok(geo_types::Geometry::LineString(
                geo_types::LineString(r.coords().to_vec()),
            )),
            Geometry::Polygon(p) => Ok(geo_types::Geometry::Polygon(polygon_to_geo(p))),
            Geometry::MultiPoint(m) => {
                let points = m
                    .points()
                    .iter()
                    .map(point_to_geo)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(geo_types::Geometry::MultiPoint(geo_types::MultiPoint(
                    points,
                )))
            }
            Geometry::MultiLineString(m) => {
                let strings = m
                    .lines()
                    .iter()
                    .map(|l| geo_types::LineString(l.coords().to_vec()))
                    .collect();
                Ok(geo_types::Geometry::MultiLineString(
                    geo_types::MultiLineString(strings),
                ))
            }
            Geometry::MultiPolygon(m) => {
                let polygons = m.polygons().iter().map(polygon_to_geo).collect();
                Ok(geo_types::Geometry::MultiPolygon(geo_types::MultiPolygon(
                    polygons,
                )))
            }
            Geometry::GeometryCollection(c) => {
                let geometry_list = c
                    .geometries()
                    .iter()
                    .map(geo_types::Geometry::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(geo_types::Geometry::GeometryCollection(
                    geo_types::GeometryCollection(geometry_list),
                ))
            }
        }
    }
}

impl TryFrom<Geometry> for geo_types::Geometry<f64> {
    type Error = GeokitError;
    fn try_from(value: Geometry) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}
