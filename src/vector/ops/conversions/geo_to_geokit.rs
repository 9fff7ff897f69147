use std::convert::TryFrom;

use crate::errors::{GeokitError, Result};
use crate::vector::{
    Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, ToGeokit,
};

impl ToGeokit for geo_types::Point<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        Ok(Point::new(self.0).into())
    }
}

impl ToGeokit for geo_types::MultiPoint<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        Ok(MultiPoint::new(self.0.iter().map(|p| Point::new(p.0)).collect()).into())
    }
}

impl ToGeokit for geo_types::LineString<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        Ok(LineString::new(self.0.clone()).into())
    }
}

impl ToGeokit for geo_types::Line<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        Ok(LineString::new(vec![self.start, self.end]).into())
    }
}

impl ToGeokit for geo_types::MultiLineString<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        let lines = self.0.iter().map(|l| LineString::new(l.0.clone())).collect();
        Ok(MultiLineString::new(lines).into())
    }
}

fn polygon_from_geo(polygon: &geo_types::Polygon<f64>) -> Result<Polygon> {
    // geo-types leaves an empty exterior unclosed
    if polygon.exterior().0.is_empty() {
        return Ok(Polygon::empty());
    }
    let shell = LinearRing::new(polygon.exterior().0.clone())?;
    let holes = polygon
        .interiors()
        .iter()
        .map(|ring| LinearRing::new(ring.0.clone()))
        .collect::<Result<Vec<_>>>()?;
    Polygon::new(shell, holes)
}

impl ToGeokit for geo_types::Polygon<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        Ok(polygon_from_geo(self)?.into())
    }
}

impl ToGeokit for geo_types::Rect<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        self.to_polygon().to_geokit()
    }
}

impl ToGeokit for geo_types::Triangle<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        self.to_polygon().to_geokit()
    }
}

impl ToGeokit for geo_types::MultiPolygon<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        let polygons = self
            .0
            .iter()
            .map(polygon_from_geo)
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiPolygon::new(polygons).into())
    }
}

impl ToGeokit for geo_types::GeometryCollection<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        let geometries = self
            .0
            .iter()
            .map(|g| g.to_geokit())
            .collect::<Result<Vec<_>>>()?;
        Ok(GeometryCollection::new(geometries).into())
    }
}

impl ToGeokit for geo_types::Geometry<f64> {
    fn to_geokit(&self) -> Result<Geometry> {
        match self {
            geo_types::Geometry::Point(c) => c.to_geokit(),
            geo_types::Geometry::Line(c) => c.to_geokit(),
            geo_types::Geometry::LineString(c) => c.to_geokit(),
            geo_types::Geometry::Polygon(c) => c.to_geokit(),
            geo_types::Geometry::MultiPoint(c) => c.to_geokit(),
            geo_types::Geometry::MultiLineString(c) => c.to_geokit(),
            geo_types::Geometry::MultiPolygon(c) => c.to_geokit(),
            geo_types::Geometry::GeometryCollection(c) => c.to_geokit(),
            geo_types::Geometry::Rect(c) => c.to_geokit(),
            geo_types::Geometry::Triangle(c) => c.to_geokit(),
        }
    }
}

impl TryFrom<geo_types::Geometry<f64>> for Geometry {
    type Error = GeokitError;

    fn try_from(value: geo_types::Geometry<f64>) -> Result<Self> {
        value.to_geokit()
    }
}
