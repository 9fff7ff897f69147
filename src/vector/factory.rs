use crate::errors::Result;
use crate::vector::{
    Coord, Geometry, GeometryCollection, LineString, LinearRing, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon, PrecisionModel,
};

/// Builds geometries, snapping every coordinate to the precision model and
/// enforcing the structural rules of each variant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeometryFactory {
    precision_model: PrecisionModel,
    srid: i32,
}

impl GeometryFactory {
    pub fn new(precision_model: PrecisionModel, srid: i32) -> Self {
        GeometryFactory {
            precision_model,
            srid,
        }
    }

    pub fn precision_model(&self) -> &PrecisionModel {
        &self.precision_model
    }

    pub fn srid(&self) -> i32 {
        self.srid
    }

    fn precise(&self, mut coords: Vec<Coord>) -> Vec<Coord> {
        coords
            .iter_mut()
            .for_each(|c| self.precision_model.make_precise(c));
        coords
    }

    pub fn create_point(&self, coord: Coord) -> Point {
        Point::new(self.precision_model.precise(coord))
    }

    pub fn create_empty_point(&self) -> Point {
        Point::empty()
    }

    pub fn create_line_string(&self, coords: Vec<Coord>) -> LineString {
        LineString::new(self.precise(coords))
    }

    /// Fails unless `coords` is empty or closed with at least four points.
    pub fn create_linear_ring(&self, coords: Vec<Coord>) -> Result<LinearRing> {
        LinearRing::new(self.precise(coords))
    }

    pub fn create_polygon(&self, shell: LinearRing, holes: Vec<LinearRing>) -> Result<Polygon> {
        Polygon::new(shell, holes)
    }

    pub fn create_multi_point(&self, points: Vec<Point>) -> MultiPoint {
        MultiPoint::new(points)
    }

    pub fn create_multi_point_from_coords(&self, coords: Vec<Coord>) -> MultiPoint {
        MultiPoint::new(coords.into_iter().map(|c| self.create_point(c)).collect())
    }

    pub fn create_multi_line_string(&self, lines: Vec<LineString>) -> MultiLineString {
        MultiLineString::new(lines)
    }

    pub fn create_multi_polygon(&self, polygons: Vec<Polygon>) -> MultiPolygon {
        MultiPolygon::new(polygons)
    }

    pub fn create_geometry_collection(&self, geometries: Vec<Geometry>) -> GeometryCollection {
        GeometryCollection::new(geometries)
    }

    /// Snap an existing geometry to this factory's precision model.
    pub fn make_precise(&self, geometry: &mut Geometry) {
        let pm = self.precision_model;
        if pm == PrecisionModel::Floating {
            return;
        }
        geometry.apply_coords_mut(&mut |c| pm.make_precise(c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_snaps_coordinates() {
        let factory = GeometryFactory::new(PrecisionModel::fixed(10.0), 4326);
        let line = factory.create_line_string(vec![Coord { x: 1.26, y: 2.04 }]);
        assert_eq!(line.coords(), &[Coord { x: 1.3, y: 2.0 }]);
        assert_eq!(factory.srid(), 4326);
    }

    #[test]
    fn test_factory_rejects_open_ring() {
        let factory = GeometryFactory::default();
        let err = factory
            .create_linear_ring(vec![
                Coord { x: 0., y: 0. },
                Coord { x: 1., y: 0. },
                Coord { x: 1., y: 1. },
                Coord { x: 0., y: 0.5 },
            ])
            .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Argument);
    }

    #[test]
    fn test_snapping_closes_nearly_closed_ring() {
        let factory = GeometryFactory::new(PrecisionModel::fixed(1.0), 0);
        let ring = factory.create_linear_ring(vec![
            Coord { x: 0.1, y: 0.1 },
            Coord { x: 5., y: 0. },
            Coord { x: 5., y: 5. },
            Coord { x: -0.2, y: 0.2 },
        ]);
        assert!(ring.is_ok());
    }
}
