use std::io::{Read, Write};

use super::{
    mismatch, parts_content_length, read_parts, read_shape_type, write_null_shape, write_parts,
    ShapeHandler, NULL_SHAPE_WORDS,
};
use crate::config;
use crate::errors::Result;
use crate::shapefile::ShapeType;
use crate::vector::algorithm::{is_point_in_ring, point_in_list};
use crate::vector::{Coord, Envelope, Geometry, GeometryFactory, LinearRing, Polygon};

/// Polygon records: one part per ring.
///
/// Ring winding encodes its role: clockwise rings are shells and
/// counter-clockwise rings are holes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolygonHandler;

fn polygons(geometry: &Geometry) -> Result<Vec<&Polygon>> {
    let polygons: Vec<&Polygon> = match geometry {
        Geometry::Polygon(polygon) => vec![polygon],
        Geometry::MultiPolygon(multi) => multi.polygons().iter().collect(),
        _ => return Err(mismatch(ShapeType::Polygon, geometry)),
    };
    Ok(polygons.into_iter().filter(|p| !p.is_empty()).collect())
}

/// Shell rings clockwise, hole rings counter-clockwise.
fn rewound(polygon: &Polygon) -> Vec<Vec<Coord>> {
    polygon
        .rings()
        .enumerate()
        .filter(|(_, ring)| !ring.is_empty())
        .map(|(i, ring)| {
            let want_ccw = i > 0;
            let mut coords = ring.coords().to_vec();
            if ring.is_ccw() != want_ccw {
                coords.reverse();
            }
            coords
        })
        .collect()
}

struct Ring {
    ring: LinearRing,
    envelope: Envelope,
}

impl Ring {
    fn new(ring: LinearRing) -> Self {
        let envelope = Envelope::from_coords(ring.coords());
        Ring { ring, envelope }
    }

    fn contains(&self, hole: &Ring) -> bool {
        let Some(&first) = hole.ring.coords().first() else {
            return false;
        };
        let coords = self.ring.coords();
        self.envelope.contains(&hole.envelope)
            && (is_point_in_ring(first, coords) || point_in_list(first, coords))
    }
}

/// Close the ring if needed. Rings that stay degenerate are dropped.
fn to_ring(mut coords: Vec<Coord>, factory: &GeometryFactory) -> Option<LinearRing> {
    if coords.first() != coords.last() {
        coords.push(coords[0]);
    }
    if coords.len() < 4 {
        tracing::warn!(points = coords.len(), "dropping degenerate polygon ring");
        return None;
    }
    match factory.create_linear_ring(coords) {
        Ok(ring) => Some(ring),
        Err(err) => {
            tracing::warn!(%err, "dropping invalid polygon ring");
            None
        }
    }
}

/// Pair every hole with the smallest shell containing it.
fn assemble(
    shells: Vec<Ring>,
    holes: Vec<Ring>,
    factory: &GeometryFactory,
) -> Result<Vec<Polygon>> {
    let mut holes_for_shells: Vec<Vec<LinearRing>> = vec![Vec::new(); shells.len()];
    for hole in holes {
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, shell)| shell.contains(&hole))
            .min_by(|(_, a), (_, b)| a.ring.area().total_cmp(&b.ring.area()))
            .map(|(i, _)| i);
        match owner {
            Some(i) => holes_for_shells[i].push(hole.ring),
            None => tracing::warn!(
                min_x = hole.envelope.min_x(),
                min_y = hole.envelope.min_y(),
                "dropping polygon hole outside every shell"
            ),
        }
    }
    shells
        .into_iter()
        .zip(holes_for_shells)
        .map(|(shell, holes)| factory.create_polygon(shell.ring, holes))
        .collect()
}

impl ShapeHandler for PolygonHandler {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Polygon
    }

    /// A single shell reads as a Polygon, anything else as a MultiPolygon.
    fn read(&self, r: &mut dyn Read, factory: &GeometryFactory) -> Result<Geometry> {
        if !read_shape_type(r, ShapeType::Polygon)? {
            return Ok(factory.create_multi_polygon(Vec::new()).into());
        }
        let mut shells = Vec::new();
        let mut holes = Vec::new();
        for coords in read_parts(r, factory)? {
            if coords.is_empty() {
                continue;
            }
            let Some(ring) = to_ring(coords, factory) else {
                continue;
            };
            if ring.is_ccw() {
                holes.push(Ring::new(ring));
            } else {
                shells.push(Ring::new(ring));
            }
        }
        let mut polygons = assemble(shells, holes, factory)?;
        if polygons.len() == 1 {
            if let Some(polygon) = polygons.pop() {
                return Ok(polygon.into());
            }
        }
        Ok(factory.create_multi_polygon(polygons).into())
    }

    /// Rings are re-oriented first unless `SHAPE_REWIND_ON_WRITE` is off.
    fn write(&self, geometry: &Geometry, w: &mut dyn Write) -> Result<()> {
        let polygons = polygons(geometry)?;
        if polygons.is_empty() {
            return write_null_shape(w);
        }
        let rings: Vec<Vec<Coord>> =
            if config::get_config_option_bool(config::SHAPE_REWIND_ON_WRITE, true)? {
                polygons.iter().flat_map(|p| rewound(p)).collect()
            } else {
                polygons
                    .iter()
                    .flat_map(|p| p.rings())
                    .filter(|r| !r.is_empty())
                    .map(|r| r.coords().to_vec())
                    .collect()
            };
        let parts: Vec<&[Coord]> = rings.iter().map(Vec::as_slice).collect();
        write_parts(w, ShapeType::Polygon, &geometry.envelope(), &parts)
    }

    fn content_length(&self, geometry: &Geometry) -> Result<i32> {
        let polygons = polygons(geometry)?;
        if polygons.is_empty() {
            return Ok(NULL_SHAPE_WORDS);
        }
        let rings = polygons.iter().flat_map(|p| p.rings()).filter(|r| !r.is_empty());
        let (num_parts, num_points) =
            rings.fold((0, 0), |(parts, points), r| (parts + 1, points + r.num_points()));
        Ok(parts_content_length(num_parts, num_points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapefile::handlers::tests::{decode, encode};
    use crate::vector::algorithm::signed_area;

    fn ring_coords(buf: &[u8], start: usize, n: usize) -> Vec<Coord> {
        (0..n)
            .map(|i| {
                let at = start + 16 * i;
                let x = f64::from_le_bytes(buf[at..at + 8].try_into().unwrap());
                let y = f64::from_le_bytes(buf[at + 8..at + 16].try_into().unwrap());
                Coord { x, y }
            })
            .collect()
    }

    #[test]
    fn test_polygon_with_hole() {
        let wkt = "POLYGON ((1 1, 10 1, 10 10, 1 10, 1 1), (4 4, 5 4, 5 5, 4 5, 4 4))";
        let polygon = Geometry::from_wkt(wkt).unwrap();
        let buf = encode(&PolygonHandler, &polygon);

        // shell written clockwise and hole counter-clockwise
        let points_start = 44 + 2 * 4;
        assert!(signed_area(&ring_coords(&buf, points_start, 5)) < 0.0);
        assert!(signed_area(&ring_coords(&buf, points_start + 5 * 16, 5)) > 0.0);

        let read = decode(&PolygonHandler, &buf).unwrap();
        let Geometry::Polygon(read) = read else {
            panic!("expected a polygon, got {read}");
        };
        assert_eq!(read.num_interior_rings(), 1);
        assert_eq!(read.exterior().area(), 81.0);
        assert_eq!(read.interiors()[0].area(), 1.0);
    }

    #[test]
    fn test_holes_go_to_smallest_shell() {
        let wkt = "MULTIPOLYGON (((0 0, 0 100, 100 100, 100 0, 0 0)), \
                   ((10 10, 10 50, 50 50, 50 10, 10 10), (20 20, 30 20, 30 30, 20 30, 20 20)))";
        let multi = Geometry::from_wkt(wkt).unwrap();
        let buf = encode(&PolygonHandler, &multi);
        let read = decode(&PolygonHandler, &buf).unwrap();
        let Geometry::MultiPolygon(read) = read else {
            panic!("expected a multipolygon, got {read}");
        };
        assert_eq!(read.polygons().len(), 2);
        assert_eq!(read.polygons()[0].num_interior_rings(), 0);
        assert_eq!(read.polygons()[1].num_interior_rings(), 1);
    }

    #[test]
    fn test_orphan_hole_is_dropped() {
        let shell: &[Coord] = &[
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 0.0, y: 1.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        let orphan: &[Coord] = &[
            Coord { x: 5.0, y: 5.0 },
            Coord { x: 6.0, y: 5.0 },
            Coord { x: 6.0, y: 6.0 },
            Coord { x: 5.0, y: 5.0 },
        ];
        let mut buf = Vec::new();
        write_parts(
            &mut buf,
            ShapeType::Polygon,
            &Envelope::new(0.0, 6.0, 0.0, 6.0),
            &[shell, orphan],
        )
        .unwrap();
        let read = decode(&PolygonHandler, &buf).unwrap();
        assert_eq!(read.wkt(), "POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
    }

    #[test]
    fn test_sliver_hole_stays_a_hole() {
        let shell: &[Coord] = &[
            Coord { x: -1.0, y: -1.0 },
            Coord { x: -1.0, y: 2e8 },
            Coord { x: 2e8, y: 2e8 },
            Coord { x: 2e8, y: -1.0 },
            Coord { x: -1.0, y: -1.0 },
        ];
        let sliver: &[Coord] = &[
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1e8, y: 1e8 - 1.0 },
            Coord { x: 1e8 + 1.0, y: 1e8 },
            Coord { x: 0.0, y: 0.0 },
        ];
        let mut buf = Vec::new();
        write_parts(
            &mut buf,
            ShapeType::Polygon,
            &Envelope::new(-1.0, 2e8, -1.0, 2e8),
            &[shell, sliver],
        )
        .unwrap();
        let read = decode(&PolygonHandler, &buf).unwrap();
        let Geometry::Polygon(read) = read else {
            panic!("expected a polygon, got {read}");
        };
        assert_eq!(read.num_interior_rings(), 1);
        assert_eq!(read.interiors()[0].coords(), sliver);
    }

    #[test]
    fn test_unclosable_ring_is_dropped() {
        let shell: &[Coord] = &[
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 0.0, y: 1.0 },
            Coord { x: 1.0, y: 1.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 0.0, y: 0.0 },
        ];
        // NaN never equals itself, so closing the ring cannot succeed
        let broken: &[Coord] = &[
            Coord { x: f64::NAN, y: 0.5 },
            Coord { x: 0.2, y: 0.2 },
            Coord { x: 0.8, y: 0.2 },
            Coord { x: 0.8, y: 0.8 },
        ];
        let mut buf = Vec::new();
        write_parts(
            &mut buf,
            ShapeType::Polygon,
            &Envelope::new(0.0, 1.0, 0.0, 1.0),
            &[shell, broken],
        )
        .unwrap();
        let read = decode(&PolygonHandler, &buf).unwrap();
        assert_eq!(read.wkt(), "POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
    }

    #[test]
    fn test_unclosed_ring_is_closed() {
        let open: &[Coord] = &[
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 0.0, y: 2.0 },
            Coord { x: 2.0, y: 2.0 },
            Coord { x: 2.0, y: 0.0 },
        ];
        let mut buf = Vec::new();
        write_parts(
            &mut buf,
            ShapeType::Polygon,
            &Envelope::new(0.0, 2.0, 0.0, 2.0),
            &[open],
        )
        .unwrap();
        let read = decode(&PolygonHandler, &buf).unwrap();
        assert_eq!(read.wkt(), "POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))");
    }

    #[test]
    fn test_rewind_can_be_disabled() {
        let ccw_shell = Geometry::from_wkt("POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0))").unwrap();
        config::set_thread_local_config_option(config::SHAPE_REWIND_ON_WRITE, "NO").unwrap();
        let buf = encode(&PolygonHandler, &ccw_shell);
        config::clear_thread_local_config_option(config::SHAPE_REWIND_ON_WRITE).unwrap();
        assert!(signed_area(&ring_coords(&buf, 48, 5)) > 0.0);
    }
}
