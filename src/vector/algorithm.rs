//! Planar ring predicates used to classify and pair polygon rings.
//!
//! Orientation and containment go through `geo`'s robust predicates, so rings
//! with huge ordinates or near-collinear vertices keep their true winding.

use geo::{Area, Contains, Winding};
use geo_types::{LineString, Polygon};

use crate::vector::Coord;

fn to_polygon(ring: &[Coord]) -> Polygon<f64> {
    Polygon::new(LineString::new(ring.to_vec()), Vec::new())
}

/// Shoelace area of a closed ring. Positive for counter-clockwise traversal.
///
/// Use [`is_ccw`] for the orientation: this sum can round to zero on slivers.
pub fn signed_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    to_polygon(ring).signed_area()
}

pub fn ring_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    to_polygon(ring).unsigned_area()
}

/// `true` for counter-clockwise rings. Unclosed and degenerate rings are not CCW.
pub fn is_ccw(ring: &[Coord]) -> bool {
    LineString::new(ring.to_vec()).is_ccw()
}

/// `true` if `p` lies strictly inside the closed ring.
///
/// Boundary points are outside; callers that care pair this with
/// [`point_in_list`].
pub fn is_point_in_ring(p: Coord, ring: &[Coord]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    to_polygon(ring).contains(&p)
}

/// `true` if `p` is exactly one of the vertices in `coords`.
pub fn point_in_list(p: Coord, coords: &[Coord]) -> bool {
    coords.iter().any(|c| *c == p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn test_orientation() {
        let cw = ring(&[(1., 1.), (1., 10.), (10., 10.), (10., 1.), (1., 1.)]);
        let ccw = ring(&[(4., 4.), (5., 4.), (5., 5.), (4., 5.), (4., 4.)]);
        assert!(!is_ccw(&cw));
        assert!(is_ccw(&ccw));
        assert_eq!(signed_area(&cw), -81.0);
        assert_eq!(ring_area(&ccw), 1.0);
    }

    #[test]
    fn test_sliver_orientation() {
        // signed area is +0.5, far below the rounding of the shoelace sum
        let sliver = ring(&[(0., 0.), (1e8, 1e8 - 1.), (1e8 + 1., 1e8), (0., 0.)]);
        assert!(is_ccw(&sliver));
        let reversed: Vec<Coord> = sliver.iter().rev().copied().collect();
        assert!(!is_ccw(&reversed));
    }

    #[test]
    fn test_point_in_ring() {
        let shell = ring(&[(1., 1.), (10., 1.), (10., 10.), (1., 10.), (1., 1.)]);
        assert!(is_point_in_ring(Coord { x: 4., y: 4. }, &shell));
        assert!(!is_point_in_ring(Coord { x: 11., y: 4. }, &shell));
        assert!(!is_point_in_ring(Coord { x: 0., y: 0. }, &shell));
        assert!(!is_point_in_ring(Coord { x: 10., y: 10. }, &shell));
        assert!(point_in_list(Coord { x: 10., y: 10. }, &shell));
        assert!(!point_in_list(Coord { x: 10., y: 9. }, &shell));
    }

    #[test]
    fn test_degenerate_ring() {
        let line = ring(&[(0., 0.), (1., 1.)]);
        assert_eq!(signed_area(&line), 0.0);
        assert_eq!(ring_area(&line), 0.0);
        assert!(!is_ccw(&line));
        assert!(!is_point_in_ring(Coord { x: 0.5, y: 0.5 }, &line));
    }
}
