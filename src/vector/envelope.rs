use crate::vector::Coord;

/// Axis-aligned bounding box.
///
/// An envelope built from no coordinates is *null*: it contains nothing,
/// intersects nothing, and reports zero width, height and area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope::null()
    }
}

impl Envelope {
    pub fn null() -> Self {
        Envelope {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Build an envelope from two corner ordinates per axis, in any order.
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64) -> Self {
        Envelope {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    pub fn from_coord(coord: Coord) -> Self {
        Envelope::new(coord.x, coord.x, coord.y, coord.y)
    }

    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a Coord>) -> Self {
        let mut env = Envelope::null();
        for c in coords {
            env.expand_to_include_coord(*c);
        }
        env
    }

    pub fn is_null(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_x - self.min_x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_null() {
            0.0
        } else {
            self.max_y - self.min_y
        }
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn expand_to_include_coord(&mut self, coord: Coord) {
        // NaN ordinates (empty WKB points) never widen the box
        if coord.x.is_nan() || coord.y.is_nan() {
            return;
        }
        self.min_x = self.min_x.min(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_x = self.max_x.max(coord.x);
        self.max_y = self.max_y.max(coord.y);
    }

    pub fn expand_to_include(&mut self, other: &Envelope) {
        if other.is_null() {
            return;
        }
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn contains_coord(&self, coord: Coord) -> bool {
        !self.is_null()
            && coord.x >= self.min_x
            && coord.x <= self.max_x
            && coord.y >= self.min_y
            && coord.y <= self.max_y
    }

    /// `true` if `other` lies entirely inside (or on the boundary of) `self`.
    pub fn contains(&self, other: &Envelope) -> bool {
        !self.is_null()
            && !other.is_null()
            && other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        !self.is_null()
            && !other.is_null()
            && other.min_x <= self.max_x
            && other.max_x >= self.min_x
            && other.min_y <= self.max_y
            && other.max_y >= self.min_y
    }

    /// `[min_x, min_y, max_x, max_y]`, the layout used by shapefile headers.
    pub fn to_bounds(&self) -> [f64; 4] {
        if self.is_null() {
            [0.0; 4]
        } else {
            [self.min_x, self.min_y, self.max_x, self.max_y]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_envelope() {
        let env = Envelope::null();
        assert!(env.is_null());
        assert_eq!(env.area(), 0.0);
        assert!(!env.intersects(&Envelope::new(0.0, 1.0, 0.0, 1.0)));
        assert_eq!(env.to_bounds(), [0.0; 4]);
    }

    #[test]
    fn test_expand_and_contains() {
        let mut env = Envelope::from_coord(Coord { x: 4.0, y: 4.0 });
        env.expand_to_include_coord(Coord { x: 5.0, y: 5.0 });
        let shell = Envelope::new(10.0, 1.0, 10.0, 1.0);
        assert!(shell.contains(&env));
        assert!(!env.contains(&shell));
        assert!(env.intersects(&shell));
        assert_eq!(shell.area(), 81.0);
    }

    #[test]
    fn test_touching_envelopes_intersect() {
        let a = Envelope::new(0.0, 1.0, 0.0, 1.0);
        let b = Envelope::new(1.0, 2.0, 1.0, 2.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&Envelope::new(1.5, 2.0, 1.5, 2.0)));
    }
}
