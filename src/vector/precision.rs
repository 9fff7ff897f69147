use crate::vector::Coord;

/// Coordinate rounding policy applied on creation and before emission.
///
/// `make_precise` is idempotent for every variant: rounding an already rounded
/// value returns it unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PrecisionModel {
    /// Full double precision, no rounding.
    #[default]
    Floating,
    /// Round to the nearest single-precision value.
    FloatingSingle,
    /// Snap to a grid of `1 / scale` units shifted by the offsets.
    Fixed {
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    },
}

impl PrecisionModel {
    pub fn fixed(scale: f64) -> Self {
        PrecisionModel::Fixed {
            scale,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(
            self,
            PrecisionModel::Floating | PrecisionModel::FloatingSingle
        )
    }

    fn round(value: f64, scale: f64, offset: f64) -> f64 {
        if !value.is_finite() || scale == 0.0 {
            return value;
        }
        // round half up
        ((value - offset) * scale + 0.5).floor() / scale + offset
    }

    pub fn make_precise_x(&self, x: f64) -> f64 {
        match *self {
            PrecisionModel::Floating => x,
            PrecisionModel::FloatingSingle => x as f32 as f64,
            PrecisionModel::Fixed {
                scale, offset_x, ..
            } => Self::round(x, scale, offset_x),
        }
    }

    pub fn make_precise_y(&self, y: f64) -> f64 {
        match *self {
            PrecisionModel::Floating => y,
            PrecisionModel::FloatingSingle => y as f32 as f64,
            PrecisionModel::Fixed {
                scale, offset_y, ..
            } => Self::round(y, scale, offset_y),
        }
    }

    pub fn make_precise(&self, coord: &mut Coord) {
        coord.x = self.make_precise_x(coord.x);
        coord.y = self.make_precise_y(coord.y);
    }

    pub fn precise(&self, coord: Coord) -> Coord {
        let mut c = coord;
        self.make_precise(&mut c);
        c
    }
}
