//! Fixed-point packing of map coordinates into GatherMate2 keys.

pub type PackedCoordinate = i64;

const SCALE: f64 = 10_000.0;
const AXIS_BASE: i64 = 1_000_000;

fn fixed_point(value: f64) -> i64 {
    // `as` saturates and maps NaN to 0.
    (value * SCALE + 0.5).floor() as i64
}

/// Packs a percentage pair as `round(x * 1e4) * 1e6 + round(y * 1e4)`, rounding half up.
pub fn pack(x: f64, y: f64) -> PackedCoordinate {
    fixed_point(x)
        .saturating_mul(AXIS_BASE)
        .saturating_add(fixed_point(y))
}
