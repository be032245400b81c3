//! Stick and trigger shaping math
//!
//! Raw samples arrive as signed 8-bit deflections around the stick's rest
//! position. Shaping suppresses the combined 2-D dead zone, rescales each
//! axis into the signed 16-bit output domain and applies the configured
//! inversion. All functions are pure; out-of-range input is clamped, never
//! rejected.

/// Rescale factor from the 8-bit deflection domain into i16 (32767 / 127)
const SCALE: f32 = 258.007_87;

/// Shapes one stick pair
///
/// The dead zone uses the combined magnitude of the pair, not per-axis
/// thresholds, so a diagonal deflection leaves the zone at the same physical
/// distance as a straight one.
pub fn shape_stick(
    raw_x: i8,
    raw_y: i8,
    dead_zone: f32,
    invert_x: bool,
    invert_y: bool,
) -> (i16, i16) {
    if within_dead_zone(dead_zone, raw_x, raw_y) {
        return (0, 0);
    }

    (scale_axis(raw_x, invert_x), scale_axis(raw_y, invert_y))
}

/// Triggers are one-dimensional and have no dead zone
pub fn shape_trigger(raw: u8) -> u8 {
    raw
}

/// Combined 2-D dead-zone check on the centered pair
fn within_dead_zone(radius: f32, x: i8, y: i8) -> bool {
    let dx = x as f32;
    let dy = y as f32;
    (dx * dx + dy * dy).sqrt() < radius
}

/// Rescales one axis into i16, flipping the sign after scaling if requested
///
/// -128 is clamped to -127 first so the scaled magnitude stays symmetric
/// and inversion cannot overflow.
fn scale_axis(raw: i8, invert: bool) -> i16 {
    let centered = (raw as i32).max(-127) as f32;
    let scaled = centered * SCALE;
    let flipped = if invert { -scaled } else { scaled };
    flipped.clamp(i16::MIN as f32 + 1.0, i16::MAX as f32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_inside_dead_zone_is_fully_suppressed() {
        // magnitude sqrt(50) ~ 7.07 < 10
        assert_eq!(shape_stick(5, 5, 10.0, false, false), (0, 0));
    }

    #[test]
    fn pair_on_the_edge_is_not_suppressed() {
        let (x, y) = shape_stick(10, 0, 10.0, false, false);
        assert!(x > 0);
        assert_eq!(y, 0);
    }

    #[test]
    fn diagonal_uses_combined_magnitude_not_per_axis() {
        // Each axis alone is below the radius, the pair is not
        let (x, y) = shape_stick(8, 8, 10.0, false, false);
        assert!(x > 0 && y > 0);
    }

    #[test]
    fn scaling_preserves_sign_without_invert() {
        let (x, _) = shape_stick(100, 0, 10.0, false, false);
        assert_eq!(x, (100.0 * SCALE) as i16);
        assert!(x > 0);
    }

    #[test]
    fn invert_flips_sign_after_scaling() {
        let (plain_x, _) = shape_stick(100, 0, 10.0, false, false);
        let (flipped_x, _) = shape_stick(100, 0, 10.0, true, false);
        assert_eq!(flipped_x, -plain_x);
    }

    #[test]
    fn full_negative_deflection_stays_in_range() {
        let (x, y) = shape_stick(-128, -128, 10.0, false, false);
        assert!(x >= -32767 && y >= -32767);

        let (xi, yi) = shape_stick(-128, -128, 10.0, true, true);
        assert!(xi <= 32767 && yi <= 32767);
        assert_eq!(xi, -x);
        assert_eq!(yi, -y);
    }

    #[test]
    fn full_deflection_reaches_the_output_extremes() {
        let (x, _) = shape_stick(127, 0, 0.5, false, false);
        assert_eq!(x, i16::MAX);
    }

    #[test]
    fn trigger_passes_through_unchanged() {
        assert_eq!(shape_trigger(0), 0);
        assert_eq!(shape_trigger(128), 128);
        assert_eq!(shape_trigger(255), 255);
    }
}
