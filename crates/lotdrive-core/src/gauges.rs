//! Speedometer and compass math for the HUD.

use std::f32::consts::PI;

use crate::TICK_HZ;

/// Treat one world unit as one metre.
const METRES_PER_SECOND_TO_KMH: f32 = 3.6;

/// Highest reading on the speedometer dial.
pub const SPEEDOMETER_MAX_KMH: f32 = 180.0;
/// Needle angle at zero, in radians measured clockwise from straight up.
pub const SPEEDOMETER_START_ANGLE: f32 = -0.75 * PI;
/// Needle sweep from zero to [`SPEEDOMETER_MAX_KMH`].
pub const SPEEDOMETER_SWEEP: f32 = 1.5 * PI;

/// Convert a per-tick speed into km/h. Reverse speeds come out negative.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn speed_kmh(speed_per_tick: f32) -> f32 {
    speed_per_tick * TICK_HZ as f32 * METRES_PER_SECOND_TO_KMH
}

/// Needle angle for a reading, clockwise from straight up.
///
/// The magnitude is used so reversing still moves the needle, and readings
/// beyond the dial pin it at the end stop.
#[must_use]
pub fn speedometer_needle_angle(kmh: f32) -> f32 {
    let fraction = (kmh.abs() / SPEEDOMETER_MAX_KMH).clamp(0.0, 1.0);
    SPEEDOMETER_START_ANGLE + fraction * SPEEDOMETER_SWEEP
}

/// Compass heading in degrees `[0, 360)`, clockwise from north.
///
/// North is +Z (yaw zero). Positive yaw turns left, toward +X, which reads
/// as west, so the heading runs opposite to yaw.
#[must_use]
pub fn compass_heading_degrees(yaw: f32) -> f32 {
    let heading = (-yaw.to_degrees()).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.
    if heading >= 360.0 { 0.0 } else { heading }
}

/// Nearest of the eight compass points for a heading in degrees.
#[must_use]
pub fn cardinal(heading_degrees: f32) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let heading = heading_degrees.rem_euclid(360.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = ((heading + 22.5) / 45.0).floor() as usize % POINTS.len();
    POINTS[sector]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_speed_kmh() {
        // 0.5 units per tick at 60 Hz is 30 m/s.
        assert!((speed_kmh(0.5) - 108.0).abs() < 1e-3);
        assert!((speed_kmh(-0.15) + 32.4).abs() < 1e-3);
        assert_eq!(speed_kmh(0.0), 0.0);
    }

    #[test]
    fn test_needle_range() {
        assert_eq!(speedometer_needle_angle(0.0), SPEEDOMETER_START_ANGLE);
        assert!(
            (speedometer_needle_angle(SPEEDOMETER_MAX_KMH / 2.0)).abs() < 1e-6,
            "half scale points straight up"
        );
        let end = SPEEDOMETER_START_ANGLE + SPEEDOMETER_SWEEP;
        assert_eq!(speedometer_needle_angle(1_000.0), end);
        assert_eq!(speedometer_needle_angle(-30.0), speedometer_needle_angle(30.0));
    }

    #[test]
    fn test_compass_heading() {
        assert_eq!(compass_heading_degrees(0.0), 0.0);
        assert!((compass_heading_degrees(FRAC_PI_2) - 270.0).abs() < 1e-3);
        assert!((compass_heading_degrees(-FRAC_PI_2) - 90.0).abs() < 1e-3);
        assert!((compass_heading_degrees(PI) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_cardinal() {
        assert_eq!(cardinal(0.0), "N");
        assert_eq!(cardinal(359.0), "N");
        assert_eq!(cardinal(22.0), "N");
        assert_eq!(cardinal(23.0), "NE");
        assert_eq!(cardinal(90.0), "E");
        assert_eq!(cardinal(180.0), "S");
        assert_eq!(cardinal(270.0), "W");
        assert_eq!(cardinal(-45.0), "NW");
    }
}
