//! Wheel node naming conventions.
//!
//! Car models mark their wheels with node names containing "wheel" (any case).
//! Front wheels are additionally marked with "front" or an `fl`/`fr` token and
//! turn with the steering; everything else only spins.

/// Where a wheel sits on the car.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WheelPosition {
    /// Steered and spun.
    Front,
    /// Spun only.
    Rear,
}

/// Classify a model node by name, or `None` if it is not a wheel.
#[must_use]
pub fn classify_wheel(name: &str) -> Option<WheelPosition> {
    let lower = name.to_ascii_lowercase();
    if !lower.contains("wheel") {
        return None;
    }

    let front = lower.contains("front")
        || lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .any(|token| matches!(token, "fl" | "fr" | "f"));
    Some(if front {
        WheelPosition::Front
    } else {
        WheelPosition::Rear
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_wheels() {
        assert_eq!(classify_wheel("Body"), None);
        assert_eq!(classify_wheel("steering_column"), None);
        assert_eq!(classify_wheel(""), None);
    }

    #[test]
    fn test_front_wheels() {
        assert_eq!(classify_wheel("Wheel_Front_Left"), Some(WheelPosition::Front));
        assert_eq!(classify_wheel("wheel.FL"), Some(WheelPosition::Front));
        assert_eq!(classify_wheel("wheel_fr_001"), Some(WheelPosition::Front));
        assert_eq!(classify_wheel("frontwheel"), Some(WheelPosition::Front));
    }

    #[test]
    fn test_other_wheels_are_rear() {
        assert_eq!(classify_wheel("Wheel_Rear_Left"), Some(WheelPosition::Rear));
        assert_eq!(classify_wheel("wheel_rr"), Some(WheelPosition::Rear));
        assert_eq!(classify_wheel("WHEEL3"), Some(WheelPosition::Rear));
        // "frwheel" has no separated token, so it does not count as front.
        assert_eq!(classify_wheel("frwheel"), Some(WheelPosition::Rear));
    }
}
