//! Trigger zones and the top-down view region.
//!
//! Zones are tested in list order and the first overlap wins, so at most one
//! zone is ever active. The tracker reports transitions rather than raw state
//! so callers can toggle outlines and popups exactly once per change.

use crate::bounds::Aabb;

/// An invisible box that marks a parked car the player can switch to.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerZone {
    /// Name of the car parked in this zone (also its model and spec key).
    pub car: String,
    pub bounds: Aabb,
}

impl TriggerZone {
    #[must_use]
    pub fn new(car: impl Into<String>, bounds: Aabb) -> Self {
        Self {
            car: car.into(),
            bounds,
        }
    }
}

/// Index of the first zone overlapping `bounds`, if any.
#[must_use]
pub fn first_overlap(zones: &[TriggerZone], bounds: &Aabb) -> Option<usize> {
    zones.iter().position(|zone| zone.bounds.intersects(bounds))
}

/// Result of updating a [`ZoneTracker`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneChange {
    /// Same zone (or still no zone) as last update.
    Unchanged,
    /// Moved from no zone into a zone.
    Entered(usize),
    /// Moved out of every zone.
    Left(usize),
    /// Moved directly from one zone into another.
    Switched { from: usize, to: usize },
}

/// Remembers which zone is active between updates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneTracker {
    active: Option<usize>,
}

impl ZoneTracker {
    /// Index of the active zone.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// The active zone itself.
    #[must_use]
    pub fn active_zone<'a>(&self, zones: &'a [TriggerZone]) -> Option<&'a TriggerZone> {
        self.active.and_then(|index| zones.get(index))
    }

    /// Re-test the vehicle bounds against `zones` and report the transition.
    pub fn update(&mut self, zones: &[TriggerZone], bounds: &Aabb) -> ZoneChange {
        let next = first_overlap(zones, bounds);
        let change = match (self.active, next) {
            (Some(from), Some(to)) if from != to => ZoneChange::Switched { from, to },
            (None, Some(to)) => ZoneChange::Entered(to),
            (Some(from), None) => ZoneChange::Left(from),
            _ => ZoneChange::Unchanged,
        };
        self.active = next;
        change
    }

    /// Forget the active zone, e.g. after the vehicle is replaced.
    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Camera framing chosen from the vehicle's position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Third-person camera behind the vehicle.
    #[default]
    Chase,
    /// Overhead camera looking straight down.
    TopDown,
}

/// The larger box that switches the camera to [`ViewMode::TopDown`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRegion {
    pub bounds: Aabb,
}

impl ViewRegion {
    #[must_use]
    pub fn mode_for(&self, vehicle: &Aabb) -> ViewMode {
        if self.bounds.intersects(vehicle) {
            ViewMode::TopDown
        } else {
            ViewMode::Chase
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    fn zone(car: &str, center: Vec3) -> TriggerZone {
        TriggerZone::new(car, Aabb::from_center_half_extents(center, Vec3::splat(1.0)))
    }

    fn probe(center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::splat(0.25))
    }

    #[test]
    fn test_first_match_wins() {
        let zones = vec![
            zone("first", Vec3::ZERO),
            zone("second", Vec3::new(0.5, 0.0, 0.0)),
        ];
        // Overlaps both; the earlier zone wins.
        assert_eq!(first_overlap(&zones, &probe(Vec3::new(0.25, 0.0, 0.0))), Some(0));
        // Only overlaps the second.
        assert_eq!(first_overlap(&zones, &probe(Vec3::new(1.5, 0.0, 0.0))), Some(1));
        assert_eq!(first_overlap(&zones, &probe(Vec3::new(9.0, 0.0, 0.0))), None);
    }

    #[test]
    fn test_tracker_transitions() {
        let zones = vec![
            zone("sedan", Vec3::new(0.0, 0.0, 0.0)),
            zone("coupe", Vec3::new(5.0, 0.0, 0.0)),
        ];
        let mut tracker = ZoneTracker::default();

        assert_eq!(tracker.update(&zones, &probe(Vec3::new(-9.0, 0.0, 0.0))), ZoneChange::Unchanged);
        assert_eq!(tracker.update(&zones, &probe(Vec3::ZERO)), ZoneChange::Entered(0));
        assert_eq!(tracker.update(&zones, &probe(Vec3::new(0.1, 0.0, 0.0))), ZoneChange::Unchanged);
        assert_eq!(tracker.active_zone(&zones).map(|z| z.car.as_str()), Some("sedan"));

        assert_eq!(
            tracker.update(&zones, &probe(Vec3::new(5.0, 0.0, 0.0))),
            ZoneChange::Switched { from: 0, to: 1 }
        );
        assert_eq!(tracker.update(&zones, &probe(Vec3::new(20.0, 0.0, 0.0))), ZoneChange::Left(1));
        assert_eq!(tracker.active(), None);
        assert!(tracker.active_zone(&zones).is_none());
    }

    #[test]
    fn test_tracker_clear() {
        let zones = vec![zone("sedan", Vec3::ZERO)];
        let mut tracker = ZoneTracker::default();
        tracker.update(&zones, &probe(Vec3::ZERO));
        tracker.clear();
        assert_eq!(tracker.active(), None);
        // Still inside, so the next update re-enters.
        assert_eq!(tracker.update(&zones, &probe(Vec3::ZERO)), ZoneChange::Entered(0));
    }

    #[test]
    fn test_view_region() {
        let region = ViewRegion {
            bounds: Aabb::from_corners(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 5.0, 10.0)),
        };
        assert_eq!(region.mode_for(&probe(Vec3::ZERO)), ViewMode::TopDown);
        assert_eq!(region.mode_for(&probe(Vec3::new(30.0, 0.0, 0.0))), ViewMode::Chase);
    }

    proptest! {
        #[test]
        fn prop_active_zone_is_first_overlap(
            centers in proptest::collection::vec((-10.0f32..10.0, -10.0f32..10.0), 1..8),
            path in proptest::collection::vec((-12.0f32..12.0, -12.0f32..12.0), 1..40),
        ) {
            let zones: Vec<TriggerZone> = centers
                .iter()
                .enumerate()
                .map(|(i, (x, z))| zone(&format!("car{i}"), Vec3::new(*x, 0.0, *z)))
                .collect();
            let mut tracker = ZoneTracker::default();

            for (x, z) in path {
                let bounds = probe(Vec3::new(x, 0.0, z));
                tracker.update(&zones, &bounds);
                let expected = zones.iter().position(|zone| zone.bounds.intersects(&bounds));
                prop_assert_eq!(tracker.active(), expected);
            }
        }
    }
}
