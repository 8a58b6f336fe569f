//! The fixed parking lot arrangement.

use std::f32::consts::PI;

use glam::Vec3;

use crate::{
    bounds::Aabb,
    kinematics::DriveState,
    zones::{TriggerZone, ViewRegion},
};

/// Spawn point, camera region, trigger zones and scenery placement.
#[derive(Clone, Debug, PartialEq)]
pub struct LotLayout {
    /// Ground point the player's car returns to on spawn and reset.
    pub spawn: Vec3,
    /// Heading at spawn.
    pub spawn_yaw: f32,
    /// Height above `spawn` the car is dropped from.
    pub drop_height: f32,
    /// Region that switches the camera to top-down.
    pub overview: ViewRegion,
    /// Parking slots, tested in order.
    pub zones: Vec<TriggerZone>,
    /// Heading of the parked display cars.
    pub parked_yaw: f32,
    /// Placement of the parking lot model.
    pub lot_position: Vec3,
    pub lot_scale: f32,
    /// Half extents of a car's collision box (x right, y up, z forward).
    pub vehicle_half_extents: Vec3,
}

/// Cars parked in the lot, left to right.
const PARKED_CARS: [&str; 4] = ["sedan", "suv", "pickup", "coupe"];
/// Spacing between parking slots along x.
const SLOT_SPACING: f32 = 8.0;
/// Distance of the slot row from the spawn point along z.
const SLOT_ROW_Z: f32 = 30.0;
/// Half extents of a parking slot trigger box.
const SLOT_HALF_EXTENTS: Vec3 = Vec3::new(2.0, 1.5, 3.25);

impl Default for LotLayout {
    #[allow(clippy::cast_precision_loss)]
    fn default() -> Self {
        let first_x = -SLOT_SPACING * (PARKED_CARS.len() as f32 - 1.0) / 2.0;
        let zones = PARKED_CARS
            .iter()
            .enumerate()
            .map(|(i, car)| {
                let center = Vec3::new(
                    first_x + SLOT_SPACING * i as f32,
                    SLOT_HALF_EXTENTS.y,
                    SLOT_ROW_Z,
                );
                TriggerZone::new(*car, Aabb::from_center_half_extents(center, SLOT_HALF_EXTENTS))
            })
            .collect();

        Self {
            spawn: Vec3::ZERO,
            spawn_yaw: 0.0,
            drop_height: 10.0,
            overview: ViewRegion {
                bounds: Aabb::from_corners(Vec3::new(-20.0, -1.0, 18.0), Vec3::new(20.0, 12.0, 42.0)),
            },
            zones,
            parked_yaw: PI,
            lot_position: Vec3::new(1.0, 0.0, 1.0),
            lot_scale: 4.0,
            vehicle_half_extents: Vec3::new(1.0, 0.75, 2.2),
        }
    }
}

impl LotLayout {
    /// Where a spawned car starts its drop-in.
    #[must_use]
    pub fn spawn_position(&self) -> Vec3 {
        self.spawn + Vec3::Y * self.drop_height
    }

    /// Fresh state for a car starting its drop-in at the spawn point.
    #[must_use]
    pub fn spawn_state(&self) -> DriveState {
        DriveState::spawn(self.spawn_position(), self.spawn_yaw)
    }

    /// Ground point of a parking slot, for placing the parked display car.
    #[must_use]
    pub fn slot_position(&self, index: usize) -> Option<Vec3> {
        self.zones.get(index).map(|zone| {
            let center = zone.bounds.center();
            Vec3::new(center.x, zone.bounds.min.y, center.z)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bounds::vehicle_bounds, zones::first_overlap};

    #[test]
    fn test_default_zones_do_not_overlap() {
        let layout = LotLayout::default();
        for (i, a) in layout.zones.iter().enumerate() {
            for b in layout.zones.iter().skip(i + 1) {
                assert!(!a.bounds.intersects(&b.bounds), "{} overlaps {}", a.car, b.car);
            }
        }
    }

    #[test]
    fn test_spawn_is_clear_of_zones_and_overview() {
        let layout = LotLayout::default();
        let bounds = vehicle_bounds(layout.spawn, layout.spawn_yaw, layout.vehicle_half_extents);
        assert_eq!(first_overlap(&layout.zones, &bounds), None);
        assert!(!layout.overview.bounds.intersects(&bounds));
    }

    #[test]
    fn test_zones_sit_inside_overview() {
        let layout = LotLayout::default();
        for zone in &layout.zones {
            assert!(layout.overview.bounds.contains_point(zone.bounds.center()));
        }
    }

    #[test]
    fn test_spawn_state_is_airborne() {
        let layout = LotLayout::default();
        let state = layout.spawn_state();
        assert!(!state.grounded);
        assert_eq!(state.position, Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_slot_position_on_ground() {
        let layout = LotLayout::default();
        let slot = layout.slot_position(0).unwrap();
        assert_eq!(slot.y, 0.0);
        assert_eq!(slot.z, SLOT_ROW_Z);
        assert!(layout.slot_position(layout.zones.len()).is_none());
    }
}
