//! Trigger zone detection and outlines.
//!
//! Each frame the active car's bounding box is tested against the lot's
//! trigger zones (which car is nearby) and its overview region (which camera
//! to use). Zone boxes are drawn with gizmos.

use bevy::prelude::*;
use lotdrive_core::{Aabb, ZoneChange, ZoneTracker, vehicle_bounds};

use crate::{
    AppSet,
    camera::CameraModeTransitions,
    scene::Lot,
    vehicle::{ActiveCar, Car, CarKinematics},
};

const ZONE_COLOR: Color = Color::srgb(0.2, 0.6, 1.0);
const ACTIVE_ZONE_COLOR: Color = Color::srgb(1.0, 0.85, 0.1);
const OVERVIEW_COLOR: Color = Color::srgb(0.6, 0.6, 0.6);
const VEHICLE_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);

/// Plugin for zone detection.
pub struct ZonesPlugin;

impl Plugin for ZonesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ZoneState>()
            .init_resource::<ShowAllBounds>()
            .add_systems(
                Update,
                (detect_zones, draw_zone_outlines).chain().in_set(AppSet::Zones),
            );
    }
}

/// Which zone the active car is in.
#[derive(Resource, Default, Debug)]
pub struct ZoneState {
    pub tracker: ZoneTracker,
    /// The active car's world box from the last check.
    pub vehicle_bounds: Option<Aabb>,
}

/// Draw every zone, the overview region and the car box, not just the
/// active zone.
#[derive(Resource, Default, Debug)]
pub struct ShowAllBounds(pub bool);

/// Track zone membership and pick the camera mode.
fn detect_zones(
    active: Res<ActiveCar>,
    lot: Res<Lot>,
    mut state: ResMut<ZoneState>,
    mut transitions: ResMut<CameraModeTransitions>,
    cars: Query<(&Car, &CarKinematics)>,
) {
    let Some((car, kinematics)) = active.entity.and_then(|entity| cars.get(entity).ok()) else {
        state.tracker.clear();
        state.vehicle_bounds = None;
        return;
    };

    let bounds = vehicle_bounds(kinematics.state.position, kinematics.state.yaw, car.half_extents);
    state.vehicle_bounds = Some(bounds);

    match state.tracker.update(&lot.zones, &bounds) {
        ZoneChange::Unchanged => {}
        ZoneChange::Entered(index) => {
            tracing::info!("Entered zone for '{}'", lot.zones[index].car);
        }
        ZoneChange::Left(index) => {
            tracing::info!("Left zone for '{}'", lot.zones[index].car);
        }
        ZoneChange::Switched { from, to } => {
            tracing::info!(
                "Moved from zone '{}' to '{}'",
                lot.zones[from].car,
                lot.zones[to].car
            );
        }
    }

    transitions.request(lot.overview.mode_for(&bounds));
}

fn draw_aabb(gizmos: &mut Gizmos, aabb: &Aabb, color: Color) {
    for (a, b) in aabb.edges() {
        gizmos.line(a, b, color);
    }
}

/// Outline the active zone, or everything when debug bounds are on.
fn draw_zone_outlines(
    mut gizmos: Gizmos,
    lot: Res<Lot>,
    state: Res<ZoneState>,
    show_all: Res<ShowAllBounds>,
) {
    let active = state.tracker.active();

    for (index, zone) in lot.zones.iter().enumerate() {
        if active == Some(index) {
            draw_aabb(&mut gizmos, &zone.bounds, ACTIVE_ZONE_COLOR);
        } else if show_all.0 {
            draw_aabb(&mut gizmos, &zone.bounds, ZONE_COLOR);
        }
    }

    if show_all.0 {
        draw_aabb(&mut gizmos, &lot.overview.bounds, OVERVIEW_COLOR);
        if let Some(bounds) = &state.vehicle_bounds {
            draw_aabb(&mut gizmos, bounds, VEHICLE_COLOR);
        }
    }
}
