//! Chase and top-down camera systems.

use bevy::prelude::*;

use crate::{AppSet, scene::Lot, vehicle::ActiveCar};

use super::{CameraModeState, GameCamera};

// ============================================================================
// Plugin
// ============================================================================

/// Plugin for the per-mode camera systems.
pub(super) struct FollowCameraPlugin;

impl Plugin for FollowCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                chase_camera_system.run_if(is_chase_mode),
                top_down_camera_system.run_if(is_top_down_mode),
            )
                .in_set(AppSet::Camera)
                .after(super::process_mode_transitions),
        );
    }
}

/// Run condition: Chase mode is active.
fn is_chase_mode(state: Res<CameraModeState>) -> bool {
    state.is_chase()
}

/// Run condition: TopDown mode is active.
fn is_top_down_mode(state: Res<CameraModeState>) -> bool {
    state.is_top_down()
}

// ============================================================================
// Configuration
// ============================================================================

/// Chase camera placement behind the active car.
#[derive(Resource, Clone)]
pub struct FollowCameraConfig {
    /// Camera position offset in car-local space (x=right, y=up, z=forward).
    pub camera_offset: Vec3,
    /// Look-at target offset in car-local space.
    pub look_target_offset: Vec3,
    /// How quickly the camera catches up, per second.
    pub smoothing: f32,
}

impl Default for FollowCameraConfig {
    fn default() -> Self {
        Self {
            camera_offset: Vec3::new(0.0, 3.5, -9.0),
            look_target_offset: Vec3::new(0.0, 1.2, 4.0),
            smoothing: 6.0,
        }
    }
}

/// Overhead camera placement.
#[derive(Resource, Clone)]
pub struct TopDownCameraConfig {
    /// Height above the overview region's floor.
    pub height: f32,
    /// How far the camera leans toward the car from the region center, 0 to 1.
    pub track_car: f32,
    /// How quickly the camera catches up, per second.
    pub smoothing: f32,
}

impl Default for TopDownCameraConfig {
    fn default() -> Self {
        Self {
            height: 40.0,
            track_car: 0.35,
            smoothing: 3.0,
        }
    }
}

/// Desired camera position and look-at point for a car transform.
fn chase_pose(target: &Transform, config: &FollowCameraConfig) -> (Vec3, Vec3) {
    // Only yaw the offsets; the car's height comes from its translation.
    let position = target.translation + target.rotation * config.camera_offset;
    let look_target = target.translation + target.rotation * config.look_target_offset;
    (position, look_target)
}

/// Fraction of the remaining distance to cover this frame.
fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate.max(0.0) * dt).exp()
}

// ============================================================================
// Camera systems
// ============================================================================

/// Camera follows the active car in third-person view.
///
/// Positions the camera behind and above the car, looking just ahead of it.
fn chase_camera_system(
    time: Res<Time>,
    active: Res<ActiveCar>,
    config: Res<FollowCameraConfig>,
    mut camera: Single<&mut Transform, With<GameCamera>>,
    target_query: Query<&Transform, Without<GameCamera>>,
) {
    let Some(target) = active.entity else {
        return;
    };
    let Ok(target_transform) = target_query.get(target) else {
        return;
    };

    let (desired, look_target) = chase_pose(target_transform, &config);
    let t = smoothing_factor(config.smoothing, time.delta_secs());
    camera.translation = camera.translation.lerp(desired, t);
    camera.look_at(look_target, Vec3::Y);
}

/// Camera hovers above the lot, leaning toward the car.
fn top_down_camera_system(
    time: Res<Time>,
    active: Res<ActiveCar>,
    lot: Res<Lot>,
    config: Res<TopDownCameraConfig>,
    mut camera: Single<&mut Transform, With<GameCamera>>,
    target_query: Query<&Transform, Without<GameCamera>>,
) {
    let region = lot.overview.bounds;
    let center = region.center();

    let focus = active
        .entity
        .and_then(|entity| target_query.get(entity).ok())
        .map_or(center, |target| {
            center.lerp(target.translation, config.track_car.clamp(0.0, 1.0))
        });

    let desired = Vec3::new(focus.x, region.min.y + config.height, focus.z);
    let t = smoothing_factor(config.smoothing, time.delta_secs());
    camera.translation = camera.translation.lerp(desired, t);

    // Straight down, with +Z (lot north) at the top of the screen.
    let eye = camera.translation;
    camera.look_at(eye - Vec3::Y, Vec3::Z);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_chase_pose_follows_car_yaw() {
        let config = FollowCameraConfig::default();
        let straight = Transform::from_xyz(5.0, 2.0, -3.0);
        let (position, look_target) = chase_pose(&straight, &config);
        assert!((position - Vec3::new(5.0, 5.5, -12.0)).length() < 1e-5);
        assert!((look_target - Vec3::new(5.0, 3.2, 1.0)).length() < 1e-5);

        // Facing +X, the camera sits behind on -X.
        let turned = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
        let (position, look_target) = chase_pose(&turned, &config);
        assert!((position - Vec3::new(-9.0, 3.5, 0.0)).length() < 1e-5);
        assert!((look_target - Vec3::new(4.0, 1.2, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_smoothing_factor() {
        assert_eq!(smoothing_factor(5.0, 0.0), 0.0);
        let half = smoothing_factor(2.0_f32.ln(), 1.0);
        assert!((half - 0.5).abs() < 1e-6);
        assert!(smoothing_factor(100.0, 1.0) > 0.99);
        // Negative rates never push the camera away.
        assert_eq!(smoothing_factor(-1.0, 1.0), 0.0);
    }
}
