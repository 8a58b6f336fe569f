//! Player car system.
//!
//! A car is a single entity carrying its kinematic state and a glTF scene.
//! Input is captured every frame and consumed by the fixed 60 Hz tick, which
//! steps the kinematics from `lotdrive-core` and writes the result back to the
//! transform. Swapping cars despawns the current entity and spawns a new one
//! at the drop-in point; wheels are rediscovered once the new scene is ready.

mod components;

use bevy::{asset::LoadState, gltf::Gltf, prelude::*, scene::SceneInstanceReady};
use leafwing_input_manager::prelude::*;
use lotdrive::vehicle::telemetry::{
    TelemetrySnapshot, emit_telemetry, reset_telemetry,
};
use lotdrive_core::{
    DriveInput, KinematicsParams, TICK_HZ, model_path, step,
    wheels::{WheelPosition, classify_wheel},
};

pub use components::{Car, CarInput, CarKinematics, PendingModel, SpecApplied, Wheel};

use crate::{
    AppSet,
    input::{AppAction, DriveAction},
    launch_params::LaunchParams,
    scene::{Lot, ParkedCar},
    specs::{VehicleCatalog, VehicleSpecSheet},
    zones::ZoneState,
};

/// Stick deflection that counts as a held key.
const AXIS_THRESHOLD: f32 = 0.5;
/// Visual wheel turn at full steering lock, in radians.
const MAX_WHEEL_TURN: f32 = 0.5;

/// Plugin for car functionality.
pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .init_resource::<ActiveCar>()
            .init_resource::<CarActions>()
            .add_systems(PreStartup, insert_vehicle_settings)
            .add_systems(Startup, request_initial_car)
            .add_systems(
                FixedUpdate,
                (step_car_kinematics, sync_car_transform).chain(),
            )
            .add_systems(
                Update,
                (
                    (capture_car_input, request_car_actions).in_set(AppSet::Input),
                    (
                        process_car_actions,
                        watch_model_loads,
                        apply_pending_specs,
                        animate_wheels,
                        sync_parked_visibility.run_if(resource_changed::<ActiveCar>),
                    )
                        .chain()
                        .in_set(AppSet::Vehicle),
                ),
            )
            .add_observer(on_car_scene_ready);
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Constants every car starts from before its spec row is applied.
#[derive(Resource, Clone, Debug)]
pub struct BaseKinematics(pub KinematicsParams);

/// Whether per-tick telemetry is written to disk.
#[derive(Resource, Debug)]
pub struct CarTelemetry {
    pub enabled: bool,
}

/// The car currently under player control.
#[derive(Resource, Default, Debug)]
pub struct ActiveCar {
    pub entity: Option<Entity>,
    name: Option<String>,
}

impl ActiveCar {
    /// Name of the active car, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set(&mut self, entity: Entity, name: &str) {
        self.entity = Some(entity);
        self.name = Some(name.to_owned());
    }

    fn clear(&mut self) {
        self.entity = None;
        self.name = None;
    }
}

/// Pending car actions (swap/reset).
#[derive(Resource, Default)]
pub struct CarActions {
    /// Car to swap to (None = no pending swap).
    swap_to: Option<String>,
    /// Whether to return the current car to the spawn point.
    reset: bool,
}

impl CarActions {
    /// Request to replace the current car with `name`.
    pub fn request_swap(&mut self, name: impl Into<String>) {
        self.swap_to = Some(name.into());
    }

    /// Request to return the current car to the spawn point.
    pub fn request_reset(&mut self) {
        self.reset = true;
    }
}

fn insert_vehicle_settings(mut commands: Commands, params: Res<LaunchParams>) {
    commands.insert_resource(BaseKinematics(KinematicsParams {
        yaw_mode: params.steering.into(),
        ..KinematicsParams::default()
    }));
    commands.insert_resource(CarTelemetry {
        enabled: params.telemetry,
    });
}

fn request_initial_car(params: Res<LaunchParams>, mut actions: ResMut<CarActions>) {
    actions.request_swap(params.car.clone());
}

// ============================================================================
// Input
// ============================================================================

/// Map the drive axis onto discrete key flags.
fn drive_keys(axis: Vec2) -> DriveInput {
    DriveInput {
        forward: axis.y > AXIS_THRESHOLD,
        reverse: axis.y < -AXIS_THRESHOLD,
        left: axis.x < -AXIS_THRESHOLD,
        right: axis.x > AXIS_THRESHOLD,
        jump: false,
    }
}

/// Capture drive input for the active car.
fn capture_car_input(
    action_query: Query<&ActionState<DriveAction>>,
    active: Res<ActiveCar>,
    mut inputs: Query<&mut CarInput>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };
    let Some(entity) = active.entity else {
        return;
    };
    let Ok(mut input) = inputs.get_mut(entity) else {
        return;
    };

    input.keys = drive_keys(action_state.clamped_axis_pair(&DriveAction::Drive));
    // Latched until the next fixed tick so short presses are not lost.
    if action_state.just_pressed(&DriveAction::Jump) {
        input.jump_latched = true;
    }
}

/// Turn reset and swap key presses into requests.
fn request_car_actions(
    action_query: Query<&ActionState<AppAction>>,
    zones: Res<ZoneState>,
    lot: Res<Lot>,
    mut actions: ResMut<CarActions>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&AppAction::Reset) {
        actions.request_reset();
    }

    if action_state.just_pressed(&AppAction::SwapCar) {
        if let Some(zone) = zones.tracker.active_zone(&lot.zones) {
            actions.request_swap(zone.car.clone());
        } else {
            tracing::info!("No car nearby to swap to");
        }
    }
}

// ============================================================================
// Spawning and swapping
// ============================================================================

/// Process pending swap/reset requests.
#[allow(clippy::too_many_arguments)]
fn process_car_actions(
    mut commands: Commands,
    mut actions: ResMut<CarActions>,
    mut active: ResMut<ActiveCar>,
    lot: Res<Lot>,
    base: Res<BaseKinematics>,
    telemetry: Res<CarTelemetry>,
    catalog: Res<VehicleCatalog>,
    sheets: Res<Assets<VehicleSpecSheet>>,
    asset_server: Res<AssetServer>,
    mut cars: Query<&mut CarKinematics>,
) {
    if let Some(name) = actions.swap_to.take() {
        let table = catalog.table(&sheets);
        let spec = table.and_then(|table| table.get(&name));

        if table.is_some() && spec.is_none() {
            tracing::error!(
                "No spec row for '{name}'; keeping {}",
                active.name().unwrap_or("no car")
            );
        } else {
            if let Some(old) = active.entity.take() {
                commands.entity(old).despawn();
            }

            let params = spec.map_or_else(|| base.0.clone(), |spec| spec.derive_params(&base.0));
            let entity = spawn_car(&mut commands, &asset_server, &lot, &name, params);
            if spec.is_some() {
                commands.entity(entity).insert(SpecApplied);
            }
            active.set(entity, &name);

            if telemetry.enabled {
                reset_telemetry();
            }
            tracing::info!("Spawned car '{name}'");
        }
    }

    if std::mem::take(&mut actions.reset) {
        let Some(entity) = active.entity else {
            return;
        };
        if let Ok(mut kinematics) = cars.get_mut(entity) {
            kinematics.state = lot.spawn_state();
            kinematics.ticks = 0;
            tracing::info!("Reset car to spawn point");
        }
    }
}

/// Spawn a car at the drop-in point and start loading its model.
fn spawn_car(
    commands: &mut Commands,
    asset_server: &AssetServer,
    lot: &Lot,
    name: &str,
    params: KinematicsParams,
) -> Entity {
    let state = lot.spawn_state();
    let path = model_path(name);
    let transform =
        Transform::from_translation(state.position).with_rotation(Quat::from_rotation_y(state.yaw));

    commands
        .spawn((
            Name::new(format!("Car {name}")),
            Car {
                name: name.to_owned(),
                half_extents: lot.vehicle_half_extents,
            },
            CarKinematics::new(params, state),
            PendingModel {
                gltf: asset_server.load::<Gltf>(path.clone()),
            },
            SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path))),
            transform,
        ))
        .id()
}

/// Drop cars whose model failed to load.
fn watch_model_loads(
    mut commands: Commands,
    mut active: ResMut<ActiveCar>,
    asset_server: Res<AssetServer>,
    cars: Query<(Entity, &Car, &SceneRoot, &PendingModel)>,
) {
    for (entity, car, scene, pending) in &cars {
        let failure = [
            asset_server.load_state(&pending.gltf),
            asset_server.load_state(&scene.0),
        ]
        .into_iter()
        .find_map(|state| match state {
            LoadState::Failed(err) => Some(err),
            _ => None,
        });

        if let Some(err) = failure {
            tracing::error!("Failed to load model for '{}': {err}", car.name);
            commands.entity(entity).despawn();
            if active.entity == Some(entity) {
                active.clear();
            }
        }
    }
}

/// Apply spec rows to cars spawned before the sheet was available.
fn apply_pending_specs(
    mut commands: Commands,
    catalog: Res<VehicleCatalog>,
    sheets: Res<Assets<VehicleSpecSheet>>,
    asset_server: Res<AssetServer>,
    base: Res<BaseKinematics>,
    mut cars: Query<(Entity, &Car, &mut CarKinematics), Without<SpecApplied>>,
) {
    if cars.is_empty() {
        return;
    }
    let table = catalog.table(&sheets);
    if table.is_none() && !catalog.is_settled(&asset_server) {
        return;
    }

    for (entity, car, mut kinematics) in &mut cars {
        match table.and_then(|table| table.get(&car.name)) {
            Some(spec) => {
                kinematics.params = spec.derive_params(&base.0);
                tracing::info!(
                    "Applied specs for '{}' (power x{:.2}, steering x{:.2}, drag x{:.2})",
                    car.name,
                    spec.power_factor(),
                    spec.steering_factor(),
                    spec.drag_factor()
                );
            }
            None => {
                tracing::warn!("No spec row for '{}'; using base handling", car.name);
            }
        }
        commands.entity(entity).insert(SpecApplied);
    }
}

/// Hide the parked copy of whichever car is being driven.
fn sync_parked_visibility(
    active: Res<ActiveCar>,
    lot: Res<Lot>,
    mut parked: Query<(&ParkedCar, &mut Visibility)>,
) {
    for (parked_car, mut visibility) in &mut parked {
        let driven = lot
            .zones
            .get(parked_car.zone)
            .is_some_and(|zone| active.name() == Some(zone.car.as_str()));
        *visibility = if driven {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}

// ============================================================================
// Model setup
// ============================================================================

/// Observer called when a car's scene finishes spawning.
///
/// Tags wheel nodes so they can be spun and steered.
fn on_car_scene_ready(
    trigger: On<SceneInstanceReady>,
    mut commands: Commands,
    cars: Query<&Car>,
    children: Query<&Children>,
    nodes: Query<(&Name, &Transform)>,
) {
    let entity = trigger.event_target();
    let Ok(car) = cars.get(entity) else {
        return;
    };
    commands.entity(entity).remove::<PendingModel>();

    let (mut front, mut rear) = (0, 0);
    for descendant in children.iter_descendants(entity) {
        let Ok((name, transform)) = nodes.get(descendant) else {
            continue;
        };
        let Some(position) = classify_wheel(name.as_str()) else {
            continue;
        };
        commands.entity(descendant).insert(Wheel {
            position,
            base_rotation: transform.rotation,
        });
        match position {
            WheelPosition::Front => front += 1,
            WheelPosition::Rear => rear += 1,
        }
    }

    if front + rear == 0 {
        tracing::warn!("Model for '{}' has no wheel nodes", car.name);
    } else {
        tracing::info!(
            "Model for '{}' ready ({front} front, {rear} rear wheels)",
            car.name
        );
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Advance every car by one fixed tick.
fn step_car_kinematics(
    telemetry: Res<CarTelemetry>,
    mut cars: Query<(&Car, &mut CarKinematics, &mut CarInput)>,
) {
    for (car, mut kinematics, mut input) in &mut cars {
        let tick_input = input.take_tick_input();
        let kinematics = &mut *kinematics;
        let report = step(&kinematics.params, &mut kinematics.state, &tick_input);

        if report.jumped {
            tracing::debug!("'{}' jumped", car.name);
        }
        if report.landed {
            let p = kinematics.state.position;
            tracing::info!("'{}' landed at ({:.1}, {:.1})", car.name, p.x, p.z);
        }

        if telemetry.enabled {
            emit_telemetry(&TelemetrySnapshot {
                tick: kinematics.ticks,
                input: &tick_input,
                state: &kinematics.state,
                report: &report,
            });
        }

        kinematics.last_report = report;
        kinematics.ticks = kinematics.ticks.saturating_add(1);
    }
}

/// Write kinematic state to transforms.
fn sync_car_transform(mut cars: Query<(&CarKinematics, &mut Transform), With<Car>>) {
    for (kinematics, mut transform) in &mut cars {
        transform.translation = kinematics.state.position;
        transform.rotation = Quat::from_rotation_y(kinematics.state.yaw);
    }
}

/// Spin all wheels and turn the front ones with the steering.
fn animate_wheels(
    cars: Query<&CarKinematics>,
    parents: Query<&ChildOf>,
    mut wheels: Query<(Entity, &Wheel, &mut Transform)>,
) {
    for (entity, wheel, mut transform) in &mut wheels {
        let Some(kinematics) = parents
            .iter_ancestors(entity)
            .find_map(|ancestor| cars.get(ancestor).ok())
        else {
            continue;
        };

        let spin = Quat::from_rotation_x(kinematics.state.wheel_spin);
        transform.rotation = match wheel.position {
            WheelPosition::Front => {
                let turn = steer_fraction(kinematics) * MAX_WHEEL_TURN;
                wheel.base_rotation * Quat::from_rotation_y(turn) * spin
            }
            WheelPosition::Rear => wheel.base_rotation * spin,
        };
    }
}

/// Steering as a fraction of full lock, left positive.
fn steer_fraction(kinematics: &CarKinematics) -> f32 {
    let max = kinematics.params.max_steer.abs();
    if max > 0.0 {
        (kinematics.state.steer / max).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
