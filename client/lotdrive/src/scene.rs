//! Static scenery: sky, sun, ground, the parking lot and its parked cars.

use bevy::{light::CascadeShadowConfigBuilder, prelude::*};
use lotdrive_core::{LotLayout, model_path};

use crate::{camera::GameCamera, launch_params::LaunchParams};

/// Parking lot model, relative to the assets folder.
const PARKING_LOT_MODEL: &str = "parking_lot.glb";
/// Side length of the square ground plane in meters.
const GROUND_SIZE: f32 = 400.0;
/// Clear color standing in for the sky.
const SKY_COLOR: Color = Color::srgb(0.53, 0.81, 0.92);

/// The lot arrangement shared by spawning, zones and cameras.
#[derive(Resource, Deref, Debug)]
pub struct Lot(pub LotLayout);

/// A display car standing in a trigger zone.
#[derive(Component, Debug)]
pub struct ParkedCar {
    /// Index of the zone it stands in.
    pub zone: usize,
}

/// Plugin for the static scene.
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(SKY_COLOR))
            .add_systems(PreStartup, insert_lot)
            .add_systems(Startup, (setup_scene, spawn_parked_cars));
    }
}

/// Build the lot layout, applying launch overrides.
fn insert_lot(mut commands: Commands, params: Res<LaunchParams>) {
    let layout = LotLayout {
        drop_height: params.drop_height,
        ..LotLayout::default()
    };
    commands.insert_resource(Lot(layout));
}

/// Set up camera, lighting, ground and the parking lot model.
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    lot: Res<Lot>,
) {
    // Start behind the spawn point; the chase camera takes over once a car exists.
    let eye = lot.spawn_position() + Vec3::new(0.0, 4.0, -12.0);
    commands.spawn((
        Name::new("Camera"),
        GameCamera,
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 2_000.0,
            ..Default::default()
        }),
        Transform::from_translation(eye).looking_at(lot.spawn, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            color: Color::WHITE,
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        CascadeShadowConfigBuilder {
            maximum_distance: 150.0,
            ..default()
        }
        .build(),
    ));

    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.36, 0.52, 0.30),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::from_translation(Vec3::Y * lot.0.spawn.y),
    ));

    commands.spawn((
        Name::new("Parking lot"),
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(PARKING_LOT_MODEL))),
        Transform::from_translation(lot.lot_position).with_scale(Vec3::splat(lot.lot_scale)),
    ));

    tracing::info!("Scene setup complete - WASD/arrows to drive, Space to jump, F to swap cars");
}

/// Place a display car in every trigger zone.
fn spawn_parked_cars(mut commands: Commands, asset_server: Res<AssetServer>, lot: Res<Lot>) {
    for (index, zone) in lot.zones.iter().enumerate() {
        let Some(position) = lot.slot_position(index) else {
            continue;
        };
        commands.spawn((
            Name::new(format!("Parked {}", zone.car)),
            ParkedCar { zone: index },
            SceneRoot(
                asset_server.load(GltfAssetLabel::Scene(0).from_asset(model_path(&zone.car))),
            ),
            Transform::from_translation(position)
                .with_rotation(Quat::from_rotation_y(lot.parked_yaw)),
        ));
    }
    tracing::info!("Parked {} display cars", lot.zones.len());
}
