//! Arcade parking lot driving demo using Bevy.
//!
//! Drive a car around a parking lot, pull up next to a parked car and swap
//! into it. Handling comes from a CSV spec sheet; the camera switches to an
//! overhead view while the car is inside the lot.

mod camera;
mod input;
mod launch_params;
mod scene;
mod specs;
mod ui;
mod vehicle;
mod zones;

use bevy::prelude::*;
use camera::CameraControllerPlugin;
use input::InputPlugin;
use scene::ScenePlugin;
use specs::SpecsPlugin;
use ui::HudPlugin;
use vehicle::VehiclePlugin;
use zones::ZonesPlugin;

/// Per-frame ordering of the game systems in `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppSet {
    /// Read actions into requests and car input.
    Input,
    /// Swaps, resets, model loading and wheels.
    Vehicle,
    /// Zone membership and camera mode requests.
    Zones,
    /// Camera placement.
    Camera,
}

/// Plugin for the main application.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(launch_params::parse())
            .configure_sets(
                Update,
                (AppSet::Input, AppSet::Vehicle, AppSet::Zones, AppSet::Camera).chain(),
            )
            .add_plugins((
                InputPlugin,
                ScenePlugin,
                SpecsPlugin,
                VehiclePlugin,
                ZonesPlugin,
                CameraControllerPlugin,
                HudPlugin,
            ));
    }
}

fn main() {
    // Initialize tracing for native platforms.
    #[cfg(not(target_family = "wasm"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Initialize tracing for WASM (logs to browser console).
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let mut app = App::new();

    #[allow(unused_mut)]
    let mut window = Window {
        title: "lotdrive".to_string(),
        resolution: (1280, 720).into(),
        position: WindowPosition::Centered(MonitorSelection::Primary),
        ..Default::default()
    };

    // WASM: Fit canvas to parent element and prevent browser event handling.
    #[cfg(target_family = "wasm")]
    {
        window.fit_canvas_to_parent = true;
        window.prevent_default_event_handling = true;
    }

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(window),
        ..Default::default()
    }));

    app.add_plugins(AppPlugin).run();
}
