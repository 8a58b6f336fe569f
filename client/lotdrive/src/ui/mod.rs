//! egui overlay: HUD gauges, zone prompt, spec sheet window and debug window.

mod diagnostics;
mod hud;
mod popup;

use bevy::{diagnostic::FrameTimeDiagnosticsPlugin, prelude::*};
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use leafwing_input_manager::prelude::*;

use crate::input::AppAction;

/// Whether the speedometer, compass and coordinates are shown.
#[derive(Resource)]
pub struct HudVisible(pub bool);

impl Default for HudVisible {
    fn default() -> Self {
        Self(true)
    }
}

/// Whether the spec sheet window is shown.
#[derive(Resource, Default)]
pub struct InfoVisible(pub bool);

/// Whether the debug window is shown.
#[derive(Resource, Default)]
pub struct DebugVisible(pub bool);

/// Plugin for the egui overlay.
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default())
            .add_plugins(FrameTimeDiagnosticsPlugin::default())
            .init_resource::<HudVisible>()
            .init_resource::<InfoVisible>()
            .init_resource::<DebugVisible>()
            .init_resource::<diagnostics::SpeedHistory>()
            .add_systems(Update, toggle_windows)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    hud::hud_system.run_if(|visible: Res<HudVisible>| visible.0),
                    popup::zone_prompt_system,
                    popup::info_window_system.run_if(|visible: Res<InfoVisible>| visible.0),
                    diagnostics::debug_window_system
                        .run_if(|visible: Res<DebugVisible>| visible.0),
                ),
            );
    }
}

/// Toggle overlay windows from their keys.
fn toggle_windows(
    action_query: Query<&ActionState<AppAction>>,
    mut hud: ResMut<HudVisible>,
    mut info: ResMut<InfoVisible>,
    mut debug: ResMut<DebugVisible>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    if action_state.just_pressed(&AppAction::ToggleHud) {
        hud.0 = !hud.0;
    }
    if action_state.just_pressed(&AppAction::ToggleInfo) {
        info.0 = !info.0;
    }
    if action_state.just_pressed(&AppAction::ToggleDebug) {
        debug.0 = !debug.0;
    }
}
