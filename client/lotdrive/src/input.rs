//! Centralized input action definitions and management.
//!
//! Defines all gameplay actions using `leafwing-input-manager` for declarative,
//! rebindable input mapping. A single player entity carries both input maps,
//! and one system disables them while egui has keyboard focus.

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

// ============================================================================
// Action enums
// ============================================================================

/// Actions that drive the car.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum DriveAction {
    /// Drive input (WASD or arrows: throttle on Y, steering on X).
    #[actionlike(DualAxis)]
    Drive,
    /// Jump (Space).
    Jump,
}

/// Actions outside of driving.
#[derive(Actionlike, PartialEq, Eq, Hash, Clone, Copy, Debug, Reflect)]
pub enum AppAction {
    /// Return the car to the spawn point (R).
    Reset,
    /// Toggle the spec sheet window (I).
    ToggleInfo,
    /// Swap to the car parked in the current zone (F).
    SwapCar,
    /// Toggle the HUD (H).
    ToggleHud,
    /// Toggle the debug window (Q).
    ToggleDebug,
}

// ============================================================================
// Input maps
// ============================================================================

/// Create the default input map for driving.
pub fn default_drive_input_map() -> InputMap<DriveAction> {
    InputMap::default()
        .with_dual_axis(DriveAction::Drive, VirtualDPad::wasd())
        .with_dual_axis(DriveAction::Drive, VirtualDPad::arrow_keys())
        .with(DriveAction::Jump, KeyCode::Space)
}

/// Create the default input map for app actions.
pub fn default_app_input_map() -> InputMap<AppAction> {
    InputMap::default()
        .with(AppAction::Reset, KeyCode::KeyR)
        .with(AppAction::ToggleInfo, KeyCode::KeyI)
        .with(AppAction::SwapCar, KeyCode::KeyF)
        .with(AppAction::ToggleHud, KeyCode::KeyH)
        .with(AppAction::ToggleDebug, KeyCode::KeyQ)
}

// ============================================================================
// Plugin
// ============================================================================

/// Marker for the entity holding the player's input maps.
#[derive(Component)]
pub struct PlayerInput;

/// Plugin that registers input action types and the input focus management system.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<DriveAction>::default())
            .add_plugins(InputManagerPlugin::<AppAction>::default())
            .add_systems(Startup, spawn_player_input)
            .add_systems(
                PreUpdate,
                manage_input_focus.after(InputManagerSystem::Update),
            );
    }
}

fn spawn_player_input(mut commands: Commands) {
    commands.spawn((
        Name::new("Player input"),
        PlayerInput,
        default_drive_input_map(),
        default_app_input_map(),
    ));
}

// ============================================================================
// Input focus management
// ============================================================================

/// Disable keyboard gameplay while egui wants keyboard input.
///
/// `ToggleDebug` is always kept enabled so the debug window can be closed
/// from the keyboard.
fn manage_input_focus(
    mut drive_query: Query<&mut ActionState<DriveAction>>,
    mut app_query: Query<&mut ActionState<AppAction>>,
    mut contexts: EguiContexts,
) {
    let egui_wants_kb = contexts
        .ctx_mut()
        .ok()
        .is_some_and(|ctx| ctx.wants_keyboard_input());

    for mut action_state in &mut drive_query {
        if egui_wants_kb {
            action_state.disable_all_actions();
        } else {
            action_state.enable_all_actions();
        }
    }

    for mut action_state in &mut app_query {
        if egui_wants_kb {
            action_state.disable_all_actions();
            action_state.enable_action(&AppAction::ToggleDebug);
        } else {
            action_state.enable_all_actions();
        }
    }
}
