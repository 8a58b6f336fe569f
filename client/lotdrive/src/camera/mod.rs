//! Camera that follows the active car.
//!
//! ## Camera mode state machine
//!
//! Mode changes go through `CameraModeTransitions` requests so the switch is
//! logged and applied in one place.
//!
//! ### States
//!
//! - **Chase**: third-person camera behind the car.
//! - **TopDown**: overhead camera above the parking lot, used while the car is
//!   inside the lot's overview region.
//!
//! ```text
//! Chase <-> TopDown
//! ```

mod follow;

use bevy::prelude::*;
use lotdrive_core::ViewMode;

use crate::AppSet;

use follow::{FollowCameraConfig, TopDownCameraConfig};

/// Marker for the scene camera.
#[derive(Component)]
pub struct GameCamera;

/// Camera mode state.
#[derive(Resource, Default)]
pub struct CameraModeState {
    /// Current camera mode.
    current: ViewMode,
}

impl CameraModeState {
    /// Get the current camera mode.
    pub fn current(&self) -> ViewMode {
        self.current
    }

    /// Check if the current mode is Chase.
    pub fn is_chase(&self) -> bool {
        self.current == ViewMode::Chase
    }

    /// Check if the current mode is TopDown.
    pub fn is_top_down(&self) -> bool {
        self.current == ViewMode::TopDown
    }
}

/// Camera mode transition requests.
///
/// Use the methods on this resource to request mode transitions; the
/// transition system applies them in order.
#[derive(Resource, Default)]
pub struct CameraModeTransitions {
    /// Pending transitions to process.
    pending: Vec<ViewMode>,
}

impl CameraModeTransitions {
    /// Request transition to the given mode.
    pub fn request(&mut self, mode: ViewMode) {
        self.pending.push(mode);
    }

    /// Take all pending transitions for processing.
    fn take(&mut self) -> Vec<ViewMode> {
        std::mem::take(&mut self.pending)
    }
}

/// Plugin for the camera and its mode management.
pub struct CameraControllerPlugin;

impl Plugin for CameraControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraModeState>()
            .init_resource::<CameraModeTransitions>()
            .init_resource::<FollowCameraConfig>()
            .init_resource::<TopDownCameraConfig>()
            .add_plugins(follow::FollowCameraPlugin)
            .add_systems(Update, process_mode_transitions.in_set(AppSet::Camera));
    }
}

/// Apply pending mode transitions.
fn process_mode_transitions(
    mut transitions: ResMut<CameraModeTransitions>,
    mut state: ResMut<CameraModeState>,
) {
    for mode in transitions.take() {
        if apply_transition(&mut state, mode) {
            tracing::info!("Transitioned to {mode:?} camera");
        }
    }
}

/// Switch `state` to `mode`, returning whether anything changed.
fn apply_transition(state: &mut CameraModeState, mode: ViewMode) -> bool {
    if state.current == mode {
        return false;
    }
    state.current = mode;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_apply_in_order() {
        let mut transitions = CameraModeTransitions::default();
        transitions.request(ViewMode::TopDown);
        transitions.request(ViewMode::Chase);
        transitions.request(ViewMode::TopDown);

        let mut state = CameraModeState::default();
        assert!(state.is_chase());

        let changes: Vec<bool> = transitions
            .take()
            .into_iter()
            .map(|mode| apply_transition(&mut state, mode))
            .collect();
        assert_eq!(changes, vec![true, true, true]);
        assert!(state.is_top_down());
        assert!(transitions.take().is_empty());
    }

    #[test]
    fn test_repeated_request_is_a_no_op() {
        let mut state = CameraModeState::default();
        assert!(!apply_transition(&mut state, ViewMode::Chase));
        assert!(apply_transition(&mut state, ViewMode::TopDown));
        assert!(!apply_transition(&mut state, ViewMode::TopDown));
        assert_eq!(state.current(), ViewMode::TopDown);
    }
}
