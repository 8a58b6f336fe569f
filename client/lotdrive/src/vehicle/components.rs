//! Vehicle component definitions.

use bevy::{gltf::Gltf, prelude::*};
use lotdrive_core::{DriveInput, DriveState, KinematicsParams, StepReport, wheels::WheelPosition};

/// A drivable car.
#[derive(Component, Clone, Debug)]
#[require(CarInput, Transform, Visibility)]
pub struct Car {
    /// Car name; also its model file stem and spec row key.
    pub name: String,
    /// Collision box half extents in car-local space (x right, y up, z forward).
    pub half_extents: Vec3,
}

/// Kinematic constants and state, advanced once per fixed tick.
#[derive(Component, Clone, Debug)]
pub struct CarKinematics {
    pub params: KinematicsParams,
    pub state: DriveState,
    /// Report from the most recent tick.
    pub last_report: StepReport,
    /// Ticks since spawn or reset.
    pub ticks: u32,
}

impl CarKinematics {
    pub fn new(params: KinematicsParams, state: DriveState) -> Self {
        Self {
            params,
            state,
            last_report: StepReport::default(),
            ticks: 0,
        }
    }
}

/// Input state captured each frame and consumed by the fixed tick.
#[derive(Component, Default, Debug)]
pub struct CarInput {
    /// Held keys. `jump` is unused here; see `jump_latched`.
    pub keys: DriveInput,
    /// Jump pressed since the last fixed tick.
    pub jump_latched: bool,
}

impl CarInput {
    /// Input for the next tick, consuming any latched jump.
    pub fn take_tick_input(&mut self) -> DriveInput {
        DriveInput {
            jump: std::mem::take(&mut self.jump_latched),
            ..self.keys
        }
    }
}

/// A wheel node inside a car model.
#[derive(Component, Debug)]
pub struct Wheel {
    pub position: WheelPosition,
    /// Rotation the node had in the model, before spin and steering.
    pub base_rotation: Quat,
}

/// The car's model is still loading.
#[derive(Component, Debug)]
pub struct PendingModel {
    /// Root glTF handle, watched for load failures.
    pub gltf: Handle<Gltf>,
}

/// Spec-derived constants have been applied (or there was no row to apply).
#[derive(Component, Debug)]
pub struct SpecApplied;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_latch_is_consumed_once() {
        let mut input = CarInput {
            keys: DriveInput {
                forward: true,
                ..DriveInput::default()
            },
            jump_latched: true,
        };

        let first = input.take_tick_input();
        assert!(first.jump);
        assert!(first.forward);

        let second = input.take_tick_input();
        assert!(!second.jump);
        assert!(second.forward);
    }

    #[test]
    fn test_held_jump_key_does_not_leak() {
        let mut input = CarInput {
            keys: DriveInput {
                jump: true,
                ..DriveInput::default()
            },
            jump_latched: false,
        };
        assert!(!input.take_tick_input().jump);
    }
}
