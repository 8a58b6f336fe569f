//! Arcade vehicle kinematics.
//!
//! The model is deliberately simple: every quantity is a scalar eased toward a
//! key-derived target by a fixed per-tick increment and then clamped. There is
//! no mass, force or friction; the constants in [`KinematicsParams`] are
//! designer-chosen and expressed per tick of [`crate::TICK_HZ`].
//!
//! Conventions: Y is up, yaw is measured around +Y, and a yaw of zero faces
//! +Z. Positive steering turns left.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Below this speed (units per tick) the vehicle counts as stationary.
const MOVING_EPSILON: f32 = 1e-4;

/// How steering is turned into yaw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YawMode {
    /// Yaw advances by the steering angle scaled by the speed ratio.
    #[default]
    SteeringAngle,
    /// Yaw advances by a constant turn rate while moving and a turn key is held.
    TurnRate,
}

/// Tunable constants for the kinematic model, all per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct KinematicsParams {
    /// Top forward speed.
    pub max_forward_speed: f32,
    /// Top reverse speed (negative).
    pub max_reverse_speed: f32,
    /// Speed gained per tick while the throttle pushes in the current direction.
    pub acceleration: f32,
    /// Speed lost per tick while coasting with no throttle.
    pub deceleration: f32,
    /// Speed lost per tick while the throttle opposes the current direction.
    pub braking: f32,
    /// Largest steering angle in either direction.
    pub max_steer: f32,
    /// Steering change per tick while a turn key is held.
    pub steer_rate: f32,
    /// Steering change per tick back toward center with no turn key held.
    pub steer_return: f32,
    /// Yaw change per tick in [`YawMode::TurnRate`].
    pub turn_rate: f32,
    /// Vertical velocity lost per tick.
    pub gravity: f32,
    /// Vertical velocity set by a jump.
    pub jump_impulse: f32,
    /// Height of the ground plane.
    pub ground_level: f32,
    /// Wheel radius used for the cosmetic spin.
    pub wheel_radius: f32,
    /// How steering becomes yaw.
    pub yaw_mode: YawMode,
}

impl Default for KinematicsParams {
    fn default() -> Self {
        Self {
            max_forward_speed: 0.5,
            max_reverse_speed: -0.15,
            acceleration: 0.004,
            deceleration: 0.003,
            braking: 0.012,
            max_steer: 0.035,
            steer_rate: 0.002,
            steer_return: 0.004,
            turn_rate: 0.03,
            gravity: 0.012,
            jump_impulse: 0.25,
            ground_level: 0.0,
            wheel_radius: 0.35,
            yaw_mode: YawMode::SteeringAngle,
        }
    }
}

impl KinematicsParams {
    /// Speed the throttle keys are asking for.
    #[must_use]
    pub fn target_speed(&self, input: &DriveInput) -> f32 {
        match input.throttle() {
            1 => self.max_forward_speed.max(0.0),
            -1 => self.max_reverse_speed.min(0.0),
            _ => 0.0,
        }
    }
}

/// Discrete key state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
    /// Jump requested. Consumed only when grounded.
    pub jump: bool,
}

impl DriveInput {
    /// Throttle direction: 1 forward, -1 reverse, 0 when neither or both are held.
    #[must_use]
    pub fn throttle(&self) -> i8 {
        i8::from(self.forward) - i8::from(self.reverse)
    }

    /// Steering direction: 1 left, -1 right, 0 when neither or both are held.
    #[must_use]
    pub fn steer_direction(&self) -> i8 {
        i8::from(self.left) - i8::from(self.right)
    }
}

/// Mutable vehicle state advanced by [`step`].
#[derive(Clone, Debug, PartialEq)]
pub struct DriveState {
    pub position: Vec3,
    /// Heading around +Y in radians, kept in `[-π, π)`.
    pub yaw: f32,
    /// Signed forward speed per tick.
    pub speed: f32,
    /// Current steering angle.
    pub steer: f32,
    /// Vertical velocity per tick.
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Accumulated wheel rotation (cosmetic).
    pub wheel_spin: f32,
}

impl Default for DriveState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            speed: 0.0,
            steer: 0.0,
            vertical_velocity: 0.0,
            grounded: true,
            wheel_spin: 0.0,
        }
    }
}

impl DriveState {
    /// State for a freshly spawned vehicle: at rest, airborne, ready to drop in.
    #[must_use]
    pub fn spawn(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw: wrap_angle(yaw),
            grounded: false,
            ..Self::default()
        }
    }
}

/// What happened during a tick, for logging and telemetry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    pub target_speed: f32,
    pub target_steer: f32,
    /// A jump started this tick.
    pub jumped: bool,
    /// The vehicle touched down this tick after being airborne.
    pub landed: bool,
}

/// Advance the vehicle by one tick.
pub fn step(params: &KinematicsParams, state: &mut DriveState, input: &DriveInput) -> StepReport {
    let max_forward = params.max_forward_speed.max(0.0);
    let max_reverse = params.max_reverse_speed.min(0.0);

    // Speed.
    let target_speed = params.target_speed(input);
    let speed_rate = if input.throttle() == 0 {
        params.deceleration
    } else if state.speed * target_speed < 0.0 {
        params.braking
    } else {
        params.acceleration
    };
    state.speed = move_toward(state.speed, target_speed, speed_rate).clamp(max_reverse, max_forward);

    // Steering.
    let max_steer = params.max_steer.abs();
    let steer_direction = input.steer_direction();
    let target_steer = f32::from(steer_direction) * max_steer;
    let steer_rate = if steer_direction == 0 {
        params.steer_return
    } else {
        params.steer_rate
    };
    state.steer = move_toward(state.steer, target_steer, steer_rate).clamp(-max_steer, max_steer);

    // Yaw.
    let yaw_delta = match params.yaw_mode {
        YawMode::SteeringAngle => {
            let speed_ratio = if max_forward > 0.0 {
                (state.speed / max_forward).clamp(-1.0, 1.0)
            } else {
                0.0
            };
            state.steer * speed_ratio
        }
        YawMode::TurnRate => {
            if state.speed.abs() > MOVING_EPSILON {
                f32::from(steer_direction) * params.turn_rate * state.speed.signum()
            } else {
                0.0
            }
        }
    };
    state.yaw = wrap_angle(state.yaw + yaw_delta);

    // Horizontal motion.
    state.position += forward_vector(state.yaw) * state.speed;

    // Vertical motion.
    let mut jumped = false;
    if input.jump && state.grounded {
        state.vertical_velocity = params.jump_impulse;
        state.grounded = false;
        jumped = true;
    }

    state.vertical_velocity -= params.gravity;
    state.position.y += state.vertical_velocity;

    let mut landed = false;
    if state.position.y <= params.ground_level {
        landed = !state.grounded;
        state.position.y = params.ground_level;
        state.vertical_velocity = 0.0;
        state.grounded = true;
    } else {
        state.grounded = false;
    }

    state.wheel_spin = wrap_angle(state.wheel_spin + state.speed / params.wheel_radius.max(0.01));

    StepReport {
        target_speed,
        target_steer,
        jumped,
        landed,
    }
}

/// Move a value toward a target by at most `max_delta`.
#[must_use]
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let max_delta = max_delta.abs();
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Horizontal unit vector for a yaw angle.
#[must_use]
pub fn forward_vector(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Wrap an angle into `[-π, π)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU.
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FORWARD: DriveInput = DriveInput {
        forward: true,
        reverse: false,
        left: false,
        right: false,
        jump: false,
    };

    fn run(params: &KinematicsParams, state: &mut DriveState, input: DriveInput, ticks: usize) {
        for _ in 0..ticks {
            step(params, state, &input);
        }
    }

    #[test]
    fn test_move_toward() {
        assert_eq!(move_toward(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_toward(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_toward(0.0, -1.0, 0.5), -0.5);
        assert_eq!(move_toward(2.0, 2.0, 0.1), 2.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_angle(PI + 0.5) - (-PI + 0.5)).abs() < 1e-5);
        assert!((wrap_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
        assert!((wrap_angle(3.0 * TAU + 1.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_accelerates_to_top_speed_and_clamps() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();

        step(&params, &mut state, &FORWARD);
        assert!((state.speed - params.acceleration).abs() < 1e-6);

        run(&params, &mut state, FORWARD, 1000);
        assert!((state.speed - params.max_forward_speed).abs() < 1e-6);
    }

    #[test]
    fn test_reverse_is_limited() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();
        let reverse = DriveInput {
            reverse: true,
            ..DriveInput::default()
        };

        run(&params, &mut state, reverse, 1000);
        assert!((state.speed - params.max_reverse_speed).abs() < 1e-6);
    }

    #[test]
    fn test_both_throttle_keys_coast() {
        let params = KinematicsParams::default();
        let mut state = DriveState {
            speed: 0.2,
            ..DriveState::default()
        };
        let both = DriveInput {
            forward: true,
            reverse: true,
            ..DriveInput::default()
        };

        let report = step(&params, &mut state, &both);
        assert_eq!(report.target_speed, 0.0);
        assert!((state.speed - (0.2 - params.deceleration)).abs() < 1e-6);
    }

    #[test]
    fn test_braking_is_faster_than_coasting() {
        let params = KinematicsParams::default();
        let reverse = DriveInput {
            reverse: true,
            ..DriveInput::default()
        };

        let mut braking = DriveState {
            speed: 0.3,
            ..DriveState::default()
        };
        let mut coasting = braking.clone();

        step(&params, &mut braking, &reverse);
        step(&params, &mut coasting, &DriveInput::default());

        assert!(braking.speed < coasting.speed);
        assert!((braking.speed - (0.3 - params.braking)).abs() < 1e-6);
    }

    #[test]
    fn test_coasts_to_a_stop() {
        let params = KinematicsParams::default();
        let mut state = DriveState {
            speed: params.max_forward_speed,
            ..DriveState::default()
        };

        run(&params, &mut state, DriveInput::default(), 1000);
        assert_eq!(state.speed, 0.0);
    }

    #[test]
    fn test_moves_along_heading() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();

        run(&params, &mut state, FORWARD, 10);
        assert!(state.position.z > 0.0);
        assert!(state.position.x.abs() < 1e-6);

        let mut turned = DriveState {
            yaw: std::f32::consts::FRAC_PI_2,
            ..DriveState::default()
        };
        run(&params, &mut turned, FORWARD, 10);
        assert!(turned.position.x > 0.0);
        assert!(turned.position.z.abs() < 1e-4);
    }

    #[test]
    fn test_steering_eases_and_returns_to_center() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();
        let left = DriveInput {
            left: true,
            ..DriveInput::default()
        };

        step(&params, &mut state, &left);
        assert!((state.steer - params.steer_rate).abs() < 1e-6);

        run(&params, &mut state, left, 200);
        assert!((state.steer - params.max_steer).abs() < 1e-6);

        run(&params, &mut state, DriveInput::default(), 200);
        assert_eq!(state.steer, 0.0);
    }

    #[test]
    fn test_no_yaw_while_stationary() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();
        let left = DriveInput {
            left: true,
            ..DriveInput::default()
        };

        run(&params, &mut state, left, 50);
        assert_eq!(state.yaw, 0.0);
        assert!(state.steer > 0.0);
    }

    #[test]
    fn test_yaw_follows_direction_of_travel() {
        let params = KinematicsParams::default();
        let forward_left = DriveInput {
            forward: true,
            left: true,
            ..DriveInput::default()
        };
        let reverse_left = DriveInput {
            reverse: true,
            left: true,
            ..DriveInput::default()
        };

        let mut forward = DriveState::default();
        run(&params, &mut forward, forward_left, 30);
        assert!(forward.yaw > 0.0);

        let mut reverse = DriveState::default();
        run(&params, &mut reverse, reverse_left, 30);
        assert!(reverse.yaw < 0.0);
    }

    #[test]
    fn test_turn_rate_mode() {
        let params = KinematicsParams {
            yaw_mode: YawMode::TurnRate,
            ..KinematicsParams::default()
        };
        let mut state = DriveState {
            speed: 0.2,
            ..DriveState::default()
        };
        let forward_right = DriveInput {
            forward: true,
            right: true,
            ..DriveInput::default()
        };

        step(&params, &mut state, &forward_right);
        assert!((state.yaw + params.turn_rate).abs() < 1e-6);

        let mut parked = DriveState::default();
        let right = DriveInput {
            right: true,
            ..DriveInput::default()
        };
        step(&params, &mut parked, &right);
        assert_eq!(parked.yaw, 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();
        let jump = DriveInput {
            jump: true,
            ..DriveInput::default()
        };

        let report = step(&params, &mut state, &jump);
        assert!(report.jumped);
        assert!(!state.grounded);
        assert!(state.position.y > 0.0);
        let velocity_after_jump = state.vertical_velocity;

        // Holding jump in the air does not add another impulse.
        let report = step(&params, &mut state, &jump);
        assert!(!report.jumped);
        assert!((state.vertical_velocity - (velocity_after_jump - params.gravity)).abs() < 1e-6);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();
        let jump = DriveInput {
            jump: true,
            ..DriveInput::default()
        };

        step(&params, &mut state, &jump);
        let mut landed_after = None;
        for tick in 0..200 {
            if step(&params, &mut state, &DriveInput::default()).landed {
                landed_after = Some(tick);
                break;
            }
        }

        assert!(landed_after.is_some());
        assert!(state.grounded);
        assert_eq!(state.position.y, params.ground_level);
        assert_eq!(state.vertical_velocity, 0.0);
    }

    #[test]
    fn test_drop_in_from_spawn_height() {
        let params = KinematicsParams::default();
        let mut state = DriveState::spawn(Vec3::new(0.0, 10.0, 0.0), 0.0);
        assert!(!state.grounded);

        let mut landings = 0;
        for _ in 0..300 {
            if step(&params, &mut state, &DriveInput::default()).landed {
                landings += 1;
            }
        }

        assert_eq!(landings, 1);
        assert!(state.grounded);
        assert_eq!(state.position.y, params.ground_level);
    }

    #[test]
    fn test_jump_ignored_while_falling() {
        let params = KinematicsParams::default();
        let mut state = DriveState::spawn(Vec3::new(0.0, 5.0, 0.0), 0.0);
        let jump = DriveInput {
            jump: true,
            ..DriveInput::default()
        };

        let report = step(&params, &mut state, &jump);
        assert!(!report.jumped);
        assert!(state.vertical_velocity < 0.0);
    }

    #[test]
    fn test_wheels_spin_with_speed() {
        let params = KinematicsParams::default();
        let mut state = DriveState::default();
        step(&params, &mut state, &FORWARD);
        assert!(state.wheel_spin > 0.0);

        let mut parked = DriveState::default();
        step(&params, &mut parked, &DriveInput::default());
        assert_eq!(parked.wheel_spin, 0.0);
    }

    fn input_strategy() -> impl Strategy<Value = DriveInput> {
        any::<(bool, bool, bool, bool, bool)>().prop_map(
            |(forward, reverse, left, right, jump)| DriveInput {
                forward,
                reverse,
                left,
                right,
                jump,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_state_stays_within_bounds(
            inputs in proptest::collection::vec(input_strategy(), 1..400),
            start_height in 0.0f32..20.0,
            turn_rate_mode in any::<bool>(),
        ) {
            let params = KinematicsParams {
                yaw_mode: if turn_rate_mode { YawMode::TurnRate } else { YawMode::SteeringAngle },
                ..KinematicsParams::default()
            };
            let mut state = DriveState::spawn(Vec3::new(0.0, start_height, 0.0), 0.0);

            for input in &inputs {
                step(&params, &mut state, input);
                prop_assert!(state.speed <= params.max_forward_speed);
                prop_assert!(state.speed >= params.max_reverse_speed);
                prop_assert!(state.steer.abs() <= params.max_steer);
                prop_assert!(state.position.y >= params.ground_level);
                prop_assert!(state.yaw >= -PI && state.yaw < PI);
                prop_assert!(!state.grounded || state.vertical_velocity == 0.0);
            }
        }
    }
}
