//! Arcade parking lot driving demo using Bevy.
//!
//! This library exposes the telemetry schema for standalone binaries like the
//! headless drive tracer. The kinematics themselves live in `lotdrive-core`.

pub mod vehicle {
    pub mod telemetry;
}
