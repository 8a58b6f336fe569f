//! Engine-free core of the lotdrive demo.
//!
//! Everything in here is plain `glam` math over small value types so it can be
//! stepped and tested without a running Bevy app:
//!
//! - [`kinematics`]: per-tick speed, steering, yaw and jump/gravity update.
//! - [`bounds`]: axis-aligned boxes and the vehicle's world footprint.
//! - [`zones`]: ordered trigger zones, the active-zone tracker and the
//!   top-down view region.
//! - [`layout`]: the fixed parking lot arrangement.
//! - [`specs`]: the vehicle spec table loaded from CSV.
//! - [`wheels`]: wheel node naming conventions for loaded models.
//! - [`gauges`]: speedometer and compass math for the HUD.

pub mod bounds;
mod error;
pub mod gauges;
pub mod kinematics;
pub mod layout;
pub mod specs;
pub mod wheels;
pub mod zones;

pub use bounds::{Aabb, vehicle_bounds};
pub use error::{SpecError, SpecResult};
pub use kinematics::{DriveInput, DriveState, KinematicsParams, StepReport, YawMode, step};
pub use layout::LotLayout;
pub use specs::{SpecTable, VehicleSpec};
pub use zones::{TriggerZone, ViewMode, ViewRegion, ZoneChange, ZoneTracker};

/// Fixed simulation rate in ticks per second.
///
/// Kinematic constants are expressed per tick, so this is the only place that
/// ties them to wall-clock units.
pub const TICK_HZ: f64 = 60.0;

/// Build the conventional model asset path for a car name.
#[must_use]
pub fn model_path(name: &str) -> String {
    format!("{name}.glb")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_path() {
        assert_eq!(model_path("sedan"), "sedan.glb");
        assert_eq!(model_path("pickup_truck"), "pickup_truck.glb");
    }
}
