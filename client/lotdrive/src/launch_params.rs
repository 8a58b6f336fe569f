//! Launch parameter parsing for the demo.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use bevy::prelude::*;
use lotdrive_core::YawMode;

/// Car driven at startup.
const DEFAULT_CAR: &str = "sedan";
/// Spec sheet path, relative to the assets folder.
const DEFAULT_SPECS_PATH: &str = "vehicle_data.csv";
/// Height the car is dropped from on spawn, in meters.
const DEFAULT_DROP_HEIGHT: f32 = 10.0;

/// How steering turns the car.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(not(target_family = "wasm"), derive(clap::ValueEnum))]
pub enum SteeringStyle {
    /// Yaw follows the eased steering angle, scaled by speed.
    #[default]
    Angle,
    /// Yaw turns at a constant rate while moving.
    Rate,
}

impl From<SteeringStyle> for YawMode {
    fn from(style: SteeringStyle) -> Self {
        match style {
            SteeringStyle::Angle => YawMode::SteeringAngle,
            SteeringStyle::Rate => YawMode::TurnRate,
        }
    }
}

/// Launch parameters for the demo.
#[derive(Resource, Debug)]
pub struct LaunchParams {
    /// Name of the car to spawn first.
    pub car: String,
    /// Asset path of the vehicle spec sheet.
    pub specs_path: String,
    /// Drop-in height in meters.
    pub drop_height: f32,
    /// Steering model.
    pub steering: SteeringStyle,
    /// Write per-tick kinematics telemetry to `telemetry.csv`.
    pub telemetry: bool,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            car: DEFAULT_CAR.to_owned(),
            specs_path: DEFAULT_SPECS_PATH.to_owned(),
            drop_height: DEFAULT_DROP_HEIGHT,
            steering: SteeringStyle::default(),
            telemetry: false,
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;

    /// Parse a drop height, rejecting negative and non-finite values.
    fn parse_drop_height(s: &str) -> Result<f32, String> {
        let height = s
            .parse::<f32>()
            .map_err(|e| format!("invalid drop height: {e}"))?;
        if !height.is_finite() || height < 0.0 {
            return Err(format!("drop height must be a non-negative number, got {s}"));
        }
        Ok(height)
    }

    #[derive(Parser)]
    #[command(about = "Arcade parking lot driving demo")]
    struct CliArgs {
        /// Car to drive at startup (model `<car>.glb`, spec row `<car>`).
        #[arg(long, default_value = DEFAULT_CAR)]
        car: String,

        /// Vehicle spec sheet, relative to the assets folder.
        #[arg(long, default_value = DEFAULT_SPECS_PATH)]
        specs: String,

        /// Height the car is dropped from on spawn, in meters.
        #[arg(long, default_value_t = DEFAULT_DROP_HEIGHT, value_parser = parse_drop_height)]
        drop_height: f32,

        /// Steering model.
        #[arg(long, value_enum, default_value_t = SteeringStyle::default())]
        steering: SteeringStyle,

        /// Write per-tick kinematics telemetry to telemetry.csv.
        #[arg(long)]
        telemetry: bool,
    }

    pub fn parse() -> LaunchParams {
        let args = CliArgs::parse();
        LaunchParams {
            car: args.car,
            specs_path: args.specs,
            drop_height: args.drop_height,
            steering: args.steering,
            telemetry: args.telemetry,
        }
    }

}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
