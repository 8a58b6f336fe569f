//! Headless drive tracer.
//!
//! Runs a scripted drive through the same kinematics the game uses, without a
//! window or renderer, and prints per-tick telemetry CSV to stdout with a
//! summary on stderr. Useful for checking how a spec row changes handling.
//!
//! Run with: cargo run -p lotdrive --bin drive-trace -- [car] [spec_csv]
//! Example: cargo run -p lotdrive --bin drive-trace -- pickup client/lotdrive/assets/vehicle_data.csv

use std::{env, fs, process};

use lotdrive::vehicle::telemetry::{
    StdoutTelemetryOutput, TelemetrySnapshot, emit_telemetry_to, reset_telemetry_to,
};
use lotdrive_core::{
    DriveInput, KinematicsParams, LotLayout, SpecTable, TICK_HZ, ZoneChange, ZoneTracker,
    gauges::{compass_heading_degrees, speed_kmh},
    step, vehicle_bounds,
};

/// Default spec sheet location, relative to the workspace root.
const DEFAULT_SPECS_PATH: &str = "client/lotdrive/assets/vehicle_data.csv";

/// Give up on any phase after this many ticks.
const PHASE_TIMEOUT_TICKS: u32 = 60 * 30;

/// One leg of the scripted drive.
#[derive(Clone, Copy, Debug)]
enum Phase {
    /// No input until the drop-in lands.
    DropIn,
    /// Full throttle for a fixed time.
    Accelerate { ticks: u32 },
    /// Full throttle while steering left.
    TurnLeft { ticks: u32 },
    /// One jump at speed, then hold throttle until landing.
    Jump,
    /// Reverse key held until the car is rolling backwards.
    Brake,
    /// No input until stopped.
    Coast,
}

impl Phase {
    fn input(self, tick_in_phase: u32) -> DriveInput {
        match self {
            Phase::DropIn | Phase::Coast => DriveInput::default(),
            Phase::Accelerate { .. } => DriveInput {
                forward: true,
                ..DriveInput::default()
            },
            Phase::TurnLeft { .. } => DriveInput {
                forward: true,
                left: true,
                ..DriveInput::default()
            },
            Phase::Jump => DriveInput {
                forward: true,
                jump: tick_in_phase == 0,
                ..DriveInput::default()
            },
            Phase::Brake => DriveInput {
                reverse: true,
                ..DriveInput::default()
            },
        }
    }
}

const SCRIPT: [Phase; 6] = [
    Phase::DropIn,
    Phase::Accelerate { ticks: 60 * 6 },
    Phase::TurnLeft { ticks: 60 * 3 },
    Phase::Jump,
    Phase::Brake,
    Phase::Coast,
];

/// Figures collected over the run.
#[derive(Default)]
struct Summary {
    landing_tick: Option<u32>,
    top_speed: f32,
    ticks_to_90_percent: Option<u32>,
    airtime_ticks: u32,
    distance: f32,
    zones_entered: Vec<String>,
}

fn load_params(car: &str, specs_path: &str) -> KinematicsParams {
    let base = KinematicsParams::default();

    let text = match fs::read_to_string(specs_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("# WARN: could not read {specs_path}: {e}; using base constants");
            return base;
        }
    };

    let table = match SpecTable::parse(&text) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("# ERROR: {specs_path}: {e}");
            process::exit(1);
        }
    };

    if let Some(spec) = table.get(car) {
        eprintln!(
            "# Spec: {} {} ({} hp, {} lbs)",
            spec.category,
            spec.model,
            spec.horsepower.map_or_else(|| "?".to_owned(), |v| v.to_string()),
            spec.weight_lbs.map_or_else(|| "?".to_owned(), |v| v.to_string()),
        );
        spec.derive_params(&base)
    } else {
        let known: Vec<&str> = table.names().collect();
        eprintln!(
            "# WARN: no spec row for '{car}' (known: {}); using base constants",
            known.join(", ")
        );
        base
    }
}

fn main() {
    let mut args = env::args().skip(1);
    let car = args.next().unwrap_or_else(|| "sedan".to_owned());
    let specs_path = args.next().unwrap_or_else(|| DEFAULT_SPECS_PATH.to_owned());

    eprintln!("# Tracing car: {car}");
    let params = load_params(&car, &specs_path);
    eprintln!(
        "# Max speed: {:.1} km/h, accel: {:.4}/tick, max steer: {:.4} rad",
        speed_kmh(params.max_forward_speed),
        params.acceleration,
        params.max_steer
    );

    let layout = LotLayout::default();
    let mut state = layout.spawn_state();
    let mut tracker = ZoneTracker::default();
    let mut summary = Summary::default();
    let mut output = StdoutTelemetryOutput;
    reset_telemetry_to(&mut output);

    let target_90 = params.max_forward_speed * 0.9;
    let mut tick = 0u32;

    for phase in SCRIPT {
        eprintln!("# Phase: {phase:?}");
        let mut tick_in_phase = 0u32;

        loop {
            let input = phase.input(tick_in_phase);
            let previous = state.position;
            let report = step(&params, &mut state, &input);

            emit_telemetry_to(
                &TelemetrySnapshot {
                    tick,
                    input: &input,
                    state: &state,
                    report: &report,
                },
                &mut output,
            );

            summary.distance += (state.position - previous).length();
            summary.top_speed = summary.top_speed.max(state.speed);
            if !state.grounded {
                summary.airtime_ticks += 1;
            }
            if report.landed && summary.landing_tick.is_none() {
                summary.landing_tick = Some(tick);
            }
            if summary.ticks_to_90_percent.is_none() && state.speed >= target_90 {
                summary.ticks_to_90_percent = Some(tick);
            }

            let bounds = vehicle_bounds(state.position, state.yaw, layout.vehicle_half_extents);
            match tracker.update(&layout.zones, &bounds) {
                ZoneChange::Entered(index) | ZoneChange::Switched { to: index, .. } => {
                    let car = &layout.zones[index].car;
                    eprintln!("# Tick {tick}: entered zone for {car}");
                    summary.zones_entered.push(car.clone());
                }
                ZoneChange::Left(index) => {
                    eprintln!("# Tick {tick}: left zone for {}", layout.zones[index].car);
                }
                ZoneChange::Unchanged => {}
            }

            tick += 1;
            tick_in_phase += 1;

            let done = match phase {
                Phase::DropIn => state.grounded,
                Phase::Accelerate { ticks } | Phase::TurnLeft { ticks } => tick_in_phase >= ticks,
                Phase::Jump => tick_in_phase > 1 && state.grounded,
                Phase::Brake => state.speed < 0.0,
                Phase::Coast => state.speed == 0.0,
            };
            if done {
                break;
            }
            if tick_in_phase >= PHASE_TIMEOUT_TICKS {
                eprintln!("# WARN: phase {phase:?} timed out");
                break;
            }
        }
    }

    let seconds = |ticks: u32| f64::from(ticks) / TICK_HZ;

    eprintln!();
    eprintln!("# === {car} ===");
    match summary.landing_tick {
        Some(t) => eprintln!("# Drop-in landed after {:.2} s", seconds(t)),
        None => eprintln!("# Drop-in never landed"),
    }
    eprintln!(
        "# Top speed: {:.4}/tick ({:.1} km/h)",
        summary.top_speed,
        speed_kmh(summary.top_speed)
    );
    match summary.ticks_to_90_percent {
        Some(t) => eprintln!("# Time to 90%: {:.2} s", seconds(t)),
        None => eprintln!("# Time to 90%: (not reached)"),
    }
    eprintln!("# Airtime: {:.2} s", seconds(summary.airtime_ticks));
    eprintln!("# Distance: {:.1} m", summary.distance);
    eprintln!(
        "# Final position: ({:.1}, {:.1}, {:.1}), heading {:.0} deg",
        state.position.x,
        state.position.y,
        state.position.z,
        compass_heading_degrees(state.yaw)
    );
    if summary.zones_entered.is_empty() {
        eprintln!("# Zones entered: none");
    } else {
        eprintln!("# Zones entered: {}", summary.zones_entered.join(", "));
    }
    eprintln!("# Total: {tick} ticks ({:.2} s)", seconds(tick));
}
