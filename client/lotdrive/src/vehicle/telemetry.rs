//! Vehicle kinematics telemetry logging.
//!
//! Outputs CSV data for analysis. Supports multiple output destinations via
//! the `TelemetryOutput` trait. File output is reset each time a car spawns.

use std::{
    fs::{File, OpenOptions},
    io::Write,
};

use lotdrive_core::{
    DriveInput, DriveState, StepReport, TICK_HZ,
    gauges::{compass_heading_degrees, speed_kmh},
};

/// Telemetry output file path.
const TELEMETRY_PATH: &str = "telemetry.csv";

/// Everything known about one kinematics tick.
pub struct TelemetrySnapshot<'a> {
    /// Ticks since the car spawned.
    pub tick: u32,
    pub input: &'a DriveInput,
    pub state: &'a DriveState,
    pub report: &'a StepReport,
}

/// Trait for telemetry output destinations.
pub trait TelemetryOutput: Send + Sync {
    /// Write the CSV header.
    fn write_header(&mut self, header: &str);
    /// Write a data row.
    fn write_row(&mut self, row: &str);
}

/// File-based output (default behavior).
#[derive(Default)]
pub struct FileTelemetryOutput;

impl TelemetryOutput for FileTelemetryOutput {
    fn write_header(&mut self, header: &str) {
        if let Ok(mut file) = File::create(TELEMETRY_PATH) {
            let _ = writeln!(file, "{header}");
        }
    }

    fn write_row(&mut self, row: &str) {
        if let Ok(mut file) = OpenOptions::new().append(true).open(TELEMETRY_PATH) {
            let _ = writeln!(file, "{row}");
        }
    }
}

/// Stdout output for the headless tracer.
pub struct StdoutTelemetryOutput;

impl TelemetryOutput for StdoutTelemetryOutput {
    fn write_header(&mut self, header: &str) {
        println!("{header}");
    }

    fn write_row(&mut self, row: &str) {
        println!("{row}");
    }
}

/// Macro to define CSV schema and generate telemetry functions.
///
/// This generates `reset_telemetry_to()`, `emit_telemetry_to()` (trait-based),
/// and `reset_telemetry()`, `emit_telemetry()` (file-based convenience wrappers)
/// from a single schema definition, keeping column names and formats in sync.
macro_rules! define_telemetry {
    (
        columns: { $( $name:ident : $fmt:literal ),* $(,)? },
        prelude: |$snapshot:ident| { $( $prelude:stmt );* $(;)? },
        row_values: { $( $val:expr ),* $(,)? }
    ) => {
        /// CSV header string.
        const CSV_HEADER: &str = concat!( $( stringify!($name), "," ),* );

        /// Reset telemetry (write header) to the specified output.
        pub fn reset_telemetry_to(output: &mut dyn TelemetryOutput) {
            output.write_header(CSV_HEADER.trim_end_matches(','));
        }

        /// Write telemetry data to the specified output.
        pub fn emit_telemetry_to($snapshot: &TelemetrySnapshot<'_>, output: &mut dyn TelemetryOutput) {
            $( $prelude )*

            let line = format!( concat!( $( $fmt, "," ),* ), $( $val ),* );
            let line = line.trim_end_matches(',');

            output.write_row(line);
        }

        /// Reset telemetry file (call when a car spawns).
        pub fn reset_telemetry() {
            reset_telemetry_to(&mut FileTelemetryOutput);
        }

        /// Write telemetry data to CSV file.
        pub fn emit_telemetry($snapshot: &TelemetrySnapshot<'_>) {
            emit_telemetry_to($snapshot, &mut FileTelemetryOutput);
        }
    };
}

define_telemetry! {
    columns: {
        tick: "{}",
        t: "{:.4}",
        fwd: "{}",
        rev: "{}",
        left: "{}",
        right: "{}",
        jump: "{}",
        grounded: "{}",
        x: "{:.3}",
        y: "{:.3}",
        z: "{:.3}",
        yaw_deg: "{:.2}",
        heading_deg: "{:.1}",
        speed: "{:.4}",
        kmh: "{:.1}",
        target_speed: "{:.4}",
        steer: "{:.4}",
        target_steer: "{:.4}",
        v_vel: "{:.4}",
        wheel_spin: "{:.3}",
        jumped: "{}",
        landed: "{}",
    },
    prelude: |t| {
        let elapsed = f64::from(t.tick) / TICK_HZ;
        let input = t.input;
        let state = t.state;
        let report = t.report;
    },
    row_values: {
        t.tick,
        elapsed,
        u8::from(input.forward),
        u8::from(input.reverse),
        u8::from(input.left),
        u8::from(input.right),
        u8::from(input.jump),
        u8::from(state.grounded),
        state.position.x,
        state.position.y,
        state.position.z,
        state.yaw.to_degrees(),
        compass_heading_degrees(state.yaw),
        state.speed,
        speed_kmh(state.speed),
        report.target_speed,
        state.steer,
        report.target_steer,
        state.vertical_velocity,
        state.wheel_spin,
        u8::from(report.jumped),
        u8::from(report.landed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CaptureOutput {
        header: Option<String>,
        rows: Vec<String>,
    }

    impl TelemetryOutput for CaptureOutput {
        fn write_header(&mut self, header: &str) {
            self.header = Some(header.to_owned());
        }

        fn write_row(&mut self, row: &str) {
            self.rows.push(row.to_owned());
        }
    }

    #[test]
    fn test_header_and_row_have_matching_columns() {
        let mut output = CaptureOutput::default();
        reset_telemetry_to(&mut output);

        let input = DriveInput {
            forward: true,
            jump: true,
            ..DriveInput::default()
        };
        let state = DriveState::default();
        let report = StepReport {
            jumped: true,
            ..StepReport::default()
        };
        emit_telemetry_to(
            &TelemetrySnapshot {
                tick: 60,
                input: &input,
                state: &state,
                report: &report,
            },
            &mut output,
        );

        let header = output.header.unwrap();
        assert!(header.starts_with("tick,t,fwd"));
        assert!(!header.ends_with(','));
        assert_eq!(output.rows.len(), 1);

        let row = &output.rows[0];
        assert_eq!(header.split(',').count(), row.split(',').count());
        assert!(row.starts_with("60,1.0000,1,0,0,0,1,1,"));
        assert!(row.ends_with(",1,0"));
    }
}
