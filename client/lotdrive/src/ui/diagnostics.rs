//! Debug window.
//!
//! Displays FPS, the active car's kinematic state, a speed history plot and
//! tuning sliders for the kinematic constants.

use std::collections::VecDeque;

use bevy::{
    diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin},
    ecs::system::SystemParam,
    prelude::*,
};
use bevy_egui::{EguiContexts, egui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Line, Plot, PlotPoints};
use lotdrive_core::{
    KinematicsParams, YawMode,
    gauges::{cardinal, compass_heading_degrees, speed_kmh},
};

use crate::{
    camera::CameraModeState,
    vehicle::{ActiveCar, Car, CarActions, CarKinematics},
    zones::{ShowAllBounds, ZoneState},
};

use super::DebugVisible;

/// Number of samples to keep in the speed history.
const SPEED_HISTORY_SIZE: usize = 120;

/// Recent speed samples for the plot (km/h).
#[derive(Resource, Default)]
pub struct SpeedHistory {
    samples: VecDeque<f32>,
}

impl SpeedHistory {
    /// Push a new sample, maintaining the history size limit.
    fn push_sample(&mut self, kmh: f32) {
        self.samples
            .push_back(if kmh.is_finite() { kmh } else { 0.0 });
        if self.samples.len() > SPEED_HISTORY_SIZE {
            self.samples.pop_front();
        }
    }

    fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Resources for the debug window.
#[derive(SystemParam)]
pub(super) struct DebugParams<'w, 's> {
    diagnostics: Res<'w, DiagnosticsStore>,
    active: Res<'w, ActiveCar>,
    zones: Res<'w, ZoneState>,
    camera_mode: Res<'w, CameraModeState>,
    cars: Query<'w, 's, (&'static Car, &'static mut CarKinematics)>,
    history: ResMut<'w, SpeedHistory>,
    show_all: ResMut<'w, ShowAllBounds>,
    actions: ResMut<'w, CarActions>,
}

/// Render the debug window.
pub(super) fn debug_window_system(
    mut contexts: EguiContexts,
    mut visible: ResMut<DebugVisible>,
    mut params: DebugParams,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let fps = params
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(bevy::diagnostic::Diagnostic::smoothed)
        .unwrap_or(0.0);

    egui::Window::new("Debug")
        .open(&mut visible.0)
        .default_pos([10.0, 300.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {fps:.0}"));
            ui.label(format!("Camera: {:?}", params.camera_mode.current()));
            ui.checkbox(&mut params.show_all.0, "Show all bounds");
            ui.separator();

            let car = params
                .active
                .entity
                .and_then(|entity| params.cars.get_mut(entity).ok());
            let Some((car, mut kinematics)) = car else {
                params.history.clear();
                ui.label("No car");
                return;
            };

            params.history.push_sample(speed_kmh(kinematics.state.speed));

            ui.horizontal(|ui| {
                ui.heading(format!("Car: {}", car.name));
                if ui.button("Reset").clicked() {
                    params.actions.request_reset();
                }
            });

            egui::ScrollArea::vertical()
                .max_height(ui.available_height() - 20.0)
                .show(ui, |ui| {
                    render_state_table(ui, &kinematics, params.zones.tracker.active());
                    ui.separator();
                    render_speed_plot(ui, &params.history);
                    ui.separator();
                    ui.collapsing("Handling tuning", |ui| {
                        render_tuning(ui, &mut kinematics.params);
                    });
                });
        });

    Ok(())
}

fn render_state_table(ui: &mut egui::Ui, kinematics: &CarKinematics, zone: Option<usize>) {
    let state = &kinematics.state;
    let heading = compass_heading_degrees(state.yaw);
    let rows = [
        (
            "Speed:",
            format!("{:.3} /tick ({:.0} km/h)", state.speed, speed_kmh(state.speed)),
        ),
        ("Steer:", format!("{:+.4} rad", state.steer)),
        ("Heading:", format!("{heading:.1}° {}", cardinal(heading))),
        (
            "Position:",
            format!(
                "({:.1}, {:.1}, {:.1})",
                state.position.x, state.position.y, state.position.z
            ),
        ),
        (
            "Grounded:",
            if state.grounded {
                "Yes".to_owned()
            } else {
                format!("No ({:+.3} /tick)", state.vertical_velocity)
            },
        ),
        (
            "Zone:",
            zone.map_or_else(|| "-".to_owned(), |index| index.to_string()),
        ),
        ("Ticks:", kinematics.ticks.to_string()),
    ];

    TableBuilder::new(ui)
        .column(Column::exact(80.0))
        .column(Column::exact(180.0))
        .body(|mut body| {
            for (label, value) in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(label);
                    });
                    row.col(|ui| {
                        ui.label(value);
                    });
                });
            }
        });
}

fn render_speed_plot(ui: &mut egui::Ui, history: &SpeedHistory) {
    ui.label("Speed history (km/h):");
    let points: PlotPoints = history
        .samples
        .iter()
        .enumerate()
        .map(|(i, &v)| [i as f64, f64::from(v)])
        .collect();
    Plot::new("speed_plot")
        .height(60.0)
        .show_axes(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new("speed", points).color(egui::Color32::LIGHT_BLUE));
        });
}

fn render_tuning(ui: &mut egui::Ui, params: &mut KinematicsParams) {
    ui.horizontal(|ui| {
        ui.label("Yaw:");
        ui.radio_value(&mut params.yaw_mode, YawMode::SteeringAngle, "Steering angle");
        ui.radio_value(&mut params.yaw_mode, YawMode::TurnRate, "Turn rate");
    });
    ui.add(egui::Slider::new(&mut params.max_forward_speed, 0.05..=1.5).text("Max speed"));
    ui.add(egui::Slider::new(&mut params.max_reverse_speed, -0.6..=0.0).text("Max reverse"));
    ui.add(egui::Slider::new(&mut params.acceleration, 0.0005..=0.02).text("Acceleration"));
    ui.add(egui::Slider::new(&mut params.deceleration, 0.0..=0.02).text("Deceleration"));
    ui.add(egui::Slider::new(&mut params.braking, 0.0..=0.05).text("Braking"));
    ui.add(egui::Slider::new(&mut params.max_steer, 0.005..=0.1).text("Max steer"));
    ui.add(egui::Slider::new(&mut params.steer_rate, 0.0005..=0.01).text("Steer rate"));
    ui.add(egui::Slider::new(&mut params.steer_return, 0.0..=0.02).text("Steer return"));
    ui.add(egui::Slider::new(&mut params.turn_rate, 0.005..=0.1).text("Turn rate"));
    ui.add(egui::Slider::new(&mut params.gravity, 0.001..=0.05).text("Gravity"));
    ui.add(egui::Slider::new(&mut params.jump_impulse, 0.0..=0.6).text("Jump impulse"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_history_is_bounded() {
        let mut history = SpeedHistory::default();
        for i in 0..(SPEED_HISTORY_SIZE + 30) {
            #[allow(clippy::cast_precision_loss)]
            history.push_sample(i as f32);
        }
        assert_eq!(history.samples.len(), SPEED_HISTORY_SIZE);
        assert_eq!(history.samples.front().copied(), Some(30.0));

        history.push_sample(f32::NAN);
        assert_eq!(history.samples.back().copied(), Some(0.0));

        history.clear();
        assert!(history.samples.is_empty());
    }
}
