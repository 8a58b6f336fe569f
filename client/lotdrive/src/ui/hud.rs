//! Speedometer, compass and coordinate readout.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use lotdrive_core::gauges::{
    SPEEDOMETER_MAX_KMH, cardinal, compass_heading_degrees, speed_kmh, speedometer_needle_angle,
};

use crate::vehicle::{ActiveCar, CarKinematics};

const DIAL_RADIUS: f32 = 70.0;
/// Dial tick spacing.
const TICK_STEP_KMH: f32 = 20.0;
const NEEDLE_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 60, 40);

/// Draw the HUD for the active car.
pub(super) fn hud_system(
    mut contexts: EguiContexts,
    active: Res<ActiveCar>,
    cars: Query<&CarKinematics>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let Some(kinematics) = active.entity.and_then(|entity| cars.get(entity).ok()) else {
        return Ok(());
    };
    let state = &kinematics.state;

    egui::Area::new(egui::Id::new("speedometer"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-20.0, -20.0])
        .interactable(false)
        .show(ctx, |ui| draw_speedometer(ui, speed_kmh(state.speed)));

    let heading = compass_heading_degrees(state.yaw);
    egui::Area::new(egui::Id::new("compass"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 12.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(
                    egui::RichText::new(format!("{heading:03.0}° {}", cardinal(heading)))
                        .monospace()
                        .size(18.0),
                );
            });
        });

    let p = state.position;
    egui::Area::new(egui::Id::new("coordinates"))
        .anchor(egui::Align2::LEFT_BOTTOM, [20.0, -20.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.monospace(format!("X {:7.1}  Y {:5.1}  Z {:7.1}", p.x, p.y, p.z));
            });
        });

    Ok(())
}

/// Unit vector on screen for a dial angle measured clockwise from up.
fn dial_direction(angle: f32) -> egui::Vec2 {
    egui::vec2(angle.sin(), -angle.cos())
}

fn draw_speedometer(ui: &mut egui::Ui, kmh: f32) {
    let (rect, _) =
        ui.allocate_exact_size(egui::Vec2::splat(DIAL_RADIUS * 2.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let white = egui::Color32::WHITE;

    painter.circle(
        center,
        DIAL_RADIUS - 1.0,
        egui::Color32::from_black_alpha(160),
        egui::Stroke::new(2.0, white),
    );

    let mut mark = 0.0;
    while mark <= SPEEDOMETER_MAX_KMH {
        let dir = dial_direction(speedometer_needle_angle(mark));
        painter.line_segment(
            [center + dir * (DIAL_RADIUS - 12.0), center + dir * (DIAL_RADIUS - 3.0)],
            egui::Stroke::new(2.0, white),
        );
        mark += TICK_STEP_KMH;
    }

    let needle = dial_direction(speedometer_needle_angle(kmh));
    painter.line_segment(
        [center, center + needle * (DIAL_RADIUS - 14.0)],
        egui::Stroke::new(3.0, NEEDLE_COLOR),
    );
    painter.circle_filled(center, 4.0, white);

    painter.text(
        center + egui::vec2(0.0, DIAL_RADIUS * 0.45),
        egui::Align2::CENTER_CENTER,
        format!("{:.0} km/h", kmh.abs()),
        egui::FontId::proportional(16.0),
        white,
    );
}
