//! Zone prompt and spec sheet window.

use bevy::{ecs::system::SystemParam, prelude::*};
use bevy_egui::{EguiContexts, egui};
use egui_extras::{Column, TableBuilder};
use lotdrive_core::SpecTable;

use crate::{
    scene::Lot,
    specs::{VehicleCatalog, VehicleSpecSheet},
    vehicle::ActiveCar,
    zones::ZoneState,
};

use super::InfoVisible;

/// Resources for finding the car the player is looking at.
#[derive(SystemParam)]
pub(super) struct FocusParams<'w> {
    lot: Res<'w, Lot>,
    zones: Res<'w, ZoneState>,
    active: Res<'w, ActiveCar>,
    catalog: Res<'w, VehicleCatalog>,
    sheets: Res<'w, Assets<VehicleSpecSheet>>,
}

impl FocusParams<'_> {
    /// Car of the zone the active car stands in.
    fn nearby_car(&self) -> Option<&str> {
        self.zones
            .tracker
            .active_zone(&self.lot.zones)
            .map(|zone| zone.car.as_str())
    }

    /// Nearby car, falling back to the one being driven.
    fn focused_car(&self) -> Option<&str> {
        self.nearby_car().or_else(|| self.active.name())
    }

    fn table(&self) -> Option<&SpecTable> {
        self.catalog.table(&self.sheets)
    }
}

/// Prompt shown while the car stands in a trigger zone.
pub(super) fn zone_prompt_system(mut contexts: EguiContexts, focus: FocusParams) -> Result {
    let ctx = contexts.ctx_mut()?;
    let Some(car) = focus.nearby_car() else {
        return Ok(());
    };

    let summary = focus.table().and_then(|table| table.get(car)).map(|spec| {
        [spec.category.as_str(), spec.model.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" · ")
    });

    egui::Area::new(egui::Id::new("zone_prompt"))
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -40.0])
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(format!("Press F to drive the {car}")).size(18.0));
                    if let Some(summary) = summary.filter(|s| !s.is_empty()) {
                        ui.label(summary);
                    }
                    ui.small("Press I for details");
                });
            });
        });

    Ok(())
}

/// Spec table for the nearby (or current) car.
pub(super) fn info_window_system(
    mut contexts: EguiContexts,
    mut visible: ResMut<InfoVisible>,
    focus: FocusParams,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let car = focus.focused_car();

    egui::Window::new("Spec sheet")
        .open(&mut visible.0)
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            let Some(car) = car else {
                ui.label("No car");
                return;
            };
            ui.heading(car);

            let Some(table) = focus.table() else {
                ui.label("Spec sheet not loaded");
                return;
            };
            let Some(spec) = table.get(car) else {
                ui.label("No spec row for this car");
                return;
            };

            TableBuilder::new(ui)
                .column(Column::exact(150.0))
                .column(Column::remainder().at_least(180.0))
                .body(|mut body| {
                    for (label, value) in spec.display_rows() {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.strong(label);
                            });
                            row.col(|ui| {
                                ui.label(value);
                            });
                        });
                    }
                });
        });

    Ok(())
}
