//! The "Tweaks" window: live material parameters, grouped by material.
//!
//! Every edit lands in [`DebugSettings`] and is mirrored into the live material
//! in the same frame.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::{color_picker, slider};
use crate::{
    materials::{HologramMaterial, ShowcaseMaterials},
    settings::{DebugSettings, HologramSettings, SurfaceSettings},
};

const PANEL_WIDTH: f32 = 325.0;
const HOLOGRAM_STEP: f64 = 0.01;
const SURFACE_STEP: f64 = 0.001;

/// Present once the reveal sequence has opened the panel.
#[derive(Resource, Debug, Default)]
pub struct DebugPanel;

/// Which material groups were edited this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Edits {
    hologram: bool,
    base: bool,
    base_2: bool,
}

pub(super) fn debug_panel_ui(
    mut contexts: EguiContexts,
    mut settings: ResMut<DebugSettings>,
    showcase: Res<ShowcaseMaterials>,
    mut holograms: ResMut<Assets<HologramMaterial>>,
    mut standards: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let mut edits = Edits::default();
    // Edit a copy; the resource is only written when something changed.
    let mut draft = settings.clone();
    egui::Window::new("Tweaks")
        .default_width(PANEL_WIDTH)
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .show(ctx, |ui| {
            edits.hologram = hologram_group(ui, &mut draft.hologram);
            edits.base = surface_group(ui, "Base Material", &mut draft.base);
            edits.base_2 = surface_group(ui, "Base2 Material", &mut draft.base_2);
        });

    if edits == Edits::default() {
        return Ok(());
    }
    *settings = draft;

    if edits.hologram
        && let Some(material) = holograms.get_mut(&showcase.hologram)
    {
        settings.hologram.apply(&mut *material);
    }
    for (edited, surface, handle) in [
        (edits.base, &settings.base, &showcase.base),
        (edits.base_2, &settings.base_2, &showcase.base_2),
    ] {
        if edited && let Some(material) = standards.get_mut(handle) {
            surface.apply(&mut *material);
        }
    }

    Ok(())
}

fn hologram_group(ui: &mut egui::Ui, settings: &mut HologramSettings) -> bool {
    egui::CollapsingHeader::new("Car Material")
        .default_open(true)
        .show(ui, |ui| {
            let mut changed = color_picker(ui, "Color car", &mut settings.color);
            changed |= slider(
                ui,
                "Glitch Intensity",
                &mut settings.glitch_strength,
                0.0..=1.0,
                HOLOGRAM_STEP,
            );
            changed |= slider(
                ui,
                "Frequency 1",
                &mut settings.sin_factor_1,
                0.0..=20.0,
                HOLOGRAM_STEP,
            );
            changed |= slider(
                ui,
                "Frequency 2",
                &mut settings.sin_factor_2,
                0.0..=20.0,
                HOLOGRAM_STEP,
            );
            changed |= slider(
                ui,
                "Min Smoothing",
                &mut settings.smoothstep_min,
                0.0..=1.0,
                HOLOGRAM_STEP,
            );
            changed |= slider(
                ui,
                "Max Smoothing",
                &mut settings.smoothstep_max,
                0.0..=2.0,
                HOLOGRAM_STEP,
            );
            changed
        })
        .body_returned
        .unwrap_or(false)
}

fn surface_group(ui: &mut egui::Ui, title: &str, settings: &mut SurfaceSettings) -> bool {
    egui::CollapsingHeader::new(title)
        .default_open(false)
        .show(ui, |ui| {
            let mut changed = slider(ui, "metalness", &mut settings.metalness, 0.0..=1.0, SURFACE_STEP);
            changed |= slider(ui, "roughness", &mut settings.roughness, 0.0..=1.0, SURFACE_STEP);
            changed |= slider(
                ui,
                "transmission",
                &mut settings.transmission,
                0.0..=1.0,
                SURFACE_STEP,
            );
            changed |= slider(ui, "ior", &mut settings.ior, 1.0..=10.0, SURFACE_STEP);
            changed |= color_picker(ui, "color", &mut settings.color);
            changed
        })
        .body_returned
        .unwrap_or(false)
}
