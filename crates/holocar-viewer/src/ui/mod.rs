//! egui overlays: the loading indicator and the material tweak panel.

mod loading;
mod panel;

use std::ops::RangeInclusive;

use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass, egui};

use crate::loading::LoadingIndicator;

pub use loading::loading_label;
pub use panel::DebugPanel;

/// Plugin for the egui overlays.
pub struct DebugUiPlugin;

impl Plugin for DebugUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin::default()).add_systems(
            EguiPrimaryContextPass,
            (
                loading::loading_indicator_ui
                    .run_if(|indicator: Res<LoadingIndicator>| indicator.visible),
                panel::debug_panel_ui.run_if(resource_exists::<DebugPanel>),
            ),
        );
    }
}

// ============================================================================
// UI helpers
// ============================================================================

/// A labelled slider clamped to `range`. Returns true if the value changed.
pub fn slider(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: RangeInclusive<f32>,
    step: f64,
) -> bool {
    ui.add(egui::Slider::new(value, range).step_by(step).text(label))
        .changed()
}

/// A labelled sRGB color button. Returns true on every edit, including while
/// the picker is being dragged.
pub fn color_picker(ui: &mut egui::Ui, label: &str, color: &mut Srgba) -> bool {
    ui.horizontal(|ui| {
        let mut rgb = color.to_u8_array_no_alpha();
        let changed = egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed();
        ui.label(label);
        if changed {
            *color = Srgba::rgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        changed
    })
    .inner
}
