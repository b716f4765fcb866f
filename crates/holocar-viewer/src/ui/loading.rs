//! Centred loading spinner.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::loading::LoadingIndicator;

/// Text under the spinner.
pub fn loading_label(indicator: &LoadingIndicator) -> String {
    if indicator.total == 0 {
        "Loading…".to_string()
    } else {
        format!("Loading… {}/{}", indicator.loaded, indicator.total)
    }
}

pub(super) fn loading_indicator_ui(
    mut contexts: EguiContexts,
    indicator: Res<LoadingIndicator>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::Area::new(egui::Id::new("loading_indicator"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add(egui::Spinner::new().size(48.0).color(egui::Color32::WHITE));
                ui.label(
                    egui::RichText::new(loading_label(&indicator)).color(egui::Color32::WHITE),
                );
            });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_before_anything_is_known() {
        assert_eq!(loading_label(&LoadingIndicator::default()), "Loading…");
    }

    #[test]
    fn test_label_shows_counts() {
        let indicator = LoadingIndicator {
            visible: true,
            loaded: 2,
            total: 3,
        };
        assert_eq!(loading_label(&indicator), "Loading… 2/3");
    }
}
