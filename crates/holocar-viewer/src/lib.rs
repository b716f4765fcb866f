//! Hologram vehicle showcase using Bevy.
//!
//! Loads a vehicle scene behind a black overlay, reveals it with a short timed
//! sequence once loading completes, and exposes the material parameters in a
//! live tweak panel.

pub mod animation;
pub mod camera;
pub mod error;
pub mod launch_params;
pub mod loading;
pub mod materials;
pub mod reveal;
pub mod scene;
pub mod settings;
pub mod ui;
pub mod viewport;

use bevy::prelude::*;

use animation::AnimationPlugin;
use camera::OrbitCameraPlugin;
use launch_params::LaunchParams;
use loading::LoadingPlugin;
use materials::ShowcaseMaterialsPlugin;
use reveal::RevealPlugin;
use scene::ShowcaseScenePlugin;
use settings::DebugSettings;
use ui::DebugUiPlugin;
use viewport::ViewportPlugin;

/// Plugin for the main application.
///
/// Expects a [`LaunchParams`] resource; defaults are used if none is present.
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        let params = app
            .world()
            .get_resource::<LaunchParams>()
            .cloned()
            .unwrap_or_default();

        let mut settings = DebugSettings::default();
        settings.hologram.color = params.car_color;

        app.insert_resource(params)
            .insert_resource(settings)
            .add_plugins((
                ShowcaseMaterialsPlugin,
                LoadingPlugin,
                ShowcaseScenePlugin,
                RevealPlugin,
                AnimationPlugin,
                OrbitCameraPlugin,
                ViewportPlugin,
                DebugUiPlugin,
            ));
    }
}
