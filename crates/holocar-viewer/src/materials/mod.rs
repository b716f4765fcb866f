//! Custom shader materials used by the showcase.
//!
//! The hologram material is applied to the car; the overlay material drives
//! the full-screen fade. The two base meshes use `StandardMaterial`.

mod hologram;
mod overlay;

use bevy::prelude::*;

pub use hologram::{HOLOGRAM_SHADER_PATH, HologramMaterial, HologramParams};
pub use overlay::{OVERLAY_SHADER_PATH, OverlayMaterial};

/// Plugin that registers the showcase materials.
pub struct ShowcaseMaterialsPlugin;

impl Plugin for ShowcaseMaterialsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MaterialPlugin::<HologramMaterial>::default(),
            MaterialPlugin::<OverlayMaterial>::default(),
        ));
    }
}

/// Handles to the live material instances, created once at startup.
#[derive(Resource, Debug, Clone)]
pub struct ShowcaseMaterials {
    pub hologram: Handle<HologramMaterial>,
    pub base: Handle<StandardMaterial>,
    pub base_2: Handle<StandardMaterial>,
    pub overlay: Handle<OverlayMaterial>,
}
