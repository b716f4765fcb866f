//! Viewport handling: pixel ratio cap and projection aspect on resize.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

/// Highest device pixel ratio the viewer renders at.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Plugin for viewport resize handling.
pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (limit_pixel_ratio, update_aspect_ratio));
    }
}

/// Pixel ratio actually used for a display with the given ratio.
pub fn clamp_pixel_ratio(ratio: f32) -> f32 {
    ratio.min(MAX_PIXEL_RATIO)
}

/// Override needed to render a display of `ratio` at the clamped ratio.
pub fn pixel_ratio_override(ratio: f32) -> Option<f32> {
    let clamped = clamp_pixel_ratio(ratio);
    (clamped < ratio).then_some(clamped)
}

/// Width over height, or `None` for a collapsed viewport.
pub fn aspect_ratio(width: f32, height: f32) -> Option<f32> {
    (width > 0.0 && height > 0.0).then(|| width / height)
}

/// Cap the primary window's scale factor at [`MAX_PIXEL_RATIO`].
fn limit_pixel_ratio(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in &mut windows {
        let base = window.resolution.base_scale_factor();
        let wanted = pixel_ratio_override(base);
        if window.resolution.scale_factor_override() != wanted {
            tracing::debug!("Device pixel ratio {base}, rendering at {}", clamp_pixel_ratio(base));
            window.resolution.set_scale_factor_override(wanted);
        }
    }
}

/// Keep perspective projections in step with the primary window's shape.
fn update_aspect_ratio(
    mut resized: MessageReader<WindowResized>,
    primary: Query<(), With<PrimaryWindow>>,
    mut projections: Query<&mut Projection>,
) {
    let Some(aspect) = resized
        .read()
        .filter(|event| primary.contains(event.window))
        .last()
        .and_then(|event| aspect_ratio(event.width, event.height))
    else {
        return;
    };

    for mut projection in &mut projections {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = aspect;
        }
    }
}
