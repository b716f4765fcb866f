//! Holographic material for the car.
//!
//! A time-driven vertex glitch plus scan-line stripes and a fresnel rim in the
//! fragment stage. Rendered double-sided with additive blending, so it never
//! writes depth and never casts shadows.

use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::pbr::{Material, MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderType, SpecializedMeshPipelineError,
};
use bevy::shader::ShaderRef;

use crate::settings::HologramSettings;

/// Asset path of the hologram vertex/fragment program.
pub const HOLOGRAM_SHADER_PATH: &str = "shaders/hologram.wgsl";

/// Uniform block consumed by `hologram.wgsl`.
#[derive(ShaderType, Debug, Clone, Copy, PartialEq)]
pub struct HologramParams {
    /// Linear RGB tint; alpha is ignored.
    pub color: LinearRgba,
    /// Seconds since the session started.
    pub time: f32,
    pub glitch_strength: f32,
    /// First sine frequency multiplier of the glitch wave.
    pub sin_factor_1: f32,
    /// Second sine frequency multiplier of the glitch wave.
    pub sin_factor_2: f32,
    pub smoothstep_min: f32,
    pub smoothstep_max: f32,
}

/// The car's hologram material.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct HologramMaterial {
    #[uniform(0)]
    pub params: HologramParams,
}

impl HologramMaterial {
    /// Build the material from panel settings with the clock at zero.
    pub fn from_settings(settings: &HologramSettings) -> Self {
        let mut material = Self {
            params: HologramParams {
                color: LinearRgba::BLACK,
                time: 0.0,
                glitch_strength: 0.0,
                sin_factor_1: 0.0,
                sin_factor_2: 0.0,
                smoothstep_min: 0.0,
                smoothstep_max: 0.0,
            },
        };
        settings.apply(&mut material);
        material
    }
}

impl Default for HologramMaterial {
    fn default() -> Self {
        Self::from_settings(&HologramSettings::default())
    }
}

impl Material for HologramMaterial {
    fn vertex_shader() -> ShaderRef {
        HOLOGRAM_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        HOLOGRAM_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }

    fn enable_shadows() -> bool {
        false
    }

    fn enable_prepass() -> bool {
        false
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // Double-sided: back faces contribute to the hologram too.
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_settings() {
        let material = HologramMaterial::default();
        assert_eq!(material.params.time, 0.0);
        assert_eq!(material.params.glitch_strength, 0.25);
        assert_eq!(material.params.sin_factor_1, 5.45);
        assert_eq!(material.params.sin_factor_2, 10.76);
        assert_eq!(material.params.smoothstep_min, 0.3);
        assert_eq!(material.params.smoothstep_max, 1.0);
    }

    #[test]
    fn test_blends_additively() {
        assert_eq!(HologramMaterial::default().alpha_mode(), AlphaMode::Add);
    }
}
