//! Full-screen fade overlay.
//!
//! The vertex stage passes the quad's corners straight through as clip-space
//! positions at the near plane, so the quad covers the viewport regardless of
//! the camera.

use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::pbr::{Material, MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, SpecializedMeshPipelineError,
};
use bevy::shader::ShaderRef;

/// Asset path of the overlay vertex/fragment program.
pub const OVERLAY_SHADER_PATH: &str = "shaders/overlay.wgsl";

/// View-depth bias that sorts the overlay after every other transparent mesh.
const OVERLAY_DEPTH_BIAS: f32 = 1.0e6;

/// Black fade material with a single opacity uniform.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct OverlayMaterial {
    /// Opacity in `.x`; padded to 16 bytes for WebGL compatibility.
    #[uniform(0)]
    pub params: Vec4,
}

impl OverlayMaterial {
    /// A fully opaque overlay.
    pub fn opaque() -> Self {
        Self {
            params: Vec4::new(1.0, 0.0, 0.0, 0.0),
        }
    }

    /// Current opacity.
    pub fn alpha(&self) -> f32 {
        self.params.x
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.params.x = alpha;
    }
}

impl Material for OverlayMaterial {
    fn vertex_shader() -> ShaderRef {
        OVERLAY_SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        OVERLAY_SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn depth_bias(&self) -> f32 {
        OVERLAY_DEPTH_BIAS
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
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
