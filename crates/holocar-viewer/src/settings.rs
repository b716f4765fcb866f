//! Tunable material parameters.
//!
//! [`DebugSettings`] is the single owner of every value the debug panel edits.
//! The panel mutates it and then mirrors the affected group into the live
//! material with one of the `apply` methods.

use bevy::prelude::*;

use crate::{error::ConfigError, materials::HologramMaterial};

/// Default hologram color (`#ff0066`).
pub const DEFAULT_CAR_COLOR: Srgba = Srgba::rgb(1.0, 0.0, 0.4);

/// Parse a `#rrggbb` (or bare `rrggbb`) string into an sRGB color.
pub fn parse_hex_color(input: &str) -> Result<Srgba, ConfigError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 {
        return Err(ConfigError::InvalidColor {
            input: input.to_string(),
            detail: format!("expected 6 hex digits, got {}", digits.len()),
        });
    }
    Srgba::hex(digits).map_err(|e| ConfigError::InvalidColor {
        input: input.to_string(),
        detail: e.to_string(),
    })
}

/// Format a color as `#rrggbb`.
pub fn to_hex(color: Srgba) -> String {
    let [r, g, b] = color.to_u8_array_no_alpha();
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Parameters of the hologram shader that the panel can change.
#[derive(Debug, Clone, PartialEq)]
pub struct HologramSettings {
    pub color: Srgba,
    pub glitch_strength: f32,
    pub sin_factor_1: f32,
    pub sin_factor_2: f32,
    pub smoothstep_min: f32,
    pub smoothstep_max: f32,
}

impl Default for HologramSettings {
    fn default() -> Self {
        Self {
            color: DEFAULT_CAR_COLOR,
            glitch_strength: 0.25,
            sin_factor_1: 5.45,
            sin_factor_2: 10.76,
            smoothstep_min: 0.3,
            smoothstep_max: 1.0,
        }
    }
}

impl HologramSettings {
    /// Copy every panel-owned value into the material.
    ///
    /// The time uniform is left alone; only the render loop writes it.
    pub fn apply(&self, material: &mut HologramMaterial) {
        let params = &mut material.params;
        params.color = LinearRgba::from(self.color);
        params.glitch_strength = self.glitch_strength;
        params.sin_factor_1 = self.sin_factor_1;
        params.sin_factor_2 = self.sin_factor_2;
        params.smoothstep_min = self.smoothstep_min;
        params.smoothstep_max = self.smoothstep_max;
    }
}

/// Physically based surface parameters for one of the base meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSettings {
    pub metalness: f32,
    pub roughness: f32,
    pub color: Srgba,
    pub transmission: f32,
    pub ior: f32,
}

impl SurfaceSettings {
    /// Surface of the `Base` node.
    pub fn base() -> Self {
        Self {
            metalness: 0.847,
            roughness: 0.352,
            color: Srgba::rgb_u8(0x6d, 0x17, 0x4e),
            transmission: 0.044,
            ior: 1.45,
        }
    }

    /// Surface of the `Base-2` node.
    pub fn base_2() -> Self {
        Self {
            metalness: 0.604,
            roughness: 0.255,
            color: Srgba::rgb_u8(0xff, 0xa5, 0x00),
            transmission: 0.0,
            ior: 1.5,
        }
    }

    /// Build an opaque standard material from these settings.
    pub fn to_material(&self) -> StandardMaterial {
        let mut material = StandardMaterial {
            alpha_mode: AlphaMode::Opaque,
            ..default()
        };
        self.apply(&mut material);
        material
    }

    /// Copy the settings into an existing material.
    pub fn apply(&self, material: &mut StandardMaterial) {
        material.base_color = Color::Srgba(self.color);
        material.metallic = self.metalness;
        material.perceptual_roughness = self.roughness;
        material.specular_transmission = self.transmission;
        material.ior = self.ior;
    }
}

/// Every value exposed by the debug panel, grouped by material.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DebugSettings {
    pub hologram: HologramSettings,
    pub base: SurfaceSettings,
    pub base_2: SurfaceSettings,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            hologram: HologramSettings::default(),
            base: SurfaceSettings::base(),
            base_2: SurfaceSettings::base_2(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_with_and_without_hash() {
        let with = parse_hex_color("#ff0066").unwrap();
        let without = parse_hex_color("ff0066").unwrap();
        assert_eq!(with, without);
        assert_eq!(with.to_u8_array_no_alpha(), [0xff, 0x00, 0x66]);
    }

    #[test]
    fn test_parse_hex_color_rejects_short_input() {
        let err = parse_hex_color("#fff").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { .. }));
    }

    #[test]
    fn test_parse_hex_color_rejects_non_hex() {
        assert!(parse_hex_color("#gg0066").is_err());
    }

    #[test]
    fn test_default_car_color_is_ff0066() {
        assert_eq!(to_hex(DEFAULT_CAR_COLOR), "#ff0066");
    }

    #[test]
    fn test_hex_round_trip() {
        for hex in ["#ff0066", "#6d174e", "#ffa500", "#000000", "#ffffff"] {
            let color = parse_hex_color(hex).unwrap();
            assert_eq!(to_hex(color), hex);
        }
    }

    #[test]
    fn test_hologram_apply_leaves_time_alone() {
        let mut material = HologramMaterial::default();
        material.params.time = 12.5;
        let settings = HologramSettings {
            glitch_strength: 0.9,
            ..default()
        };
        settings.apply(&mut material);
        assert_eq!(material.params.time, 12.5);
        assert_eq!(material.params.glitch_strength, 0.9);
        assert_eq!(material.params.sin_factor_1, 5.45);
    }

    #[test]
    fn test_surface_to_material() {
        let material = SurfaceSettings::base().to_material();
        assert_eq!(material.metallic, 0.847);
        assert_eq!(material.perceptual_roughness, 0.352);
        assert_eq!(material.specular_transmission, 0.044);
        assert_eq!(material.ior, 1.45);
        assert_eq!(material.alpha_mode, AlphaMode::Opaque);
        assert_eq!(
            material.base_color.to_srgba().to_u8_array_no_alpha(),
            [0x6d, 0x17, 0x4e]
        );
    }
}
