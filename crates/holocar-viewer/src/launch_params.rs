//! Launch parameter parsing for the viewer.
//!
//! On native, parameters are parsed from command-line arguments using clap.
//! On WASM, defaults are used (CLI argument parsing is not available).

use bevy::prelude::*;

use crate::settings::DEFAULT_CAR_COLOR;

/// Default scene file, relative to the asset root.
pub const DEFAULT_MODEL_PATH: &str = "models/spacecar.glb";

/// Launch parameters for the viewer.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LaunchParams {
    /// Scene file to load, relative to the asset root.
    pub model_path: String,
    /// Initial hologram color.
    pub car_color: Srgba,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            car_color: DEFAULT_CAR_COLOR,
        }
    }
}

#[cfg(not(target_family = "wasm"))]
mod native {
    use clap::Parser;

    use super::*;
    use crate::settings::parse_hex_color;

    const DEFAULT_CAR_COLOR_HEX: &str = "#ff0066";

    fn parse_color(s: &str) -> Result<Srgba, String> {
        parse_hex_color(s).map_err(|e| e.to_string())
    }

    #[derive(Parser)]
    #[command(about = "Hologram car showcase")]
    pub(super) struct CliArgs {
        /// Scene file to load, relative to the asset directory.
        #[arg(long = "model", default_value = DEFAULT_MODEL_PATH)]
        model_path: String,

        /// Initial hologram color (format: #rrggbb).
        #[arg(long, value_parser = parse_color, default_value = DEFAULT_CAR_COLOR_HEX)]
        car_color: Srgba,
    }

    impl From<CliArgs> for LaunchParams {
        fn from(args: CliArgs) -> Self {
            Self {
                model_path: args.model_path,
                car_color: args.car_color,
            }
        }
    }

    pub fn parse() -> LaunchParams {
        CliArgs::parse().into()
    }

}

/// Parse launch parameters from CLI args (native) or use defaults (WASM).
pub fn parse() -> LaunchParams {
    #[cfg(not(target_family = "wasm"))]
    {
        native::parse()
    }
    #[cfg(target_family = "wasm")]
    {
        LaunchParams::default()
    }
}
