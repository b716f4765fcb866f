//! Error types for the showcase scene.

use std::fmt;

/// Errors raised while wiring the loaded scene file into the showcase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStructureError {
    /// A node the showcase expects is not present in the scene file.
    MissingNode {
        /// The node name that was looked up.
        name: &'static str,
    },
    /// The node exists but has no mesh to assign a material to.
    NoMeshes {
        /// The node name that was looked up.
        name: &'static str,
    },
}

impl fmt::Display for AssetStructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNode { name } => {
                write!(f, "scene has no node named {name:?}")
            }
            Self::NoMeshes { name } => {
                write!(f, "node {name:?} has no meshes to assign a material to")
            }
        }
    }
}

impl std::error::Error for AssetStructureError {}

/// Errors from parsing launch parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A color was not a `#rrggbb` hex string.
    InvalidColor {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        detail: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { input, detail } => {
                write!(f, "invalid color {input:?}: {detail}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_node_display_names_the_node() {
        let err = AssetStructureError::MissingNode { name: "Car" };
        assert_eq!(err.to_string(), "scene has no node named \"Car\"");
    }

    #[test]
    fn test_invalid_color_display() {
        let err = ConfigError::InvalidColor {
            input: "#zz".to_string(),
            detail: "bad length".to_string(),
        };
        assert_eq!(err.to_string(), "invalid color \"#zz\": bad length");
    }
}
