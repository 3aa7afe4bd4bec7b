//! Error types for the galaxy experience

use thiserror::Error;

/// The main error type for galaxy operations
#[derive(Debug, Error)]
pub enum GalaxyError {
    /// Malformed layer configuration, raised at generation time.
    /// Fatal to the offending layer only.
    #[error("Invalid descriptor for layer '{layer}': {reason}")]
    InvalidDescriptor { layer: String, reason: String },

    /// The sprite texture could not be fetched or decoded
    #[error("Failed to load texture '{path}': {reason}")]
    TextureLoad { path: String, reason: String },

    /// The host element the experience should mount into does not exist
    #[error("Container element not found: {0}")]
    MissingContainer(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl GalaxyError {
    pub fn invalid_descriptor(layer: impl Into<String>, reason: impl Into<String>) -> Self {
        GalaxyError::InvalidDescriptor {
            layer: layer.into(),
            reason: reason.into(),
        }
    }

    pub fn texture_load(path: impl Into<String>, reason: impl ToString) -> Self {
        GalaxyError::TextureLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for galaxy operations
pub type Result<T> = std::result::Result<T, GalaxyError>;

impl From<toml::de::Error> for GalaxyError {
    fn from(err: toml::de::Error) -> Self {
        GalaxyError::Config(err.to_string())
    }
}
