use thiserror::Error;

/// Raised when a character cannot be built from its settings or collider.
///
/// This is the only error the controller produces. Query misses and rejected
/// requests are ordinary control flow and never surface here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("character has no collider to derive a ground probe from")]
    MissingCollider,

    #[error("collider shape `{shape}` is not supported by the ground probe")]
    UnsupportedCollider { shape: &'static str },

    #[error("collider dimension `{name}` must be finite and positive, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },

    #[error("setting `{name}` is out of range: {value}")]
    InvalidSetting { name: &'static str, value: f32 },
}
