//! Error types shared by the trainer core, configuration, and audio layers.

use thiserror::Error;

/// Result type for earwig operations.
pub type Result<T> = std::result::Result<T, TrainerError>;

/// Everything that can stop a session from starting or running.
#[derive(Error, Debug)]
pub enum TrainerError {
    /// Unrecognized interval code, bad session parameters, or a malformed level document.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required setting (the SoundFont path) was never provided.
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    /// The SoundFont or the audio output could not be brought up.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Terminal or file I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrainerError {
    /// Shorthand for building an [`TrainerError::InvalidInput`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        TrainerError::InvalidInput(msg.into())
    }
}
