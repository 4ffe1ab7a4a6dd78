//! Checkpoint error types.

use thiserror::Error;

/// Errors raised while encoding, decoding or applying a checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding to JSON or bincode failed
    #[error("Failed to encode checkpoint: {0}")]
    Encode(String),

    /// Decoding failed, including unknown marker names
    #[error("Failed to decode checkpoint: {0}")]
    Decode(String),

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The recorded position breaks `current <= max_reached`
    #[error("Checkpoint places current marker '{current}' beyond max reached '{max_reached}'")]
    InvalidPosition {
        current: &'static str,
        max_reached: &'static str,
    },
}
