//! Checkpoints of a stage's progression.
//!
//! A checkpoint captures where a user stands in a stage so an external
//! store can persist it and a later session can resume. The engine never
//! writes checkpoints anywhere itself; it only produces and accepts them.

use crate::core::Marker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a progression engine's position.
///
/// Gates, locals and subscribers are not part of a checkpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<M: Marker> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Marker current at checkpoint time
    pub current: M,

    /// Furthest marker reached so far
    pub max_reached: M,

    /// Number of applied step changes
    pub transitions: usize,
}

impl<M: Marker> Checkpoint<M> {
    /// Create a checkpoint with a fresh id and the current time.
    pub fn new(current: M, max_reached: M, transitions: usize) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            current,
            max_reached,
            transitions,
        }
    }

    /// Check the version and the `current <= max_reached` invariant.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        if self.current.index() > self.max_reached.index() {
            return Err(CheckpointError::InvalidPosition {
                current: self.current.name(),
                max_reached: self.max_reached.name(),
            });
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::Decode(e.to_string()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::Decode(e.to_string()))
    }
}
