//! Build errors for stage construction.

use crate::core::VocabularyError;
use thiserror::Error;

/// Errors that can occur when building a progression engine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Fact source not specified. Call .facts(source) before .build()")]
    MissingFactSource,

    #[error("Step vocabulary is invalid ({} violation(s)): {}", .0.len(), describe(.0))]
    InvalidVocabulary(Vec<VocabularyError>),
}

fn describe(violations: &[VocabularyError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
