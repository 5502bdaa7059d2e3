//! Error types for the policy module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for policy operations
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Input is not valid JSON
    #[error("Invalid policy JSON: {0}")]
    InvalidJson(String),

    /// Policy file could not be read
    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::InvalidJson(err.to_string())
    }
}

impl From<PolicyError> for CrateError {
    fn from(err: PolicyError) -> Self {
        CrateError::Policy(err.to_string())
    }
}
