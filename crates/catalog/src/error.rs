//! Error types for the reference catalogue.

use behavior_core::CoreError;
use thiserror::Error;

/// Errors that can occur while configuring or using catalogue behaviors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A menu lookup failed.
    #[error("Unknown {kind}: {name}")]
    UnknownItem { kind: &'static str, name: String },

    /// Configuration values are unusable.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The dispenser chain could not reduce the amount to zero.
    #[error("Cannot dispense {requested}: {remainder} left over")]
    CannotDispense { requested: u64, remainder: u64 },

    /// Configuration JSON could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A core composition error.
    #[error(transparent)]
    Core(#[from] CoreError),
}
