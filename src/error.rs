//! Error types for nutricalc

use thiserror::Error;

/// Errors that can occur at the crate's parsing and IO seams.
///
/// The computational core itself never errors: absent optional inputs
/// degrade to `None` fields and guarded denominators.
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse input record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    CatalogError(String),
}
