// models/src/errors.rs

pub use thiserror::Error;

/// A validation error raised while turning form input into a write payload.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field was submitted empty.
    #[error("required field '{0}' is empty")]
    MissingRequired(String),
    /// A field declared as an integer did not parse as one.
    #[error("field '{0}' is not a valid integer")]
    InvalidInteger(String),
    /// A field declared as a decimal did not parse as one.
    #[error("field '{0}' is not a valid decimal")]
    InvalidDecimal(String),
    /// A value outside the declared set was provided for an enum field.
    #[error("'{value}' is not a valid {what}")]
    UnknownValue { what: &'static str, value: String },
    /// The record under edit carries no server-assigned id.
    #[error("record has no id")]
    MissingId,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("row decoding error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A type alias for a `Result` that returns a `ModelError` on failure.
pub type ModelResult<T> = Result<T, ModelError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;
