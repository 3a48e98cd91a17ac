//! Diagnostics produced by field validators.

use thiserror::Error;

/// A validation failure for a single configuration field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is not one of the field's allowed values.
    #[error("{value} is an invalid value for argument {field}")]
    InvalidValue { value: String, field: String },
}
