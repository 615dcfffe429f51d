//! Error type shared by every engine component

use thiserror::Error;

/// Represents errors that can occur while scheduling, executing or exporting pricing work.
///
/// Task-level failures (`PricingFailed`, `InvalidPrice`) never escape the execution unit
/// that produced them: they are folded into a FAILED price record. Resource failures
/// (`Io`) are returned to the caller of the export or open operation.
///
/// # Examples
///
/// ```
/// use pricingengine::PricingError;
///
/// let error = PricingError::PricingFailed {
///     product: "RTX-4090".to_string(),
///     message: "no competitor data".to_string(),
/// };
/// assert_eq!(error.to_string(), "Pricing failed for RTX-4090: no competitor data");
/// ```
#[derive(Debug, Error)]
pub enum PricingError {
    /// The pricing function could not produce a price for the given inputs.
    #[error("Pricing failed for {product}: {message}")]
    PricingFailed {
        /// Product identifier the task was working on
        product: String,
        /// Explanation reported by the pricing function
        message: String,
    },

    /// A computed price was zero, negative, NaN or infinite.
    #[error("Invalid price for {product}: {price}")]
    InvalidPrice {
        /// Product identifier the price was computed for
        product: String,
        /// The rejected price
        price: f64,
    },

    /// Error indicating a field has an invalid value.
    #[error("Invalid value for field {field}: {value}")]
    InvalidFieldValue {
        /// The name of the field with the invalid value
        field: String,
        /// The invalid value as a string representation
        value: String,
    },

    /// Configuration values are inconsistent or out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Explanation of the rejected setting
        message: String,
    },

    /// Error indicating an operation cannot be performed in the current state.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Explanation of why the operation is invalid
        message: String,
    },

    /// A log, export or configuration destination could not be opened or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path (or destination label) that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Error raised when serialization of internal data structures fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Descriptive message with the serialization failure details
        message: String,
    },

    /// Error raised when deserialization of external data into internal structures fails.
    #[error("Deserialization error: {message}")]
    DeserializationError {
        /// Descriptive message with the deserialization failure details
        message: String,
    },

    /// Error raised when a checksum validation fails while restoring a snapshot.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The checksum that was expected according to the serialized payload
        expected: String,
        /// The checksum that was computed from the provided payload
        actual: String,
    },
}

impl PricingError {
    /// Wraps an I/O error together with the destination it happened on.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        PricingError::Io {
            path: path.into(),
            source,
        }
    }
}
