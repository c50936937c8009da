//! Error types for QA band masking.

use thiserror::Error;

/// Result type alias using QaMaskError.
pub type Result<T> = std::result::Result<T, QaMaskError>;

/// Errors that can occur while describing bit fields, building profiles
/// or computing masks.
///
/// Every variant is raised before a grid scan starts, so a failed call
/// never yields a partial mask.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QaMaskError {
    // === Descriptor Errors ===
    /// The bit field does not fit inside a 32-bit code, or has zero length.
    #[error("invalid bit field: position {position}, length {length} (requires length >= 1, length < 32 and position + length <= 32)")]
    InvalidFieldDescriptor { position: u32, length: u32 },

    // === Profile Errors ===
    /// The requested condition is not defined by the active sensor profile.
    #[error("unknown condition '{condition}' for sensor profile '{profile}'")]
    UnknownCondition { condition: String, profile: String },

    /// Two conditions of one profile share bits.
    #[error("conditions '{first}' and '{second}' have overlapping bit ranges")]
    OverlappingFields { first: String, second: String },

    /// A condition name was declared twice in one profile.
    #[error("condition '{0}' is declared more than once")]
    DuplicateCondition(String),

    /// No profile is registered under the given sensor name.
    #[error("unknown sensor: {0}")]
    UnknownSensor(String),

    // === Query Errors ===
    /// A composite query was invoked with no conditions.
    #[error("condition list is empty")]
    EmptyConditionList,

    /// A comparison operator string could not be parsed.
    #[error("invalid comparison operator: {0}")]
    InvalidOperator(String),

    /// A symbolic condition value (e.g. "high") could not be resolved.
    #[error("invalid value '{value}' for condition '{condition}'")]
    InvalidConditionValue { condition: String, value: String },

    /// A textual condition term is not of the form `name=value`.
    #[error("malformed condition '{0}': expected name=value")]
    MalformedCondition(String),

    // === Grid Errors ===
    /// The buffer length does not match the declared dimensions.
    #[error("grid buffer has {len} cells but dimensions are {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    /// A grid with a zero dimension.
    #[error("grid dimensions must be positive")]
    EmptyGrid,

    /// Invalid masker configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl QaMaskError {
    /// Create an InvalidFieldDescriptor error.
    pub fn invalid_field(position: u32, length: u32) -> Self {
        Self::InvalidFieldDescriptor { position, length }
    }

    /// Create an UnknownCondition error.
    pub fn unknown_condition(condition: impl Into<String>, profile: impl Into<String>) -> Self {
        Self::UnknownCondition {
            condition: condition.into(),
            profile: profile.into(),
        }
    }

    /// Create an OverlappingFields error.
    pub fn overlapping(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::OverlappingFields {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an InvalidConditionValue error.
    pub fn invalid_value(condition: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidConditionValue {
            condition: condition.into(),
            value: value.into(),
        }
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
