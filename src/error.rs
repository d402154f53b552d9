//! Error types for the estimable library
//!
//! The component contract itself cannot fail at runtime: a correction of the wrong type
//! is rejected by the compiler. The errors below only cover the flat error-state plumbing
//! (coordinate conversion and [`ErrorStateLayout`](crate::component::layout::ErrorStateLayout)).

use thiserror::Error;

/// Main result type used throughout the estimable library
pub type EstimableResult<T> = Result<T, EstimableError>;

/// Main error type for the estimable library
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimableError {
    /// A flat coordinate slice does not match the size a correction expects
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// No block with this name is registered in the layout
    #[error("Unknown error-state block: {0}")]
    UnknownBlock(String),

    /// A block with this name is already registered in the layout
    #[error("Duplicate error-state block: {0}")]
    DuplicateBlock(String),

    /// The block cannot be registered (zero or unknown degrees of freedom)
    #[error("Invalid error-state block: {0}")]
    InvalidBlock(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EstimableError::DimensionMismatch {
            expected: 3,
            actual: 4,
        };
        assert_eq!(error.to_string(), "Dimension mismatch: expected 3, got 4");

        let error = EstimableError::UnknownBlock("imu".to_string());
        assert_eq!(error.to_string(), "Unknown error-state block: imu");
    }

    #[test]
    fn test_result_err() {
        let result: EstimableResult<()> = Err(EstimableError::DuplicateBlock("cam0".into()));
        assert!(matches!(result, Err(EstimableError::DuplicateBlock(name)) if name == "cam0"));
    }
}
