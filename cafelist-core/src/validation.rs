//! Validation error types for domain models

use thiserror::Error;

/// Validation error for domain newtypes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Field exceeds maximum length
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 255 characters"
        );
        let err = ValidationError::Empty { field: "city" };
        assert_eq!(err.to_string(), "city cannot be empty");
    }
}
