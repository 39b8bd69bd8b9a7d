//! Identity validator capability.
//!
//! Policy for what makes an organization name or hostname acceptable lives
//! outside this workspace; the factory only calls through this trait.

use thiserror::Error;

/// Reason a validator refused a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ValidationError {
    reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Pass, or fail with a human-readable reason.
pub type ValidationOutcome = std::result::Result<(), ValidationError>;

/// Checks an untrusted identity string before it reaches the encoder.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &str) -> ValidationOutcome;
}

impl<T: Validator + ?Sized> Validator for &T {
    fn validate(&self, value: &str) -> ValidationOutcome {
        (**self).validate(value)
    }
}

impl<T: Validator + ?Sized> Validator for std::sync::Arc<T> {
    fn validate(&self, value: &str) -> ValidationOutcome {
        (**self).validate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NonEmpty;

    impl Validator for NonEmpty {
        fn validate(&self, value: &str) -> ValidationOutcome {
            if value.is_empty() {
                return Err(ValidationError::new("value must not be empty"));
            }
            Ok(())
        }
    }

    #[test]
    fn test_validator_outcomes() {
        assert!(NonEmpty.validate("example.com").is_ok());
        let err = NonEmpty.validate("").unwrap_err();
        assert_eq!(err.reason(), "value must not be empty");
        assert_eq!(err.to_string(), "value must not be empty");
    }

    #[test]
    fn test_validator_through_reference_and_arc() {
        fn check<V: Validator>(validator: V, value: &str) -> ValidationOutcome {
            validator.validate(value)
        }

        assert!(check(&NonEmpty, "example.com").is_ok());
        assert!(check(&NonEmpty, "").is_err());

        let shared: std::sync::Arc<dyn Validator> = std::sync::Arc::new(NonEmpty);
        assert!(check(shared.clone(), "example.com").is_ok());
        assert!(check(&*shared, "").is_err());
    }
}
