use thiserror::Error;

use crate::domain::voice_agent::LinkState;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid agent link transition from {from:?} to {to:?}")]
    InvalidLinkTransition { from: LinkState, to: LinkState },
    #[error("business `{business_id}` does not belong to user `{user_id}`")]
    NotOwner { business_id: String, user_id: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("validation failure: {0}")]
    Validation(String),
    #[error("credential failure: {0}")]
    Credential(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("provider failure: {0}")]
    Provider(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// True when the failure is worth retrying by explicit user action
    /// (transient remote errors); validation and credential problems need
    /// a correction first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Provider(_))
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(_) | Self::Validation(_) => {
                "Some required business details are missing or invalid. Check inputs and try again."
            }
            Self::Credential(_) => {
                "The configured API credential was rejected. Correct it before proceeding."
            }
            Self::Persistence(_) | Self::Provider(_) => {
                "A remote service is temporarily unavailable. Please retry."
            }
            Self::Configuration(_) => "An unexpected configuration error occurred.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplicationError, DomainError};

    #[test]
    fn ownership_violation_is_not_retryable() {
        let error = ApplicationError::from(DomainError::NotOwner {
            business_id: "b-2".to_owned(),
            user_id: "u-1".to_owned(),
        });
        assert!(!error.is_retryable());
    }

    #[test]
    fn provider_failure_is_retryable_with_user_safe_message() {
        let error = ApplicationError::Provider("502 from agent service".to_owned());
        assert!(error.is_retryable());
        assert_eq!(
            error.user_message(),
            "A remote service is temporarily unavailable. Please retry."
        );
    }

    #[test]
    fn credential_failure_asks_for_correction() {
        let error = ApplicationError::Credential("401 unauthorized".to_owned());
        assert!(!error.is_retryable());
        assert_eq!(
            error.user_message(),
            "The configured API credential was rejected. Correct it before proceeding."
        );
    }
}
