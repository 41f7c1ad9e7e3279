//! Transition error types.

use affiliate_core::error::AffiliateError;
use thiserror::Error;

/// A state transition that was refused, either because the record was in
/// the wrong status or because the caller is on the wrong side of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// A re-raise lost its record to a concurrent change.
    #[error("Affiliation Request Failed")]
    Request,

    #[error("Approve Request Failed")]
    Approve,

    #[error("Reject Request Failed")]
    Reject,

    #[error("Cancel Request Failed")]
    Cancel,

    #[error("Revoke Request Failed")]
    Revoke,

    #[error("Remove Request Failed")]
    Remove,
}

impl TransitionError {
    /// Human-readable detail line returned alongside the message.
    pub fn detail(&self) -> &'static str {
        match self {
            TransitionError::Request => "Affiliation changed while requesting",
            TransitionError::Approve => "Invalid affiliation to approve",
            TransitionError::Reject => "Invalid affiliation to reject",
            TransitionError::Cancel => "Invalid affiliation to cancel",
            TransitionError::Revoke => "Invalid affiliation to revoke",
            TransitionError::Remove => "Invalid affiliation to remove",
        }
    }
}

impl From<TransitionError> for AffiliateError {
    fn from(err: TransitionError) -> Self {
        AffiliateError::InvalidAffiliation {
            message: err.to_string(),
            details: vec![err.detail().to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_invalid_affiliation() {
        let err: AffiliateError = TransitionError::Revoke.into();
        match err {
            AffiliateError::InvalidAffiliation { message, details } => {
                assert_eq!(message, "Revoke Request Failed");
                assert_eq!(details, vec!["Invalid affiliation to revoke"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn request_refusal_names_the_request() {
        let err: AffiliateError = TransitionError::Request.into();
        assert_eq!(err.to_string(), "Affiliation Request Failed");
    }
}
