//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// The two proposal errors are terminal for a round: the turn driver
/// catches them and stalls instead of retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no usable proposals: every voter failed before settling a vote")]
    NoUsableProposals,

    #[error("all proposals invalid: no vote group passed the legal-action filter")]
    AllProposalsInvalid,

    #[error("invalid provider: {0}")]
    InvalidProvider(String),

    #[error("round cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error is one of the two terminal round failures
    pub fn is_round_failure(&self) -> bool {
        matches!(
            self,
            DomainError::NoUsableProposals | DomainError::AllProposalsInvalid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "round cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::NoUsableProposals.is_cancelled());
        assert!(!DomainError::AllProposalsInvalid.is_cancelled());
    }

    #[test]
    fn test_round_failure_classification() {
        assert!(DomainError::NoUsableProposals.is_round_failure());
        assert!(DomainError::AllProposalsInvalid.is_round_failure());
        assert!(!DomainError::Cancelled.is_round_failure());
    }
}
