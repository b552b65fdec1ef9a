//! Proposals and canonical action signatures
//!
//! A voter returns a [`ProposedAction`]: the action itself plus optional
//! free-text rationale. Rationale never participates in identity — two
//! proposals are the same vote iff their [`ActionSignature`]s are equal.

use super::game_action::GameAction;
use serde::{Deserialize, Serialize};

/// One voter's proposed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedAction {
    /// The action being proposed
    pub action: GameAction,
    /// Free-text reasoning from the voter; ignored for grouping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl ProposedAction {
    pub fn new(action: GameAction) -> Self {
        Self {
            action,
            rationale: None,
        }
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Canonical, rationale-stripped signature of this proposal
    pub fn signature(&self) -> ActionSignature {
        ActionSignature::of(&self.action)
    }
}

impl From<GameAction> for ProposedAction {
    fn from(action: GameAction) -> Self {
        Self::new(action)
    }
}

/// Canonical serialization of a [`GameAction`]
///
/// Built from the internally tagged JSON form, which is deterministic for
/// a given action value. `Ord` on the underlying string gives the
/// lexicographic tie-break used by the winner selector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionSignature(String);

impl ActionSignature {
    /// Compute the signature of an action
    pub fn of(action: &GameAction) -> Self {
        // Serializing a tagged enum with fixed field order cannot fail.
        let canonical = serde_json::to_string(action)
            .expect("GameAction serialization is infallible");
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check an action against the externally supplied legal-action list
///
/// Membership is signature equality: same kind, and the same card field
/// where the kind carries one. Field-less kinds match by kind alone since
/// their signatures hold nothing else.
pub fn is_legal(action: &GameAction, legal_actions: &[GameAction]) -> bool {
    let sig = ActionSignature::of(action);
    legal_actions.iter().any(|l| ActionSignature::of(l) == sig)
}
