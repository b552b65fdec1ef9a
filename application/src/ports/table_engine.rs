//! Table engine port
//!
//! Interface to the external card-game rule engine. The consensus engine
//! never interprets rules itself: it reads the legal-action list, applies
//! the winning action through this port, and asks again.

use gambit_domain::{GameAction, PlayerId};
use thiserror::Error;

/// Errors surfaced by the rule engine when applying an action
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("action rejected by rule engine: {0}")]
    Rejected(String),

    #[error("rule engine error: {0}")]
    Internal(String),
}

/// A decision the rule engine is waiting on mid-effect
///
/// E.g. "discard down to 3" while resolving an attack: the engine keeps
/// offering a legal set until the chain is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDecision {
    /// The player who must decide
    pub player: PlayerId,
    /// Engine-supplied description of the pending choice
    pub prompt: String,
}

/// The external rule engine, seen through the eyes of the turn driver
///
/// Mutated only after a round fully resolves, never concurrently with an
/// in-flight round.
pub trait TableEngine: Send {
    /// Legal actions at the current decision point
    fn legal_actions(&self) -> Vec<GameAction>;

    /// Apply a winning action for a player; all-or-nothing
    fn apply(&mut self, player: &PlayerId, action: &GameAction) -> Result<(), EngineError>;

    /// The sub-decision currently awaiting resolution, if any
    fn pending_decision(&self) -> Option<PendingDecision>;

    /// The player currently holding the turn
    fn turn_holder(&self) -> PlayerId;

    /// Engine-defined phase label, for logging only
    fn phase(&self) -> String;

    /// Whether the game has ended
    fn is_over(&self) -> bool;

    /// Serialized state handed to voters as context
    fn snapshot(&self) -> String;
}
