//! Game action sum type
//!
//! One variant per action kind the rule engine can offer. Each variant
//! carries only the fields that kind needs; field-less kinds (phase and
//! turn boundaries) stay field-less so two distinct kinds can never
//! serialize to colliding signatures.

use serde::{Deserialize, Serialize};

/// An atomic move an automated player can make
///
/// This engine never interprets what an action *does*; it only groups,
/// ranks and validates actions against the legal set supplied by the
/// external rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    /// Play an action card from hand
    PlayAction { card: String },
    /// Play a treasure card from hand
    PlayTreasure { card: String },
    /// Buy a card from the supply
    BuyCard { card: String },
    /// Gain a card outside the buy phase (effect resolution)
    GainCard { card: String },
    /// Discard a card (effect resolution)
    DiscardCard { card: String },
    /// Trash a card (effect resolution)
    TrashCard { card: String },
    /// Reveal a reaction card in response to an opponent's play
    React { card: String },
    /// Advance to the next phase of the current turn
    EndPhase,
    /// End the current turn
    EndTurn,
}

impl GameAction {
    /// The string tag of this action kind
    pub fn kind(&self) -> &'static str {
        match self {
            GameAction::PlayAction { .. } => "play_action",
            GameAction::PlayTreasure { .. } => "play_treasure",
            GameAction::BuyCard { .. } => "buy_card",
            GameAction::GainCard { .. } => "gain_card",
            GameAction::DiscardCard { .. } => "discard_card",
            GameAction::TrashCard { .. } => "trash_card",
            GameAction::React { .. } => "react",
            GameAction::EndPhase => "end_phase",
            GameAction::EndTurn => "end_turn",
        }
    }

    /// The card this action targets, if its kind has one
    pub fn card(&self) -> Option<&str> {
        match self {
            GameAction::PlayAction { card }
            | GameAction::PlayTreasure { card }
            | GameAction::BuyCard { card }
            | GameAction::GainCard { card }
            | GameAction::DiscardCard { card }
            | GameAction::TrashCard { card }
            | GameAction::React { card } => Some(card),
            GameAction::EndPhase | GameAction::EndTurn => None,
        }
    }
}

impl std::fmt::Display for GameAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.card() {
            Some(card) => write!(f, "{}({})", self.kind(), card),
            None => write!(f, "{}", self.kind()),
        }
    }
}
