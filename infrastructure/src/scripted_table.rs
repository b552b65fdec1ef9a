//! Scripted table fixture
//!
//! A [`TableEngine`] adapter that replays externally authored decision
//! points instead of interpreting game rules. Each point carries the
//! legal set the real engine would offer, an optional pending-decision
//! prompt, and a phase label. Applying a winner advances the script and
//! rejects anything outside the offered set.

use gambit_application::ports::table_engine::{EngineError, PendingDecision, TableEngine};
use gambit_domain::{GameAction, PlayerId, is_legal};
use serde_json::json;

/// One authored decision point
#[derive(Debug, Clone)]
pub struct DecisionPoint {
    pub legal: Vec<GameAction>,
    pub pending_prompt: Option<String>,
    pub phase: &'static str,
}

impl DecisionPoint {
    pub fn new(phase: &'static str, legal: Vec<GameAction>) -> Self {
        Self {
            legal,
            pending_prompt: None,
            phase,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.pending_prompt = Some(prompt.into());
        self
    }
}

/// Rule-engine stand-in replaying a canned script
pub struct ScriptedTable {
    player: PlayerId,
    script: Vec<DecisionPoint>,
    cursor: usize,
    applied: Vec<GameAction>,
}

impl ScriptedTable {
    pub fn new(player: PlayerId, script: Vec<DecisionPoint>) -> Self {
        Self {
            player,
            script,
            cursor: 0,
            applied: Vec::new(),
        }
    }

    /// A canned turn: play an action, weather a discard chain, play
    /// treasures, buy, and end the turn.
    pub fn demo_turn(player: PlayerId) -> Self {
        let play = |card: &str| GameAction::PlayAction { card: card.into() };
        let treasure = |card: &str| GameAction::PlayTreasure { card: card.into() };
        let buy = |card: &str| GameAction::BuyCard { card: card.into() };
        let discard = |card: &str| GameAction::DiscardCard { card: card.into() };

        let script = vec![
            DecisionPoint::new(
                "action",
                vec![play("Smithy"), play("Village"), GameAction::EndPhase],
            ),
            DecisionPoint::new("action", vec![discard("Copper"), discard("Estate")])
                .with_prompt("discard down to 3 (2 to go)"),
            DecisionPoint::new("action", vec![discard("Estate")])
                .with_prompt("discard down to 3 (1 to go)"),
            DecisionPoint::new("action", vec![GameAction::EndPhase]),
            DecisionPoint::new(
                "buy",
                vec![treasure("Gold"), treasure("Silver"), GameAction::EndPhase],
            ),
            DecisionPoint::new("buy", vec![treasure("Silver"), GameAction::EndPhase]),
            DecisionPoint::new(
                "buy",
                vec![buy("Province"), buy("Gold"), buy("Duchy"), GameAction::EndPhase],
            ),
            DecisionPoint::new("cleanup", vec![GameAction::EndTurn]),
        ];
        Self::new(player, script)
    }

    /// Actions applied so far, in order
    pub fn applied(&self) -> &[GameAction] {
        &self.applied
    }

    fn current(&self) -> Option<&DecisionPoint> {
        self.script.get(self.cursor)
    }
}

impl TableEngine for ScriptedTable {
    fn legal_actions(&self) -> Vec<GameAction> {
        self.current().map(|p| p.legal.clone()).unwrap_or_default()
    }

    fn apply(&mut self, player: &PlayerId, action: &GameAction) -> Result<(), EngineError> {
        if *player != self.player {
            return Err(EngineError::Rejected(format!(
                "not {}'s turn",
                player.as_str()
            )));
        }
        let Some(point) = self.current() else {
            return Err(EngineError::Rejected("script exhausted".into()));
        };
        if !is_legal(action, &point.legal) {
            return Err(EngineError::Rejected(format!(
                "{} not offered at this decision point",
                action
            )));
        }
        self.applied.push(action.clone());
        self.cursor += 1;
        Ok(())
    }

    fn pending_decision(&self) -> Option<PendingDecision> {
        self.current()
            .and_then(|p| p.pending_prompt.clone())
            .map(|prompt| PendingDecision {
                player: self.player.clone(),
                prompt,
            })
    }

    fn turn_holder(&self) -> PlayerId {
        if self.cursor < self.script.len() {
            self.player.clone()
        } else {
            // Script exhausted: control has passed
            PlayerId::new("next-player")
        }
    }

    fn phase(&self) -> String {
        self.current().map(|p| p.phase.to_string()).unwrap_or_else(|| "done".to_string())
    }

    fn is_over(&self) -> bool {
        false
    }

    fn snapshot(&self) -> String {
        json!({
            "player": self.player.as_str(),
            "decision_point": self.cursor,
            "phase": self.phase(),
            "applied": self.applied.len(),
        })
        .to_string()
    }
}
