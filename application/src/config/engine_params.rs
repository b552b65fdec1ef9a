//! Engine parameters — round and turn loop control.
//!
//! [`EngineParams`] groups the static parameters that control dispatch
//! deadlines, the early-consensus margin and the turn step budget. These
//! are application-layer concerns, not domain policy.

use gambit_domain::MarginRule;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Round and turn loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineParams {
    /// Number of voter slots dispatched per round.
    pub panel_size: usize,
    /// Deadline for each voter unit before it settles as timed out.
    pub voter_deadline: Duration,
    /// Early-consensus margin rule.
    pub margin_rule: MarginRule,
    /// Maximum rounds run within a single turn before handing back.
    pub step_budget: usize,
    /// Seed for slot shuffling; `None` draws from entropy.
    pub shuffle_seed: Option<u64>,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            panel_size: 3,
            voter_deadline: Duration::from_millis(5000),
            margin_rule: MarginRule::default(),
            step_budget: 40,
            shuffle_seed: None,
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_panel_size(mut self, size: usize) -> Self {
        self.panel_size = size;
        self
    }

    pub fn with_voter_deadline(mut self, deadline: Duration) -> Self {
        self.voter_deadline = deadline;
        self
    }

    pub fn with_margin_rule(mut self, rule: MarginRule) -> Self {
        self.margin_rule = rule;
        self
    }

    pub fn with_step_budget(mut self, budget: usize) -> Self {
        self.step_budget = budget;
        self
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }
}
