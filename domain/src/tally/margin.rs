//! Margin rules for early-consensus detection
//!
//! A round may terminate before every voter settles once the leading vote
//! group is far enough ahead of the runner-up. The margin rule decides how
//! far "far enough" is for a given panel size.

use serde::{Deserialize, Serialize};

/// Rule for the lead a vote group needs before the round stops early
///
/// # Example
///
/// ```
/// use gambit_domain::tally::MarginRule;
///
/// let rule = MarginRule::PanelFraction;
/// assert_eq!(rule.required_margin(6), 2); // max(2, ceil(6/3))
/// assert!(rule.is_met(3, 1, 6));          // lead of 2 on a 6-panel
/// assert!(!rule.is_met(2, 1, 6));         // lead of 1 is not enough
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarginRule {
    /// Lead of at least `max(2, ceil(panel/3))` votes (default)
    ///
    /// Bounds worst-case latency to roughly two thirds of the panel
    /// responding; the floor of 2 keeps small panels from stopping on a
    /// trivial one-vote lead.
    #[default]
    PanelFraction,

    /// Lead of at least a fixed number of votes
    LeadAtLeast(usize),
}

impl MarginRule {
    /// The lead required for a panel of `panel_size` voters
    pub fn required_margin(&self, panel_size: usize) -> usize {
        match self {
            MarginRule::PanelFraction => 2usize.max(panel_size.div_ceil(3)),
            MarginRule::LeadAtLeast(n) => *n,
        }
    }

    /// Check whether a leader/runner-up pair meets the margin
    pub fn is_met(&self, leader: usize, runner_up: usize, panel_size: usize) -> bool {
        leader.saturating_sub(runner_up) >= self.required_margin(panel_size)
    }

    /// Get a human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            MarginRule::PanelFraction => "lead of max(2, ceil(panel/3))".to_string(),
            MarginRule::LeadAtLeast(n) => format!("lead of at least {}", n),
        }
    }
}

impl std::fmt::Display for MarginRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for MarginRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fraction" | "panel-fraction" | "panel_fraction" => Ok(MarginRule::PanelFraction),
            s if s.starts_with("lead:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after lead:")?
                    .parse()
                    .map_err(|_| "Invalid number for lead")?;
                Ok(MarginRule::LeadAtLeast(n))
            }
            _ => Err(format!(
                "Unknown margin rule: {}. Valid: panel-fraction, lead:N",
                s
            )),
        }
    }
}
