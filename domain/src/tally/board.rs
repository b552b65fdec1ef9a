//! Per-round tally state
//!
//! The [`TallyBoard`] is owned exclusively by the round that created it:
//! the dispatcher records every settlement here, synchronously, one at a
//! time. It is created at round start and discarded at round end.

use super::margin::MarginRule;
use super::vote::{VoteGroup, VoterResult};
use crate::action::ActionSignature;
use std::collections::BTreeMap;

/// Mutable state of one consensus round
///
/// Groups successful proposals by signature with running counts, and
/// evaluates the early-consensus margin after every recorded vote.
/// Failed results never produce a vote; they are kept only for
/// observability and the `votes_considered` denominator.
#[derive(Debug)]
pub struct TallyBoard {
    panel_size: usize,
    rule: MarginRule,
    // BTreeMap keeps signature order deterministic for iteration.
    groups: BTreeMap<ActionSignature, VoteGroup>,
    settled: Vec<VoterResult>,
    early_winner: Option<ActionSignature>,
}

impl TallyBoard {
    /// Open a board for a panel of `panel_size` voters
    pub fn new(panel_size: usize, rule: MarginRule) -> Self {
        Self {
            panel_size,
            rule,
            groups: BTreeMap::new(),
            settled: Vec::with_capacity(panel_size),
            early_winner: None,
        }
    }

    /// Record one settled voter result
    ///
    /// Returns the early-consensus signature the first time the margin is
    /// met, `None` otherwise. Once early consensus has fired the board
    /// stops re-evaluating; laggards are still recorded.
    pub fn record(&mut self, result: VoterResult) -> Option<ActionSignature> {
        let vote = result.proposal().cloned().map(|p| (p, result.slot.index));
        self.settled.push(result);

        let Some((proposal, slot_index)) = vote else {
            return None;
        };

        let signature = proposal.signature();
        self.groups
            .entry(signature)
            .and_modify(|g| g.push(slot_index))
            .or_insert_with(|| VoteGroup::open(proposal, slot_index));

        if self.early_winner.is_some() {
            return None;
        }

        let ((leader_sig, leader_count), runner_up) = self.leader_and_runner_up()?;
        if self.rule.is_met(leader_count, runner_up, self.panel_size) {
            let winner = leader_sig.clone();
            self.early_winner = Some(winner.clone());
            Some(winner)
        } else {
            None
        }
    }

    /// Current leader (signature, count) and runner-up count
    ///
    /// Runner-up is 0 while only one group exists. Ties for the lead keep
    /// the lexicographically smaller signature, which cannot meet any
    /// margin anyway (lead is 0).
    fn leader_and_runner_up(&self) -> Option<((&ActionSignature, usize), usize)> {
        let mut leader: Option<(&ActionSignature, usize)> = None;
        let mut runner_up = 0usize;

        for (sig, group) in &self.groups {
            match leader {
                Some((_, lead_count)) if group.count > lead_count => {
                    runner_up = lead_count;
                    leader = Some((sig, group.count));
                }
                Some((_, lead_count)) => runner_up = runner_up.max(group.count.min(lead_count)),
                None => leader = Some((sig, group.count)),
            }
        }

        leader.map(|l| (l, runner_up))
    }

    /// Number of voters that have settled so far
    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    /// Number of voters still pending
    pub fn pending_count(&self) -> usize {
        self.panel_size - self.settled.len()
    }

    /// Number of settled voters that contributed a vote
    pub fn successful_count(&self) -> usize {
        self.settled.iter().filter(|r| r.is_success()).count()
    }

    /// The early-consensus group, if the margin fired this round
    pub fn early_group(&self) -> Option<&VoteGroup> {
        self.early_winner.as_ref().and_then(|s| self.groups.get(s))
    }

    pub fn panel_size(&self) -> usize {
        self.panel_size
    }

    pub fn groups(&self) -> &BTreeMap<ActionSignature, VoteGroup> {
        &self.groups
    }

    pub fn settled(&self) -> &[VoterResult] {
        &self.settled
    }
}
