//! Winner selection
//!
//! Post-collection step: rank the vote groups, drop the ones the rule
//! engine would reject, prefer an early-consensus winner when it survives
//! the filter, and resolve ties deterministically.

use super::board::TallyBoard;
use super::vote::{VoteGroup, VoterFailure, VoterVerdict};
use crate::action::{GameAction, is_legal};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// The decided outcome of one consensus round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    /// The action the turn driver will apply
    pub winning_action: GameAction,
    /// Votes in the winning group
    pub winner_vote_count: usize,
    /// Denominator of the decision: voters that settled before
    /// termination under early consensus, non-error voters otherwise
    pub votes_considered: usize,
    /// Whether the early-consensus group supplied the winner
    pub early_consensus_applied: bool,
    /// Whether an early-consensus winner existed but failed the
    /// legality filter (voter/context desync diagnostic)
    pub early_winner_rejected: bool,
    /// Every vote group, count descending then signature ascending
    pub ranked_groups: Vec<VoteGroup>,
}

/// Rank vote groups by count descending, signature ascending
///
/// Deterministic and reproducible for identical inputs: ranking depends
/// only on counts and signatures, never arrival order.
pub fn rank_groups(board: &TallyBoard) -> Vec<VoteGroup> {
    // BTreeMap iteration is already signature-ascending, so a stable
    // sort on count alone preserves the lexicographic tie-break.
    let mut ranked: Vec<VoteGroup> = board.groups().values().cloned().collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Select the winning action for a finished round
///
/// Errors are terminal for the round: [`DomainError::NoUsableProposals`]
/// when every voter errored, [`DomainError::AllProposalsInvalid`] when no
/// group passes the legal-action filter.
pub fn select_winner(
    board: &TallyBoard,
    legal_actions: &[GameAction],
) -> Result<ConsensusOutcome, DomainError> {
    let ranked = rank_groups(board);
    if ranked.is_empty() {
        return Err(DomainError::NoUsableProposals);
    }

    let legal_ranked: Vec<&VoteGroup> = ranked
        .iter()
        .filter(|g| is_legal(&g.action.action, legal_actions))
        .collect();
    if legal_ranked.is_empty() {
        return Err(DomainError::AllProposalsInvalid);
    }

    let early = board.early_group();
    let mut early_winner_rejected = false;
    let winner = match early {
        Some(group) if is_legal(&group.action.action, legal_actions) => group,
        Some(_) => {
            early_winner_rejected = true;
            legal_ranked[0]
        }
        None => legal_ranked[0],
    };
    let early_consensus_applied = early.is_some() && !early_winner_rejected;

    let votes_considered = if early.is_some() {
        // Everything that settled before termination; aborted laggards
        // are intentionally excluded from the denominator.
        board
            .settled()
            .iter()
            .filter(|r| !matches!(r.verdict, VoterVerdict::Failed(VoterFailure::Aborted)))
            .count()
    } else {
        board.successful_count()
    };

    Ok(ConsensusOutcome {
        winning_action: winner.action.action.clone(),
        winner_vote_count: winner.count,
        votes_considered,
        early_consensus_applied,
        early_winner_rejected,
        ranked_groups: ranked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ProposedAction;
    use crate::core::provider::Provider;
    use crate::tally::margin::MarginRule;
    use crate::tally::vote::{VoterResult, VoterSlot};

    fn slot(i: usize) -> VoterSlot {
        VoterSlot::new(i, Provider::ClaudeSonnet45)
    }

    fn buy(card: &str) -> GameAction {
        GameAction::BuyCard { card: card.into() }
    }

    fn play(card: &str) -> GameAction {
        GameAction::PlayAction { card: card.into() }
    }

    /// Board with all results settled and early consensus disabled
    fn full_board(actions: &[Option<GameAction>]) -> TallyBoard {
        let mut board = TallyBoard::new(actions.len(), MarginRule::LeadAtLeast(usize::MAX));
        for (i, action) in actions.iter().enumerate() {
            let result = match action {
                Some(a) => {
                    VoterResult::proposed(slot(i), ProposedAction::new(a.clone()), 100)
                }
                None => VoterResult::failed(slot(i), "voter error", 100),
            };
            board.record(result);
        }
        board
    }

    #[test]
    fn test_majority_wins() {
        // 4x Silver, 1x Gold, both legal
        let board = full_board(&[
            Some(buy("Silver")),
            Some(buy("Silver")),
            Some(buy("Gold")),
            Some(buy("Silver")),
            Some(buy("Silver")),
        ]);
        let legal = vec![buy("Silver"), buy("Gold")];

        let outcome = select_winner(&board, &legal).expect("winner");
        assert_eq!(outcome.winning_action, buy("Silver"));
        assert_eq!(outcome.winner_vote_count, 4);
        assert_eq!(outcome.votes_considered, 5);
        assert!(!outcome.early_consensus_applied);
        assert_eq!(outcome.ranked_groups.len(), 2);
        assert_eq!(outcome.ranked_groups[0].count, 4);
    }

    #[test]
    fn test_all_proposals_invalid() {
        // 3x Market proposed, only Smithy is legal
        let board = full_board(&[
            Some(play("Market")),
            Some(play("Market")),
            Some(play("Market")),
        ]);
        let legal = vec![play("Smithy")];

        assert_eq!(
            select_winner(&board, &legal),
            Err(DomainError::AllProposalsInvalid)
        );
    }

    #[test]
    fn test_no_usable_proposals() {
        let board = full_board(&[None, None, None]);
        let legal = vec![GameAction::EndPhase];

        assert_eq!(
            select_winner(&board, &legal),
            Err(DomainError::NoUsableProposals)
        );
    }

    #[test]
    fn test_error_voter_excluded_from_denominator() {
        // A: end_phase, B: end_phase, C: error
        let board = full_board(&[
            Some(GameAction::EndPhase),
            Some(GameAction::EndPhase),
            None,
        ]);
        let legal = vec![GameAction::EndPhase, GameAction::EndTurn];

        let outcome = select_winner(&board, &legal).expect("winner");
        assert_eq!(outcome.winning_action, GameAction::EndPhase);
        assert_eq!(outcome.votes_considered, 2);
    }

    #[test]
    fn test_tie_breaks_lexicographically() {
        // 2x Gold vs 2x Silver: "Gold" sorts before "Silver"
        let board = full_board(&[
            Some(buy("Silver")),
            Some(buy("Gold")),
            Some(buy("Silver")),
            Some(buy("Gold")),
        ]);
        let legal = vec![buy("Silver"), buy("Gold")];

        let outcome = select_winner(&board, &legal).expect("winner");
        assert_eq!(outcome.winning_action, buy("Gold"));
        assert_eq!(outcome.winner_vote_count, 2);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let actions = [
            Some(buy("Estate")),
            Some(buy("Duchy")),
            Some(buy("Estate")),
            Some(buy("Copper")),
            None,
        ];
        let legal = vec![buy("Estate"), buy("Duchy"), buy("Copper")];

        let first = select_winner(&full_board(&actions), &legal).expect("winner");
        for _ in 0..10 {
            let again = select_winner(&full_board(&actions), &legal).expect("winner");
            assert_eq!(again.winning_action, first.winning_action);
            let sigs: Vec<_> = again.ranked_groups.iter().map(|g| &g.signature).collect();
            let first_sigs: Vec<_> = first.ranked_groups.iter().map(|g| &g.signature).collect();
            assert_eq!(sigs, first_sigs);
        }
    }

    #[test]
    fn test_illegal_leader_falls_through_to_legal_runner_up() {
        // Leading group is illegal, runner-up is legal
        let board = full_board(&[
            Some(play("Market")),
            Some(play("Market")),
            Some(play("Smithy")),
        ]);
        let legal = vec![play("Smithy")];

        let outcome = select_winner(&board, &legal).expect("winner");
        assert_eq!(outcome.winning_action, play("Smithy"));
        assert_eq!(outcome.winner_vote_count, 1);
    }

    #[test]
    fn test_early_winner_preferred_when_legal() {
        let mut board = TallyBoard::new(6, MarginRule::PanelFraction);
        for i in 0..3 {
            board.record(VoterResult::proposed(
                slot(i),
                ProposedAction::new(buy("Silver")),
                100,
            ));
        }
        board.record(VoterResult::proposed(
            slot(3),
            ProposedAction::new(buy("Gold")),
            100,
        ));
        assert!(board.early_group().is_some());
        // Two laggards settle aborted after cancellation
        board.record(VoterResult::aborted(slot(4), 110));
        board.record(VoterResult::aborted(slot(5), 110));

        let legal = vec![buy("Silver"), buy("Gold")];
        let outcome = select_winner(&board, &legal).expect("winner");

        assert!(outcome.early_consensus_applied);
        assert!(!outcome.early_winner_rejected);
        assert_eq!(outcome.winning_action, buy("Silver"));
        // Aborted laggards stay out of the denominator
        assert_eq!(outcome.votes_considered, 4);
    }

    #[test]
    fn test_early_winner_rejected_by_legality_filter() {
        let mut board = TallyBoard::new(4, MarginRule::PanelFraction);
        board.record(VoterResult::proposed(
            slot(0),
            ProposedAction::new(play("Market")),
            100,
        ));
        board.record(VoterResult::proposed(
            slot(1),
            ProposedAction::new(play("Market")),
            100,
        ));
        board.record(VoterResult::proposed(
            slot(2),
            ProposedAction::new(play("Smithy")),
            100,
        ));

        assert!(board.early_group().is_some());

        // The early winner is not in the legal set; fall back to ranked list
        let legal = vec![play("Smithy")];
        let outcome = select_winner(&board, &legal).expect("winner");

        assert!(outcome.early_winner_rejected);
        assert!(!outcome.early_consensus_applied);
        assert_eq!(outcome.winning_action, play("Smithy"));
    }

    #[test]
    fn test_rationale_differences_merge_into_one_group() {
        let mut board = TallyBoard::new(2, MarginRule::LeadAtLeast(usize::MAX));
        board.record(VoterResult::proposed(
            slot(0),
            ProposedAction::new(GameAction::EndPhase).with_rationale("nothing left to play"),
            80,
        ));
        board.record(VoterResult::proposed(
            slot(1),
            ProposedAction::new(GameAction::EndPhase).with_rationale("save the reaction"),
            90,
        ));

        let outcome = select_winner(&board, &[GameAction::EndPhase]).expect("winner");
        assert_eq!(outcome.ranked_groups.len(), 1);
        assert_eq!(outcome.winner_vote_count, 2);
    }
}
