//! Run Turn use case
//!
//! Drives one automated player through as many consensus rounds as the
//! turn needs: first any chain of pending sub-decisions (resolving an
//! effect card by card), then phase progression (plays, buys, end-phase)
//! until control passes, the game ends, or the step budget runs out.
//!
//! The loop is an explicit bounded state machine, never recursion, so the
//! step-budget cutoff is directly testable.

use crate::config::EngineParams;
use crate::ports::decision_gateway::{DecisionContext, DecisionGateway};
use crate::ports::observer::{ConsensusEvent, ConsensusObserver};
use crate::ports::table_engine::TableEngine;
use crate::use_cases::run_round::{RunRoundError, RunRoundUseCase};
use gambit_domain::{ConsensusOutcome, PlayerId, Provider, assign_slots};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a driven turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEnd {
    /// Control passed normally (next player, or game over)
    Completed,
    /// The bounded loop ran out of steps; control handed back defensively
    StepBudgetExhausted,
    /// A round failed or the engine rejected a winner; progress halted
    Stalled { reason: String },
    /// The whole decision process was interrupted externally
    Cancelled,
}

/// Per-step shape of the turn state machine, for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnState {
    /// A sub-decision chain is pending on the same choice
    AwaitingDecision,
    /// No sub-decision remains; the player progresses through phases
    PhaseAdvance,
}

/// Summary of one driven turn
///
/// Turn-level failures never escape as errors: previously applied actions
/// remain valid and the terminal state reports why progress stopped.
#[derive(Debug)]
pub struct TurnReport {
    pub player: PlayerId,
    /// Rounds run (equals actions applied unless the last round failed)
    pub steps: usize,
    pub end: TurnEnd,
    /// Outcome of every decided round, in order
    pub outcomes: Vec<ConsensusOutcome>,
}

/// Use case for driving one automated turn
pub struct RunTurnUseCase<G: DecisionGateway + 'static> {
    round: RunRoundUseCase<G>,
    providers: Vec<Provider>,
}

impl<G: DecisionGateway + 'static> RunTurnUseCase<G> {
    pub fn new(gateway: Arc<G>, providers: Vec<Provider>) -> Self {
        Self {
            round: RunRoundUseCase::new(gateway),
            providers,
        }
    }

    /// Drive `player` until the turn completes or halts
    pub async fn execute(
        &self,
        player: &PlayerId,
        engine: &mut dyn TableEngine,
        params: &EngineParams,
        observer: &dyn ConsensusObserver,
        external_cancel: Option<&CancellationToken>,
    ) -> TurnReport {
        let slots = assign_slots(&self.providers, params.panel_size, params.shuffle_seed);
        info!(%player, panel = slots.len(), "turn start");

        let mut steps = 0usize;
        let mut outcomes: Vec<ConsensusOutcome> = Vec::new();

        let end = loop {
            if engine.is_over() || engine.turn_holder() != *player {
                break TurnEnd::Completed;
            }
            if steps >= params.step_budget {
                warn!(%player, steps, "step budget exhausted, handing control back");
                break TurnEnd::StepBudgetExhausted;
            }

            let pending = engine.pending_decision();
            let state = if pending.is_some() {
                TurnState::AwaitingDecision
            } else {
                TurnState::PhaseAdvance
            };
            debug!(%player, ?state, phase = %engine.phase(), step = steps + 1, "running round");

            let legal = engine.legal_actions();
            if legal.is_empty() {
                // The engine must always offer at least a phase boundary.
                break TurnEnd::Stalled {
                    reason: "rule engine offered no legal actions".to_string(),
                };
            }

            let mut ctx = DecisionContext::new(engine.snapshot(), legal);
            if let Some(decision) = pending {
                ctx = ctx.with_pending_choice(decision.prompt);
            }

            steps += 1;
            let outcome = match self
                .round
                .execute(steps, &slots, &ctx, params, observer, external_cancel)
                .await
            {
                Ok(outcome) => outcome,
                Err(RunRoundError::Cancelled) => {
                    info!(%player, step = steps, "turn interrupted externally");
                    break TurnEnd::Cancelled;
                }
                Err(e) => {
                    warn!(%player, step = steps, "round failed: {}", e);
                    break TurnEnd::Stalled {
                        reason: e.to_string(),
                    };
                }
            };

            // Application is all-or-nothing per round; a rejection halts
            // the turn without touching already-applied state.
            if let Err(e) = engine.apply(player, &outcome.winning_action) {
                warn!(%player, action = %outcome.winning_action, "apply failed: {}", e);
                break TurnEnd::Stalled {
                    reason: e.to_string(),
                };
            }

            debug!(%player, action = %outcome.winning_action, "action applied");
            outcomes.push(outcome);
        };

        // Only a normal hand-off reports as complete; every other terminal
        // carries its reason so observers see why progress stopped.
        match &end {
            TurnEnd::Completed => {
                observer.on_event(&ConsensusEvent::TurnComplete {
                    player: player.clone(),
                    steps,
                });
            }
            TurnEnd::Stalled { reason } => {
                observer.on_event(&ConsensusEvent::TurnStalled {
                    player: player.clone(),
                    steps,
                    reason: reason.clone(),
                });
            }
            TurnEnd::StepBudgetExhausted => {
                observer.on_event(&ConsensusEvent::TurnStalled {
                    player: player.clone(),
                    steps,
                    reason: "step budget exhausted".to_string(),
                });
            }
            TurnEnd::Cancelled => {
                observer.on_event(&ConsensusEvent::TurnStalled {
                    player: player.clone(),
                    steps,
                    reason: "interrupted externally".to_string(),
                });
            }
        }
        info!(%player, steps, ?end, "turn finished");

        TurnReport {
            player: player.clone(),
            steps,
            end,
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::decision_gateway::{GatewayError, ReplyFormat, VoterReply};
    use crate::ports::observer::NoObserver;
    use crate::ports::table_engine::{EngineError, PendingDecision};
    use async_trait::async_trait;
    use gambit_domain::{GameAction, ProposedAction};
    use std::sync::Mutex;

    /// Observer collecting every event for assertions
    #[derive(Default)]
    struct CollectObserver {
        events: Mutex<Vec<ConsensusEvent>>,
    }

    impl ConsensusObserver for CollectObserver {
        fn on_event(&self, event: &ConsensusEvent) {
            self.events.lock().expect("observer lock").push(event.clone());
        }
    }

    impl CollectObserver {
        fn terminal(&self) -> ConsensusEvent {
            self.events
                .lock()
                .expect("observer lock")
                .last()
                .expect("at least one event")
                .clone()
        }
    }

    /// Gateway whose voters always pick the first offered legal action
    struct FirstLegalGateway;

    #[async_trait]
    impl DecisionGateway for FirstLegalGateway {
        async fn invoke(
            &self,
            _provider: &Provider,
            ctx: &DecisionContext,
            _cancel: CancellationToken,
        ) -> Result<VoterReply, GatewayError> {
            let action = ctx
                .legal_actions
                .first()
                .cloned()
                .ok_or_else(|| GatewayError::Other("no legal actions offered".into()))?;
            Ok(VoterReply {
                action: ProposedAction::new(action),
                format: ReplyFormat::Json,
            })
        }
    }

    /// Gateway that always proposes an action outside the legal set
    struct RogueGateway;

    #[async_trait]
    impl DecisionGateway for RogueGateway {
        async fn invoke(
            &self,
            _provider: &Provider,
            _ctx: &DecisionContext,
            _cancel: CancellationToken,
        ) -> Result<VoterReply, GatewayError> {
            Ok(VoterReply {
                action: ProposedAction::new(GameAction::BuyCard {
                    card: "Platinum".into(),
                }),
                format: ReplyFormat::Json,
            })
        }
    }

    /// Scripted decision points standing in for the external rule engine
    struct ScriptEngine {
        holder: PlayerId,
        /// (legal set, pending prompt) per decision point, consumed in order
        script: Vec<(Vec<GameAction>, Option<String>)>,
        cursor: usize,
        applied: Vec<GameAction>,
        reject_applies: bool,
    }

    impl ScriptEngine {
        fn new(script: Vec<(Vec<GameAction>, Option<String>)>) -> Self {
            Self {
                holder: PlayerId::new("bot-1"),
                script,
                cursor: 0,
                applied: Vec::new(),
                reject_applies: false,
            }
        }
    }

    impl TableEngine for ScriptEngine {
        fn legal_actions(&self) -> Vec<GameAction> {
            self.script
                .get(self.cursor)
                .map(|(legal, _)| legal.clone())
                .unwrap_or_default()
        }

        fn apply(&mut self, _player: &PlayerId, action: &GameAction) -> Result<(), EngineError> {
            if self.reject_applies {
                return Err(EngineError::Rejected("scripted rejection".into()));
            }
            self.applied.push(action.clone());
            self.cursor += 1;
            Ok(())
        }

        fn pending_decision(&self) -> Option<PendingDecision> {
            self.script
                .get(self.cursor)
                .and_then(|(_, prompt)| prompt.clone())
                .map(|prompt| PendingDecision {
                    player: self.holder.clone(),
                    prompt,
                })
        }

        fn turn_holder(&self) -> PlayerId {
            if self.cursor < self.script.len() {
                self.holder.clone()
            } else {
                PlayerId::new("opponent")
            }
        }

        fn phase(&self) -> String {
            "scripted".to_string()
        }

        fn is_over(&self) -> bool {
            false
        }

        fn snapshot(&self) -> String {
            format!("{{\"decision_point\":{}}}", self.cursor)
        }
    }

    fn play(card: &str) -> GameAction {
        GameAction::PlayAction { card: card.into() }
    }

    fn discard(card: &str) -> GameAction {
        GameAction::DiscardCard { card: card.into() }
    }

    fn params() -> EngineParams {
        EngineParams::default().with_shuffle_seed(1)
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_runs_until_control_passes() {
        let mut engine = ScriptEngine::new(vec![
            (vec![play("Smithy"), GameAction::EndPhase], None),
            (vec![GameAction::EndPhase], None),
            (vec![GameAction::EndTurn], None),
        ]);
        let use_case =
            RunTurnUseCase::new(Arc::new(FirstLegalGateway), Provider::default_panel());
        let player = PlayerId::new("bot-1");

        let report = use_case
            .execute(&player, &mut engine, &params(), &NoObserver, None)
            .await;

        assert_eq!(report.end, TurnEnd::Completed);
        assert_eq!(report.steps, 3);
        assert_eq!(
            engine.applied,
            vec![play("Smithy"), GameAction::EndPhase, GameAction::EndTurn]
        );
        assert_eq!(report.outcomes.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_decision_chain_rederives_legal_set() {
        // A discard-down-to-3 style chain: three pending sub-decisions
        let mut engine = ScriptEngine::new(vec![
            (
                vec![discard("Copper"), discard("Estate")],
                Some("discard 3".into()),
            ),
            (vec![discard("Estate")], Some("discard 2 more".into())),
            (vec![discard("Curse")], Some("discard 1 more".into())),
            (vec![GameAction::EndTurn], None),
        ]);
        let use_case =
            RunTurnUseCase::new(Arc::new(FirstLegalGateway), Provider::default_panel());
        let player = PlayerId::new("bot-1");

        let report = use_case
            .execute(&player, &mut engine, &params(), &NoObserver, None)
            .await;

        assert_eq!(report.end, TurnEnd::Completed);
        assert_eq!(
            engine.applied,
            vec![
                discard("Copper"),
                discard("Estate"),
                discard("Curse"),
                GameAction::EndTurn
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_budget_cutoff() {
        // Endless decision points, budget of 2
        let script = (0..10)
            .map(|_| (vec![GameAction::EndPhase], None))
            .collect();
        let mut engine = ScriptEngine::new(script);
        let use_case =
            RunTurnUseCase::new(Arc::new(FirstLegalGateway), Provider::default_panel());
        let player = PlayerId::new("bot-1");

        let observer = CollectObserver::default();
        let report = use_case
            .execute(
                &player,
                &mut engine,
                &params().with_step_budget(2),
                &observer,
                None,
            )
            .await;

        assert_eq!(report.end, TurnEnd::StepBudgetExhausted);
        assert_eq!(report.steps, 2);
        assert_eq!(engine.applied.len(), 2);

        // The cutoff is not a normal hand-off and must not report as one
        match observer.terminal() {
            ConsensusEvent::TurnStalled { steps, reason, .. } => {
                assert_eq!(steps, 2);
                assert_eq!(reason, "step budget exhausted");
            }
            other => panic!("expected TurnStalled terminal, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_failure_stalls_turn() {
        let mut engine = ScriptEngine::new(vec![
            (vec![play("Smithy")], None),
            (vec![GameAction::EndTurn], None),
        ]);
        let use_case = RunTurnUseCase::new(Arc::new(RogueGateway), Provider::default_panel());
        let player = PlayerId::new("bot-1");

        let report = use_case
            .execute(&player, &mut engine, &params(), &NoObserver, None)
            .await;

        // All proposals were illegal; the turn stalls with nothing applied
        assert!(matches!(report.end, TurnEnd::Stalled { .. }));
        assert!(engine.applied.is_empty());
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_apply_failure_stalls_without_retry() {
        let mut engine = ScriptEngine::new(vec![
            (vec![play("Smithy")], None),
            (vec![GameAction::EndTurn], None),
        ]);
        engine.reject_applies = true;
        let use_case =
            RunTurnUseCase::new(Arc::new(FirstLegalGateway), Provider::default_panel());
        let player = PlayerId::new("bot-1");

        let report = use_case
            .execute(&player, &mut engine, &params(), &NoObserver, None)
            .await;

        assert!(matches!(report.end, TurnEnd::Stalled { .. }));
        assert_eq!(report.steps, 1);
        assert!(engine.applied.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pre_cancelled_turn_applies_nothing() {
        let mut engine = ScriptEngine::new(vec![(vec![GameAction::EndTurn], None)]);
        let use_case =
            RunTurnUseCase::new(Arc::new(FirstLegalGateway), Provider::default_panel());
        let player = PlayerId::new("bot-1");

        let external = CancellationToken::new();
        external.cancel();

        let observer = CollectObserver::default();
        let report = use_case
            .execute(&player, &mut engine, &params(), &observer, Some(&external))
            .await;

        assert_eq!(report.end, TurnEnd::Cancelled);
        assert!(engine.applied.is_empty());

        // A cancelled turn never reports itself as complete
        let events = observer.events.lock().expect("observer lock");
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, ConsensusEvent::TurnComplete { .. }))
        );
        assert!(matches!(
            events.last(),
            Some(ConsensusEvent::TurnStalled { reason, .. }) if reason == "interrupted externally"
        ));
    }
}
