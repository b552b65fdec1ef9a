//! CLI entrypoint for gambit-quorum
//!
//! Wires the layers together and drives one automated demo turn against
//! the scripted table, printing the per-round ranked breakdown.

use anyhow::Result;
use clap::Parser;
use gambit_application::{
    ConsensusEvent, ConsensusObserver, EngineParams, RunTurnUseCase, TurnEnd,
};
use gambit_domain::{MarginRule, PlayerId, Provider};
use gambit_infrastructure::{DiceGateway, ScriptedTable};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gambit-quorum", version, about)]
struct Cli {
    /// Providers occupying the panel (repeatable); defaults to the stock panel
    #[arg(short = 'm', long = "provider")]
    provider: Vec<String>,

    /// Number of voter slots per round
    #[arg(short, long, default_value_t = 5)]
    panel: usize,

    /// Per-voter deadline in milliseconds
    #[arg(long, default_value_t = 5000)]
    deadline_ms: u64,

    /// Early-consensus margin rule (panel-fraction or lead:N)
    #[arg(long, default_value = "panel-fraction")]
    margin: MarginRule,

    /// Maximum rounds before the turn hands control back
    #[arg(long, default_value_t = 40)]
    step_budget: usize,

    /// Seed for slot shuffling and the demo voters
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Observer printing decided rounds to stdout
struct ConsoleObserver;

impl ConsensusObserver for ConsoleObserver {
    fn on_event(&self, event: &ConsensusEvent) {
        match event {
            ConsensusEvent::RoundDecided {
                round,
                outcome,
                required_margin,
            } => {
                println!(
                    "round {:>2}: {} ({}/{} votes{}, margin {})",
                    round,
                    outcome.winning_action,
                    outcome.winner_vote_count,
                    outcome.votes_considered,
                    if outcome.early_consensus_applied {
                        ", early"
                    } else {
                        ""
                    },
                    required_margin,
                );
                for group in &outcome.ranked_groups {
                    println!(
                        "          {:>2}x {}  voters {:?}",
                        group.count, group.action.action, group.voters
                    );
                }
            }
            ConsensusEvent::TurnStalled { player, steps, reason } => {
                println!("turn stalled for {} after {} steps: {}", player, steps, reason);
            }
            ConsensusEvent::TurnComplete { player, steps } => {
                println!("turn complete for {} in {} steps", player, steps);
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let providers: Vec<Provider> = if cli.provider.is_empty() {
        Provider::default_panel()
    } else {
        cli.provider
            .iter()
            .map(|s| s.parse().expect("provider parsing is infallible"))
            .collect()
    };
    info!(panel = cli.panel, providers = providers.len(), "starting demo turn");

    let params = EngineParams::default()
        .with_panel_size(cli.panel)
        .with_voter_deadline(Duration::from_millis(cli.deadline_ms))
        .with_margin_rule(cli.margin)
        .with_step_budget(cli.step_budget)
        .with_shuffle_seed(cli.seed);

    // === Dependency Injection ===
    let gateway = Arc::new(DiceGateway::new(cli.seed));
    let player = PlayerId::new("bot-1");
    let mut table = ScriptedTable::demo_turn(player.clone());

    let use_case = RunTurnUseCase::new(gateway, providers);
    let report = use_case
        .execute(&player, &mut table, &params, &ConsoleObserver, None)
        .await;

    match report.end {
        TurnEnd::Completed => Ok(()),
        TurnEnd::StepBudgetExhausted => {
            anyhow::bail!("step budget exhausted after {} rounds", report.steps)
        }
        TurnEnd::Stalled { reason } => anyhow::bail!("turn stalled: {}", reason),
        TurnEnd::Cancelled => anyhow::bail!("turn cancelled"),
    }
}
