//! Seeded demo voter
//!
//! A [`DecisionGateway`] adapter that stands in for real model backends:
//! each invocation sleeps a drawn latency, then proposes one of the legal
//! actions offered in the context, biased toward the front of the list.
//! Draw order depends on task scheduling, so runs are reproducible only
//! in the aggregate; use a scripted gateway when tests need exact votes.

use async_trait::async_trait;
use gambit_application::ports::decision_gateway::{
    DecisionContext, DecisionGateway, GatewayError, ReplyFormat, VoterReply,
};
use gambit_domain::{ProposedAction, Provider};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Demo gateway drawing proposals from the offered legal set
pub struct DiceGateway {
    rng: Mutex<StdRng>,
    /// Latency drawn uniformly from this range per invocation
    latency: std::ops::Range<u64>,
    /// Chance in percent that an invocation fails outright
    failure_pct: u8,
}

impl DiceGateway {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency: 30..400,
            failure_pct: 5,
        }
    }

    pub fn with_latency(mut self, latency: std::ops::Range<u64>) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_failure_pct(mut self, pct: u8) -> Self {
        self.failure_pct = pct;
        self
    }

    /// Draw (latency, fails, pick index) in one lock acquisition
    fn draw(&self, choices: usize) -> (u64, bool, usize) {
        let mut rng = self.rng.lock().expect("rng lock");
        let latency = rng.gen_range(self.latency.clone());
        let fails = rng.gen_range(0..100) < self.failure_pct as u32;
        // Two draws biased toward the front of the legal list, so voters
        // tend to agree without always being unanimous.
        let a = rng.gen_range(0..choices);
        let b = rng.gen_range(0..choices);
        (latency, fails, a.min(b))
    }
}

#[async_trait]
impl DecisionGateway for DiceGateway {
    async fn invoke(
        &self,
        provider: &Provider,
        ctx: &DecisionContext,
        _cancel: CancellationToken,
    ) -> Result<VoterReply, GatewayError> {
        if ctx.legal_actions.is_empty() {
            return Err(GatewayError::Other("no legal actions offered".into()));
        }

        let (latency, fails, pick) = self.draw(ctx.legal_actions.len());
        tokio::time::sleep(Duration::from_millis(latency)).await;

        if fails {
            return Err(GatewayError::RequestFailed(format!(
                "{} flaked (simulated)",
                provider
            )));
        }

        let action = ctx.legal_actions[pick].clone();
        debug!(%provider, %action, latency, "dice voter replied");
        Ok(VoterReply {
            action: ProposedAction::new(action)
                .with_rationale(format!("{} rolled for it", provider.short_name())),
            format: ReplyFormat::Json,
        })
    }
}
