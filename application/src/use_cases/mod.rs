//! Use cases orchestrating the consensus engine

pub mod run_round;
pub mod run_turn;

pub use run_round::{RunRoundError, RunRoundUseCase};
pub use run_turn::{RunTurnUseCase, TurnEnd, TurnReport};
