//! Population, movement, and breeding for the Savanna simulation.
//!
//! # Modules
//!
//! - [`breeding`] -- [`PairBook`] bond tracking and newborn placement behind
//!   the [`PairEngine`] trait.
//! - [`error`] -- [`AgentError`] and the attributes a precondition can miss.
//! - [`mover`] -- [`SavannaMover`] chase/flee/eat rules behind the [`Mover`]
//!   trait.
//! - [`population`] -- [`Population`], the arena that owns every agent.
//! - [`vitals`] -- Move commit and per-tick health decay.
//!
//! All randomness flows through a caller-owned [`SimRng`] so a seeded run is
//! reproducible.

pub mod breeding;
pub mod error;
pub mod mover;
pub mod population;
pub mod vitals;

pub use breeding::{BREEDING_THRESHOLD, Pair, PairBook, PairEngine, PendingBirth};
pub use error::{AgentError, MissingAttribute};
pub use mover::{
    EAT_BONUS, MoveAction, MovePlan, Mover, SavannaMover, apply_plan, candidate_moves,
    validate_for_plan,
};
pub use population::Population;
pub use vitals::{CommitOutcome, HEALTH_DECAY, commit_moves};

/// The random number generator shared by placement, wandering and births.
pub type SimRng = rand::rngs::StdRng;
