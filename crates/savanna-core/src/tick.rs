//! Tick cycle: the five-step pipeline that advances the savanna.
//!
//! Each tick runs, strictly in order:
//!
//! 1. **Plan** -- every agent, in population order, asks the [`Mover`] for a
//!    [`MovePlan`]. Each plan is applied before the next agent plans, so the
//!    first agent to claim a cell keeps it. Eaten antelopes still plan.
//! 2. **Pair** -- the [`PairEngine`] evaluates existing bonds, discovers new
//!    ones for every agent, and prunes broken bonds.
//! 3. **Commit** -- every agent moves to its planned cell and loses health.
//! 4. **Birth** -- buffered newborns join the population.
//! 5. **Cull** -- agents that are no longer alive are removed.
//!
//! The tick is deterministic given the same state and the same seeded RNG.
//!
//! [`MovePlan`]: savanna_agents::MovePlan

use rand::SeedableRng;
use savanna_agents::{
    AgentError, MoveAction, Mover, PairEngine, Population, SimRng, apply_plan, validate_for_plan,
};
use savanna_types::AgentId;
use savanna_world::Grid;
use serde::Serialize;
use tracing::{debug, info};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// An agent could not plan or its plan could not be applied.
    #[error("planning failed for agent {agent}: {source}")]
    Plan {
        /// The agent being planned.
        agent: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },

    /// The pairing step failed.
    #[error("pairing failed: {source}")]
    Pairing {
        /// The underlying agent error.
        source: AgentError,
    },

    /// The commit pass rejected an agent.
    #[error("commit failed: {source}")]
    Commit {
        /// The underlying agent error.
        source: AgentError,
    },

    /// Newborns could not be merged.
    #[error("birth failed: {source}")]
    Birth {
        /// The underlying agent error.
        source: AgentError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// The tick number that was executed.
    pub tick: u64,
    /// Agents whose cell changed during commit.
    pub moves: usize,
    /// Antelopes eaten this tick.
    pub eats: usize,
    /// Newborns merged this tick.
    pub births: usize,
    /// Agents culled this tick, eaten or starved.
    pub deaths: usize,
    /// Agents remaining after the cull.
    pub population: usize,
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// The board.
    pub grid: Grid,
    /// Every agent, in planning order.
    pub population: Population,
    /// Shared RNG for wandering, births and placement.
    pub rng: SimRng,
    /// Number of ticks executed so far.
    pub tick: u64,
}

impl SimulationState {
    /// An empty savanna on `grid` with a seeded RNG.
    pub fn new(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            population: Population::new(),
            rng: SimRng::seed_from_u64(seed),
            tick: 0,
        }
    }
}

/// Execute one complete tick of the simulation.
///
/// An empty population still advances the tick counter.
pub fn run_tick(
    state: &mut SimulationState,
    mover: &mut dyn Mover,
    pairing: &mut dyn PairEngine,
) -> Result<TickReport, TickError> {
    let tick = state.tick.saturating_add(1);
    debug!(tick, population = state.population.len(), "Tick started");

    // --- Step 1: Plan ---
    // Every agent is checked before any plan is applied, so a rejected tick
    // leaves the population as it was.
    for agent in state.population.iter() {
        validate_for_plan(agent).map_err(|source| TickError::Plan {
            agent: agent.id,
            source,
        })?;
    }
    for agent in state.population.iter_mut() {
        agent.just_ate = false;
    }
    let mut eats: usize = 0;
    for agent in state.population.ids() {
        let plan = mover
            .plan(agent, &state.population, &state.grid, &mut state.rng)
            .map_err(|source| TickError::Plan { agent, source })?;
        if matches!(plan.action, MoveAction::Eat { .. }) {
            eats = eats.saturating_add(1);
        }
        apply_plan(&mut state.population, &plan)
            .map_err(|source| TickError::Plan { agent, source })?;
    }

    // --- Step 2: Pair ---
    pairing
        .pair_step(&state.population, &state.grid, &mut state.rng)
        .map_err(|source| TickError::Pairing { source })?;

    // --- Step 3: Commit ---
    let outcome = mover
        .commit(&mut state.population)
        .map_err(|source| TickError::Commit { source })?;

    // --- Step 4: Birth ---
    let births = pairing
        .merge_newborns(&mut state.population)
        .map_err(|source| TickError::Birth { source })?;

    // --- Step 5: Cull ---
    let deaths = state.population.cull_dead().len();

    state.tick = tick;
    let report = TickReport {
        tick,
        moves: outcome.moved,
        eats,
        births,
        deaths,
        population: state.population.len(),
    };
    info!(
        tick,
        moves = report.moves,
        eats,
        births,
        deaths,
        population = report.population,
        "Tick complete"
    );
    Ok(report)
}
