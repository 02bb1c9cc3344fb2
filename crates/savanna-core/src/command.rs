//! Commands queued by input tasks and drained by the runner between ticks.
//!
//! Producers only ever send; the runner is the single consumer and applies
//! every queued command synchronously at the top of a tick, so state is
//! never touched while a tick is running.

use savanna_agents::AgentError;
use savanna_types::{AgentId, Species};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::tick::SimulationState;

/// A request from outside the tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add one agent of the given species at a random free cell.
    Spawn(Species),
    /// End the simulation before the next tick.
    Stop,
}

impl Command {
    /// Translate a line of operator input.
    ///
    /// `a` spawns an antelope, `l` a lion, and `q` or `esc` stops. Anything
    /// else is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim();
        if key.eq_ignore_ascii_case("a") {
            Some(Self::Spawn(Species::Antelope))
        } else if key.eq_ignore_ascii_case("l") {
            Some(Self::Spawn(Species::Lion))
        } else if key.eq_ignore_ascii_case("q")
            || key.eq_ignore_ascii_case("esc")
            || key == "\u{1b}"
        {
            Some(Self::Stop)
        } else {
            None
        }
    }
}

/// Sending half of the command queue.
pub type CommandSender = mpsc::UnboundedSender<Command>;

/// Receiving half of the command queue, owned by the runner.
pub type CommandReceiver = mpsc::UnboundedReceiver<Command>;

/// Create a new command queue.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}

/// What happened when a spawn was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The agent was placed.
    Placed(AgentId),
    /// The grid is more than half full; nothing was placed.
    NoCapacity,
}

impl SpawnOutcome {
    /// The placed agent, if any.
    pub const fn placed(self) -> Option<AgentId> {
        match self {
            Self::Placed(id) => Some(id),
            Self::NoCapacity => None,
        }
    }
}

/// Spawn one agent of `species` if the grid has room.
pub fn spawn_agent(
    state: &mut SimulationState,
    species: Species,
) -> Result<SpawnOutcome, AgentError> {
    if !state.population.has_free_capacity(&state.grid) {
        warn!(%species, population = state.population.len(), "Grid is full, spawn skipped");
        return Ok(SpawnOutcome::NoCapacity);
    }
    let agent = state.population.spawn(species)?;
    let id = state
        .population
        .place_new_agent(agent, &state.grid, &mut state.rng);
    info!(agent = %id, %species, "Agent spawned");
    Ok(SpawnOutcome::Placed(id))
}

/// Apply every queued command. Returns `true` if a stop was requested.
///
/// Draining ends at the first stop; later commands stay queued.
pub fn drain_commands(
    state: &mut SimulationState,
    commands: &mut CommandReceiver,
) -> Result<bool, AgentError> {
    while let Ok(command) = commands.try_recv() {
        match command {
            Command::Spawn(species) => {
                spawn_agent(state, species)?;
            }
            Command::Stop => return Ok(true),
        }
    }
    Ok(false)
}
