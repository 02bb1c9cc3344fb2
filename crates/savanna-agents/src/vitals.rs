//! Move commit and health decay applied to every agent each tick.
//!
//! The commit pass runs after planning and pairing:
//!
//! - `current_position` takes the planned `next_position`
//! - `next_position` is cleared
//! - health drops by [`HEALTH_DECAY`]
//! - an agent whose health reaches zero is marked dead
//!
//! Every agent is validated before any agent is mutated, so a failed commit
//! leaves the population untouched.

use savanna_types::Agent;
use tracing::debug;

use crate::error::{AgentError, MissingAttribute};
use crate::population::Population;

/// Health lost by every agent on every commit.
pub const HEALTH_DECAY: f64 = 0.5;

/// Counts produced by one commit pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Agents whose cell changed.
    pub moved: usize,
    /// Agents that ran out of health during this commit.
    pub starved: usize,
}

/// Check that `agent` can be committed, listing everything it lacks.
pub fn validate_for_commit(agent: &Agent) -> Result<(), AgentError> {
    let mut missing = Vec::new();
    if agent.current_position.is_none() {
        missing.push(MissingAttribute::CurrentPosition);
    }
    if agent.next_position.is_none() {
        missing.push(MissingAttribute::NextPosition);
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AgentError::InvalidAgent {
            agent: agent.id,
            missing,
        })
    }
}

/// Commit one agent's planned move and apply decay.
///
/// Returns `(moved, starved)` for this agent.
///
/// Agents already dead going into the commit (eaten this tick) still take
/// their step but count as neither moved nor starved.
fn commit_agent(agent: &mut Agent) -> (bool, bool) {
    let moved = agent.alive && agent.next_position != agent.current_position;
    if let Some(next) = agent.next_position.take() {
        agent.current_position = Some(next);
    }
    agent.health -= HEALTH_DECAY;
    let starved = agent.alive && agent.health <= 0.0;
    if starved {
        agent.alive = false;
        debug!(agent = %agent.id, species = %agent.species, "Agent starved");
    }
    (moved, starved)
}

/// Commit every agent in population order.
pub fn commit_moves(population: &mut Population) -> Result<CommitOutcome, AgentError> {
    for agent in population.iter() {
        validate_for_commit(agent)?;
    }

    let mut outcome = CommitOutcome::default();
    for agent in population.iter_mut() {
        let (moved, starved) = commit_agent(agent);
        if moved {
            outcome.moved = outcome.moved.saturating_add(1);
        }
        if starved {
            outcome.starved = outcome.starved.saturating_add(1);
        }
    }
    Ok(outcome)
}
