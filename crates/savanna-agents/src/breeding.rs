//! Pair bonding and breeding.
//!
//! Two alive agents of the same species that stand orthogonally adjacent and
//! plan to stay adjacent form a [`Pair`]. Each tick the pair stays adjacent
//! its `rounds_together` grows; when it reaches [`BREEDING_THRESHOLD`] a
//! newborn is placed next to the parents and the bond ends. A bond also ends
//! as soon as the parents drift apart or one of them is culled.
//!
//! ```text
//! Forming -> Bonded(1) -> Bonded(2) -> Bonded(3) + birth -> Dissolved
//!                 \____________\___________________________/
//!                         adjacency broken
//! ```
//!
//! Newborns are buffered as a species and a cell. Ids are only issued when
//! the orchestrator merges them, keeping the id counter with the population.

use rand::Rng;
use savanna_types::{Agent, AgentId, Cell, Species};
use savanna_world::Grid;
use tracing::debug;

use crate::SimRng;
use crate::error::{AgentError, MissingAttribute};
use crate::mover::candidate_moves;
use crate::population::Population;

/// Rounds a pair must spend adjacent before a newborn arrives.
pub const BREEDING_THRESHOLD: u32 = 3;

/// A bond between two same-species agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    /// The member with the higher id.
    pub higher: AgentId,
    /// The member with the lower id.
    pub lower: AgentId,
    /// Consecutive evaluations the members have stayed adjacent.
    pub rounds_together: u32,
    /// Marked for removal at the end of the pairing step.
    pub broke_up: bool,
}

impl Pair {
    /// A fresh bond in canonical `(higher, lower)` order.
    pub fn new(a: AgentId, b: AgentId) -> Self {
        Self {
            higher: a.max(b),
            lower: a.min(b),
            rounds_together: 1,
            broke_up: false,
        }
    }

    /// Whether this pair joins exactly `a` and `b`, in either order.
    pub fn joins(&self, a: AgentId, b: AgentId) -> bool {
        self.higher == a.max(b) && self.lower == a.min(b)
    }
}

/// A newborn waiting to be merged into the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingBirth {
    /// Species inherited from the parents.
    pub species: Species,
    /// Cell the newborn will occupy.
    pub cell: Cell,
}

/// A pairing and breeding strategy.
///
/// The orchestrator runs [`PairEngine::pair_step`] once per tick after every
/// agent has planned, and [`PairEngine::merge_newborns`] after commit.
pub trait PairEngine {
    /// Advance every tracked pair by one evaluation.
    fn evaluate_existing_pairs(
        &mut self,
        population: &Population,
        grid: &Grid,
        rng: &mut SimRng,
    ) -> Result<(), AgentError>;

    /// Register new bonds between `agent` and its eligible neighbors.
    fn discover_new_pairs(
        &mut self,
        agent: AgentId,
        population: &Population,
        grid: &Grid,
    ) -> Result<(), AgentError>;

    /// Drop every pair marked as broken up.
    fn prune(&mut self);

    /// Create agents for the buffered newborns, insert them, and clear the
    /// buffer. Returns how many were merged.
    fn merge_newborns(&mut self, population: &mut Population) -> Result<usize, AgentError>;

    /// Evaluate, discover for every agent in population order, then prune.
    fn pair_step(
        &mut self,
        population: &Population,
        grid: &Grid,
        rng: &mut SimRng,
    ) -> Result<(), AgentError> {
        self.evaluate_existing_pairs(population, grid, rng)?;
        for agent in population.ids() {
            self.discover_new_pairs(agent, population, grid)?;
        }
        self.prune();
        Ok(())
    }
}

/// The standard pair book: tracked bonds plus a newborn buffer.
#[derive(Debug, Clone, Default)]
pub struct PairBook {
    pairs: Vec<Pair>,
    newborns: Vec<PendingBirth>,
}

impl PairBook {
    /// Create an empty book.
    pub const fn new() -> Self {
        Self {
            pairs: Vec::new(),
            newborns: Vec::new(),
        }
    }

    /// Currently tracked pairs.
    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Newborns waiting to be merged.
    pub fn pending(&self) -> &[PendingBirth] {
        &self.newborns
    }

    /// Whether a pair joining `a` and `b` is tracked.
    pub fn contains(&self, a: AgentId, b: AgentId) -> bool {
        self.pairs.iter().any(|p| p.joins(a, b))
    }

    /// Buffer a newborn next to the parents of `pair`.
    ///
    /// The cell is drawn from the union of both parents' candidate moves,
    /// minus cells another newborn already holds. With no cell left nothing
    /// is buffered.
    pub fn trigger_birth(
        &mut self,
        pair: &Pair,
        population: &Population,
        grid: &Grid,
        rng: &mut SimRng,
    ) -> Option<PendingBirth> {
        let first = population.get(pair.higher)?;
        let second = population.get(pair.lower)?;

        let mut cells: Vec<Cell> = Vec::new();
        for parent in [first, second] {
            let Some(from) = parent.current_position else {
                continue;
            };
            for cell in candidate_moves(population, grid, from) {
                if !cells.contains(&cell) && !self.newborns.iter().any(|n| n.cell == cell) {
                    cells.push(cell);
                }
            }
        }
        if cells.is_empty() {
            debug!(higher = %pair.higher, lower = %pair.lower, "No room for newborn");
            return None;
        }

        let pick = rng.random_range(0..cells.len());
        let cell = *cells.get(pick)?;
        let birth = PendingBirth {
            species: first.species,
            cell,
        };
        debug!(species = %birth.species, %cell, "Newborn conceived");
        self.newborns.push(birth);
        Some(birth)
    }
}

fn adjacent(a: &Agent, b: &Agent) -> bool {
    match (a.current_position, b.current_position) {
        (Some(x), Some(y)) => x.distance_squared(y) == 1,
        _ => false,
    }
}

impl PairEngine for PairBook {
    fn evaluate_existing_pairs(
        &mut self,
        population: &Population,
        grid: &Grid,
        rng: &mut SimRng,
    ) -> Result<(), AgentError> {
        let mut pairs = core::mem::take(&mut self.pairs);
        for pair in &mut pairs {
            let still_together = match (population.get(pair.higher), population.get(pair.lower)) {
                (Some(a), Some(b)) => adjacent(a, b),
                _ => false,
            };
            if !still_together {
                pair.broke_up = true;
                debug!(higher = %pair.higher, lower = %pair.lower, "Pair broke up");
                continue;
            }
            pair.rounds_together = pair.rounds_together.saturating_add(1);
            if pair.rounds_together >= BREEDING_THRESHOLD {
                self.trigger_birth(pair, population, grid, rng);
                pair.broke_up = true;
            }
        }
        self.pairs = pairs;
        Ok(())
    }

    fn discover_new_pairs(
        &mut self,
        agent: AgentId,
        population: &Population,
        grid: &Grid,
    ) -> Result<(), AgentError> {
        let me = population.require(agent)?;
        if !me.alive {
            return Ok(());
        }
        let current = me.current_position.ok_or_else(|| AgentError::InvalidAgent {
            agent,
            missing: vec![MissingAttribute::CurrentPosition],
        })?;

        for cell in grid.square_neighborhood(current, 1) {
            let Some(other) = population.occupant_at_current(cell) else {
                continue;
            };
            if other.id == agent
                || other.species != me.species
                || current.distance_squared(cell) > 1
                || self.contains(agent, other.id)
            {
                continue;
            }
            let mine = me
                .next_position
                .ok_or(AgentError::NextPositionUnset { agent })?;
            let theirs = other
                .next_position
                .ok_or(AgentError::NextPositionUnset { agent: other.id })?;
            if mine.distance_squared(theirs) == 1 && me.alive && other.alive {
                let pair = Pair::new(agent, other.id);
                debug!(higher = %pair.higher, lower = %pair.lower, "Pair formed");
                self.pairs.push(pair);
            }
        }
        Ok(())
    }

    fn prune(&mut self) {
        self.pairs.retain(|p| !p.broke_up);
    }

    fn merge_newborns(&mut self, population: &mut Population) -> Result<usize, AgentError> {
        let births = core::mem::take(&mut self.newborns);
        let mut newborns = Vec::with_capacity(births.len());
        for birth in &births {
            let agent = population.spawn(birth.species)?.at(birth.cell);
            debug!(agent = %agent.id, species = %agent.species, cell = %birth.cell, "Newborn arrived");
            newborns.push(agent);
        }
        let count = newborns.len();
        population.merge(newborns);
        Ok(count)
    }
}
