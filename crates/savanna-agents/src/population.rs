//! The population index: sole owner of every agent.
//!
//! Agents live in a vector in insertion order, which is also the order the
//! orchestrator plans and commits them in. A `BTreeMap` from [`AgentId`] to
//! slot keeps lookups cheap and is rebuilt whenever slots shift (culling).
//!
//! Other components refer to agents by [`AgentId`] handle only. A handle
//! whose agent has been culled simply stops resolving.

use std::collections::BTreeMap;

use rand::Rng;
use savanna_types::{Agent, AgentId, Cell, Species};
use savanna_world::Grid;
use tracing::debug;

use crate::error::AgentError;

/// Ordered collection of agents with an id counter.
#[derive(Debug, Clone)]
pub struct Population {
    agents: Vec<Agent>,
    index: BTreeMap<AgentId, usize>,
    next_id: AgentId,
}

impl Population {
    /// Create an empty population whose first issued id is `1`.
    pub const fn new() -> Self {
        Self {
            agents: Vec::new(),
            index: BTreeMap::new(),
            next_id: AgentId(1),
        }
    }

    /// Create an unplaced agent of `species` with the next id.
    ///
    /// The agent is not inserted; pass it to [`Population::place_new_agent`]
    /// or [`Population::insert`].
    pub fn spawn(&mut self, species: Species) -> Result<Agent, AgentError> {
        let id = self.next_id;
        self.next_id = id.checked_next().ok_or(AgentError::IdExhausted)?;
        Ok(Agent::new(id, species))
    }

    /// First alive agent standing on `cell`.
    pub fn occupant_at_current(&self, cell: Cell) -> Option<&Agent> {
        self.agents
            .iter()
            .find(|a| a.alive && a.current_position == Some(cell))
    }

    /// First agent, alive or not, that has claimed `cell` as its next
    /// position.
    pub fn occupant_at_next(&self, cell: Cell) -> Option<&Agent> {
        self.agents.iter().find(|a| a.next_position == Some(cell))
    }

    /// Place `agent` on a uniformly random free cell and insert it.
    ///
    /// Cells are sampled from `[0, width-1] x [0, height-1]` until one has no
    /// alive occupant. This never returns on a full grid; callers check
    /// [`Population::has_free_capacity`] first.
    pub fn place_new_agent<R: Rng + ?Sized>(
        &mut self,
        mut agent: Agent,
        grid: &Grid,
        rng: &mut R,
    ) -> AgentId {
        let cell = loop {
            let candidate = Cell::new(
                rng.random_range(0..grid.width()),
                rng.random_range(0..grid.height()),
            );
            if self.occupant_at_current(candidate).is_none() {
                break candidate;
            }
        };
        agent.current_position = Some(cell);
        let id = agent.id;
        debug!(agent = %id, species = %agent.species, %cell, "Agent placed");
        self.insert(agent);
        id
    }

    /// Whether the population is at most half the grid's cell count.
    pub fn has_free_capacity(&self, grid: &Grid) -> bool {
        let limit = grid.capacity().checked_div(2).unwrap_or(0);
        self.agents.len() <= limit
    }

    /// Insert an agent, replacing any existing agent with the same id.
    ///
    /// The id counter is advanced past `agent.id` so later spawns never
    /// collide with it.
    pub fn insert(&mut self, agent: Agent) {
        if agent.id >= self.next_id
            && let Some(next) = agent.id.checked_next()
        {
            self.next_id = next;
        }
        if let Some(slot) = self.index.get(&agent.id).copied()
            && let Some(existing) = self.agents.get_mut(slot)
        {
            *existing = agent;
            return;
        }
        self.index.insert(agent.id, self.agents.len());
        self.agents.push(agent);
    }

    /// Append newborns in order.
    pub fn merge(&mut self, newborns: impl IntoIterator<Item = Agent>) {
        for agent in newborns {
            self.insert(agent);
        }
    }

    /// Remove every agent that is no longer alive and return them.
    pub fn cull_dead(&mut self) -> Vec<Agent> {
        let (alive, dead): (Vec<Agent>, Vec<Agent>) =
            core::mem::take(&mut self.agents).into_iter().partition(|a| a.alive);
        self.agents = alive;
        self.reindex();
        dead
    }

    /// Look up an agent by id.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.index.get(&id).and_then(|slot| self.agents.get(*slot))
    }

    /// Look up an agent by id, mutably.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let slot = *self.index.get(&id)?;
        self.agents.get_mut(slot)
    }

    /// Look up an agent by id, failing with [`AgentError::AgentNotFound`].
    pub fn require(&self, id: AgentId) -> Result<&Agent, AgentError> {
        self.get(id).ok_or(AgentError::AgentNotFound(id))
    }

    /// Mutable variant of [`Population::require`].
    pub fn require_mut(&mut self, id: AgentId) -> Result<&mut Agent, AgentError> {
        self.get_mut(id).ok_or(AgentError::AgentNotFound(id))
    }

    /// Whether an agent with `id` is present (alive or awaiting cull).
    pub fn contains(&self, id: AgentId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of agents, including dead ones not yet culled.
    pub const fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the population is empty.
    pub const fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent ids in population order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| a.id).collect()
    }

    /// Iterate agents in population order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Iterate agents mutably in population order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    /// Number of alive agents of `species`.
    pub fn count(&self, species: Species) -> usize {
        self.agents
            .iter()
            .filter(|a| a.alive && a.species == species)
            .count()
    }

    fn reindex(&mut self) {
        self.index = self
            .agents
            .iter()
            .enumerate()
            .map(|(slot, a)| (a.id, slot))
            .collect();
    }
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn grid(w: i32, h: i32) -> Grid {
        Grid::new(w, h).unwrap()
    }

    #[test]
    fn spawn_issues_increasing_ids() {
        let mut pop = Population::new();
        let a = pop.spawn(Species::Lion).unwrap();
        let b = pop.spawn(Species::Antelope).unwrap();
        assert_eq!(a.id, AgentId(1));
        assert_eq!(b.id, AgentId(2));
        assert!(a.current_position.is_none());
        assert!(pop.is_empty());
    }

    #[test]
    fn placement_lands_on_free_in_bounds_cell() {
        let g = grid(4, 4);
        let mut pop = Population::new();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..8 {
            let agent = pop.spawn(Species::Antelope).unwrap();
            let id = pop.place_new_agent(agent, &g, &mut rng);
            let cell = pop.get(id).unwrap().current_position.unwrap();
            assert!(g.in_bounds(cell));
        }
        let mut cells: Vec<Cell> = pop.iter().filter_map(|a| a.current_position).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn placement_avoids_the_only_occupied_cell() {
        let g = grid(2, 1);
        let mut pop = Population::new();
        pop.insert(Agent::new(AgentId(1), Species::Lion).at(Cell::new(0, 0)));
        let mut rng = SmallRng::seed_from_u64(7);
        let agent = pop.spawn(Species::Antelope).unwrap();
        let id = pop.place_new_agent(agent, &g, &mut rng);
        assert_eq!(pop.get(id).unwrap().current_position, Some(Cell::new(1, 0)));
    }

    #[test]
    fn full_two_by_two_grid_has_no_free_capacity() {
        let g = grid(2, 2);
        let mut pop = Population::new();
        let cells = [(0, 0), (1, 0), (0, 1), (1, 1)];
        for (n, (x, y)) in (1_u64..).zip(cells) {
            pop.insert(Agent::new(AgentId(n), Species::Antelope).at(Cell::new(x, y)));
        }
        assert!(!pop.has_free_capacity(&g));
    }

    #[test]
    fn half_full_grid_still_has_capacity() {
        let g = grid(2, 2);
        let mut pop = Population::new();
        pop.insert(Agent::new(AgentId(1), Species::Lion).at(Cell::new(0, 0)));
        pop.insert(Agent::new(AgentId(2), Species::Lion).at(Cell::new(1, 1)));
        assert!(pop.has_free_capacity(&g));
    }

    #[test]
    fn occupant_at_current_ignores_dead() {
        let mut pop = Population::new();
        let mut dead = Agent::new(AgentId(1), Species::Antelope).at(Cell::new(2, 2));
        dead.alive = false;
        pop.insert(dead);
        assert!(pop.occupant_at_current(Cell::new(2, 2)).is_none());

        pop.insert(Agent::new(AgentId(2), Species::Lion).at(Cell::new(2, 2)));
        assert_eq!(pop.occupant_at_current(Cell::new(2, 2)).unwrap().id, AgentId(2));
    }

    #[test]
    fn occupant_at_next_includes_dead() {
        let mut pop = Population::new();
        let mut dead = Agent::new(AgentId(1), Species::Antelope).at(Cell::new(0, 0));
        dead.alive = false;
        dead.next_position = Some(Cell::new(1, 0));
        pop.insert(dead);
        assert_eq!(pop.occupant_at_next(Cell::new(1, 0)).unwrap().id, AgentId(1));
    }

    #[test]
    fn cull_removes_dead_and_keeps_order() {
        let mut pop = Population::new();
        for n in 1..=4 {
            let mut a = Agent::new(AgentId(n), Species::Lion);
            a.alive = matches!(n, 2 | 4);
            pop.insert(a);
        }
        let dead = pop.cull_dead();
        assert_eq!(dead.len(), 2);
        assert_eq!(pop.ids(), vec![AgentId(2), AgentId(4)]);
        assert!(pop.get(AgentId(1)).is_none());
        assert_eq!(pop.get(AgentId(4)).unwrap().id, AgentId(4));
    }

    #[test]
    fn insert_advances_counter() {
        let mut pop = Population::new();
        pop.insert(Agent::new(AgentId(10), Species::Lion));
        assert_eq!(pop.spawn(Species::Lion).unwrap().id, AgentId(11));
    }

    #[test]
    fn missing_agent_is_reported() {
        let pop = Population::new();
        assert!(matches!(
            pop.require(AgentId(3)),
            Err(AgentError::AgentNotFound(AgentId(3)))
        ));
    }
}
