//! Per-agent movement decisions.
//!
//! Planning is split from application. [`Mover::plan`] reads the population
//! and returns a [`MovePlan`]; [`apply_plan`] writes it back. The orchestrator
//! applies each plan before the next agent plans, so a cell claimed by an
//! earlier agent is no longer a candidate for a later one.
//!
//! # Rules ([`SavannaMover`])
//!
//! 1. Scan the square neighborhood of radius `vision_range` for alive agents.
//! 2. Candidate moves are the in-bounds Moore neighbors that nobody stands on
//!    and nobody has claimed. With no candidates the agent stays put.
//! 3. A Lion targets the nearest visible Antelope. At distance 1 it eats; on
//!    a diagonal it steps onto the target's cell; otherwise it takes the
//!    candidate closest to the target. With nothing in sight it wanders.
//! 4. An Antelope scores every candidate against every visible Lion and takes
//!    the highest total. With nothing in sight it wanders.
//!
//! Distances are compared as exact squared integers.

use rand::Rng;
use savanna_types::{Agent, AgentId, Cell, Species};
use savanna_world::Grid;
use tracing::debug;

use crate::SimRng;
use crate::error::{AgentError, MissingAttribute};
use crate::population::Population;
use crate::vitals::{self, CommitOutcome};

/// Health a lion gains from eating.
pub const EAT_BONUS: f64 = 10.0;

/// What a planned move does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    /// No candidate cell was free; the agent keeps its cell.
    Stay,
    /// Step to a neighboring cell.
    Step,
    /// Step onto `prey`'s cell and eat it.
    Eat {
        /// The antelope being eaten.
        prey: AgentId,
    },
}

/// One agent's decision for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    /// The planning agent.
    pub agent: AgentId,
    /// Cell the agent will occupy after commit.
    pub next: Cell,
    /// What the move does.
    pub action: MoveAction,
}

/// A movement strategy.
///
/// The orchestrator calls [`Mover::plan`] once per agent in population order,
/// applying each plan before the next call, then [`Mover::commit`] once.
pub trait Mover {
    /// Decide where `agent` moves this tick. Must not mutate shared state.
    fn plan(
        &mut self,
        agent: AgentId,
        population: &Population,
        grid: &Grid,
        rng: &mut SimRng,
    ) -> Result<MovePlan, AgentError>;

    /// Move every agent to its planned cell and apply health decay.
    fn commit(&mut self, population: &mut Population) -> Result<CommitOutcome, AgentError> {
        vitals::commit_moves(population)
    }
}

/// The standard Lion/Antelope rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SavannaMover;

impl SavannaMover {
    /// Create the standard mover.
    pub const fn new() -> Self {
        Self
    }
}

impl Mover for SavannaMover {
    fn plan(
        &mut self,
        agent: AgentId,
        population: &Population,
        grid: &Grid,
        rng: &mut SimRng,
    ) -> Result<MovePlan, AgentError> {
        let me = population.require(agent)?;
        let current = require_current(me)?;

        let visible = visible_agents(population, grid, me, current);
        let candidates = candidate_moves(population, grid, current);

        if candidates.is_empty() {
            return Ok(MovePlan {
                agent,
                next: current,
                action: MoveAction::Stay,
            });
        }

        let plan = match me.species {
            Species::Lion => plan_lion(me, current, &visible, &candidates, population, rng),
            Species::Antelope => plan_antelope(me, current, &visible, &candidates, rng),
        };
        Ok(plan.unwrap_or(MovePlan {
            agent,
            next: current,
            action: MoveAction::Stay,
        }))
    }
}

/// Write `plan` into the population.
///
/// Sets the planner's next position. An eat additionally kills the prey,
/// adds [`EAT_BONUS`] to the planner's health and raises `just_ate`.
///
/// An alive agent that has to stay put may find its own cell already
/// claimed by a lion closing in on it. That claim is withdrawn and the lion
/// keeps its current cell, so no two alive agents end the tick together.
pub fn apply_plan(population: &mut Population, plan: &MovePlan) -> Result<(), AgentError> {
    if plan.action == MoveAction::Stay {
        withdraw_claim_on(population, plan)?;
    }
    if let MoveAction::Eat { prey } = plan.action {
        let target = population.require_mut(prey)?;
        target.alive = false;
        let lion = population.require_mut(plan.agent)?;
        lion.health += EAT_BONUS;
        lion.just_ate = true;
        lion.next_position = Some(plan.next);
        debug!(lion = %plan.agent, antelope = %prey, cell = %plan.next, "Lion ate antelope");
        return Ok(());
    }
    population.require_mut(plan.agent)?.next_position = Some(plan.next);
    Ok(())
}

fn withdraw_claim_on(population: &mut Population, plan: &MovePlan) -> Result<(), AgentError> {
    if !population.require(plan.agent)?.alive {
        return Ok(());
    }
    let Some((claimer, home)) = population
        .occupant_at_next(plan.next)
        .filter(|other| other.id != plan.agent)
        .map(|other| (other.id, other.current_position))
    else {
        return Ok(());
    };
    let home = home.ok_or_else(|| AgentError::InvalidAgent {
        agent: claimer,
        missing: vec![MissingAttribute::CurrentPosition],
    })?;
    population.require_mut(claimer)?.next_position = Some(home);
    debug!(
        agent = %claimer,
        target = %plan.agent,
        cell = %plan.next,
        "Close-in withdrawn, target is boxed in"
    );
    Ok(())
}

/// Check that `agent` can be planned: it must be on the grid.
pub fn validate_for_plan(agent: &Agent) -> Result<(), AgentError> {
    require_current(agent).map(|_| ())
}

/// In-bounds Moore neighbors of `from` that have no alive occupant and are
/// not claimed as anyone's next position, row-major.
pub fn candidate_moves(population: &Population, grid: &Grid, from: Cell) -> Vec<Cell> {
    grid.moore_neighbors(from)
        .into_iter()
        .filter(|c| population.occupant_at_current(*c).is_none())
        .filter(|c| population.occupant_at_next(*c).is_none())
        .collect()
}

/// Danger score contributed by one lion for one candidate cell.
///
/// `lion_sq` is the squared distance from the lion to the antelope now and
/// `candidate_sq` the squared distance from the lion to the candidate.
pub const fn danger_score(lion_sq: i64, candidate_sq: i64) -> f64 {
    if candidate_sq <= lion_sq {
        0.5
    } else if lion_sq <= 1 {
        4.0
    } else if lion_sq < 4 {
        3.0
    } else if lion_sq == 4 {
        1.5
    } else {
        1.0
    }
}

fn require_current(agent: &Agent) -> Result<Cell, AgentError> {
    agent.current_position.ok_or_else(|| AgentError::InvalidAgent {
        agent: agent.id,
        missing: vec![MissingAttribute::CurrentPosition],
    })
}

fn visible_agents<'a>(
    population: &'a Population,
    grid: &Grid,
    me: &Agent,
    current: Cell,
) -> Vec<&'a Agent> {
    grid.square_neighborhood(current, me.vision_range)
        .into_iter()
        .filter_map(|c| population.occupant_at_current(c))
        .filter(|other| other.id != me.id)
        .collect()
}

fn random_step(agent: AgentId, candidates: &[Cell], rng: &mut SimRng) -> Option<MovePlan> {
    if candidates.is_empty() {
        return None;
    }
    let pick = rng.random_range(0..candidates.len());
    candidates.get(pick).map(|next| MovePlan {
        agent,
        next: *next,
        action: MoveAction::Step,
    })
}

fn plan_lion(
    me: &Agent,
    current: Cell,
    visible: &[&Agent],
    candidates: &[Cell],
    population: &Population,
    rng: &mut SimRng,
) -> Option<MovePlan> {
    let reach = i64::from(me.vision_range).saturating_mul(2);
    let mut bound = reach.saturating_mul(reach);
    let mut target: Option<(&Agent, Cell)> = None;
    for other in visible.iter().filter(|a| a.is_antelope()) {
        let Some(cell) = other.current_position else {
            continue;
        };
        let sq = current.distance_squared(cell);
        if sq < bound {
            bound = sq;
            target = Some((*other, cell));
        }
    }

    let Some((prey, prey_cell)) = target else {
        return random_step(me.id, candidates, rng);
    };

    let sq = current.distance_squared(prey_cell);
    let unclaimed = population.occupant_at_next(prey_cell).is_none();
    if sq == 1 && unclaimed {
        return Some(MovePlan {
            agent: me.id,
            next: prey_cell,
            action: MoveAction::Eat { prey: prey.id },
        });
    }
    if (2..4).contains(&sq) && unclaimed {
        return Some(MovePlan {
            agent: me.id,
            next: prey_cell,
            action: MoveAction::Step,
        });
    }

    let mut best: Option<(Cell, i64)> = None;
    for cell in candidates {
        let d = cell.distance_squared(prey_cell);
        if best.is_none_or(|(_, b)| d < b) {
            best = Some((*cell, d));
        }
    }
    best.map(|(next, _)| MovePlan {
        agent: me.id,
        next,
        action: MoveAction::Step,
    })
}

fn plan_antelope(
    me: &Agent,
    current: Cell,
    visible: &[&Agent],
    candidates: &[Cell],
    rng: &mut SimRng,
) -> Option<MovePlan> {
    let lions: Vec<Cell> = visible
        .iter()
        .filter(|a| a.is_lion())
        .filter_map(|a| a.current_position)
        .collect();
    if lions.is_empty() {
        return random_step(me.id, candidates, rng);
    }

    let mut best: Option<(Cell, f64)> = None;
    for cell in candidates {
        let score: f64 = lions
            .iter()
            .map(|lion| danger_score(lion.distance_squared(current), lion.distance_squared(*cell)))
            .sum();
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((*cell, score));
        }
    }
    best.map(|(next, _)| MovePlan {
        agent: me.id,
        next,
        action: MoveAction::Step,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn grid(w: i32, h: i32) -> Grid {
        Grid::new(w, h).unwrap()
    }

    fn rng() -> SimRng {
        SimRng::seed_from_u64(42)
    }

    fn place(pop: &mut Population, id: u64, species: Species, x: i32, y: i32) -> AgentId {
        pop.insert(Agent::new(AgentId(id), species).at(Cell::new(x, y)));
        AgentId(id)
    }

    #[test]
    fn lion_eats_orthogonally_adjacent_antelope() {
        let g = grid(5, 5);
        let mut pop = Population::new();
        let lion = place(&mut pop, 1, Species::Lion, 2, 2);
        let antelope = place(&mut pop, 2, Species::Antelope, 1, 2);

        let plan = SavannaMover.plan(lion, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.next, Cell::new(1, 2));
        assert_eq!(plan.action, MoveAction::Eat { prey: antelope });

        apply_plan(&mut pop, &plan).unwrap();
        let lion = pop.get(lion).unwrap();
        assert!(!pop.get(antelope).unwrap().alive);
        assert!((lion.health - 25.0).abs() < f64::EPSILON);
        assert!(lion.just_ate);
        assert_eq!(lion.next_position, Some(Cell::new(1, 2)));
    }

    #[test]
    fn lion_closes_in_on_diagonal_without_eating() {
        let g = grid(5, 5);
        let mut pop = Population::new();
        let lion = place(&mut pop, 1, Species::Lion, 2, 2);
        let antelope = place(&mut pop, 2, Species::Antelope, 1, 1);

        let plan = SavannaMover.plan(lion, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.next, Cell::new(1, 1));
        assert_eq!(plan.action, MoveAction::Step);

        apply_plan(&mut pop, &plan).unwrap();
        assert!(pop.get(antelope).unwrap().alive);
        assert!(!pop.get(lion).unwrap().just_ate);
    }

    #[test]
    fn lion_does_not_eat_claimed_cell() {
        let g = grid(5, 5);
        let mut pop = Population::new();
        let lion = place(&mut pop, 1, Species::Lion, 2, 2);
        place(&mut pop, 2, Species::Antelope, 3, 2);
        let mut other = Agent::new(AgentId(3), Species::Lion).at(Cell::new(4, 4));
        other.next_position = Some(Cell::new(3, 2));
        pop.insert(other);

        let plan = SavannaMover.plan(lion, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.action, MoveAction::Step);
        assert_ne!(plan.next, Cell::new(3, 2));
        // Closest free candidates to (3, 2) are (3, 1) and (3, 3); row-major
        // order picks (3, 1) first.
        assert_eq!(plan.next, Cell::new(3, 1));
    }

    #[test]
    fn lion_chases_distant_antelope() {
        let g = grid(10, 10);
        let mut pop = Population::new();
        let lion = place(&mut pop, 1, Species::Lion, 2, 2);
        place(&mut pop, 2, Species::Antelope, 4, 4);

        let plan = SavannaMover.plan(lion, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.next, Cell::new(3, 3));
    }

    #[test]
    fn lion_targets_nearest_antelope() {
        let g = grid(10, 10);
        let mut pop = Population::new();
        let lion = place(&mut pop, 1, Species::Lion, 5, 5);
        place(&mut pop, 2, Species::Antelope, 7, 7);
        let near = place(&mut pop, 3, Species::Antelope, 5, 6);

        let plan = SavannaMover.plan(lion, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.action, MoveAction::Eat { prey: near });
    }

    #[test]
    fn antelope_flees_three_lions() {
        let g = grid(5, 5);
        let mut pop = Population::new();
        let mut antelope = Agent::new(AgentId(1), Species::Antelope).at(Cell::new(2, 2));
        antelope.vision_range = 2;
        pop.insert(antelope);
        place(&mut pop, 2, Species::Lion, 1, 1);
        place(&mut pop, 3, Species::Lion, 1, 3);
        place(&mut pop, 4, Species::Lion, 3, 1);

        let plan = SavannaMover.plan(AgentId(1), &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.next, Cell::new(3, 3));
    }

    #[test]
    fn boxed_in_prey_keeps_its_cell_against_close_in() {
        let g = grid(3, 2);
        let mut pop = Population::new();
        let closer = place(&mut pop, 1, Species::Lion, 1, 1);
        place(&mut pop, 2, Species::Lion, 1, 0);
        place(&mut pop, 3, Species::Lion, 0, 1);
        let prey = place(&mut pop, 4, Species::Antelope, 0, 0);

        let plan = SavannaMover.plan(closer, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.next, Cell::new(0, 0));
        apply_plan(&mut pop, &plan).unwrap();

        let stay = SavannaMover.plan(prey, &pop, &g, &mut rng()).unwrap();
        assert_eq!(stay.action, MoveAction::Stay);
        apply_plan(&mut pop, &stay).unwrap();

        assert_eq!(pop.get(closer).unwrap().next_position, Some(Cell::new(1, 1)));
        assert_eq!(pop.get(prey).unwrap().next_position, Some(Cell::new(0, 0)));
    }

    #[test]
    fn eaten_prey_staying_put_does_not_undo_the_eat() {
        let mut pop = Population::new();
        let lion = place(&mut pop, 1, Species::Lion, 1, 0);
        let prey = place(&mut pop, 2, Species::Antelope, 0, 0);
        apply_plan(
            &mut pop,
            &MovePlan {
                agent: lion,
                next: Cell::new(0, 0),
                action: MoveAction::Eat { prey },
            },
        )
        .unwrap();
        apply_plan(
            &mut pop,
            &MovePlan {
                agent: prey,
                next: Cell::new(0, 0),
                action: MoveAction::Stay,
            },
        )
        .unwrap();
        assert_eq!(pop.get(lion).unwrap().next_position, Some(Cell::new(0, 0)));
    }

    #[test]
    fn danger_table() {
        assert!((danger_score(1, 1) - 0.5).abs() < f64::EPSILON);
        assert!((danger_score(1, 2) - 4.0).abs() < f64::EPSILON);
        assert!((danger_score(2, 5) - 3.0).abs() < f64::EPSILON);
        assert!((danger_score(4, 5) - 1.5).abs() < f64::EPSILON);
        assert!((danger_score(8, 9) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boxed_in_agent_stays() {
        let g = grid(2, 1);
        let mut pop = Population::new();
        let a = place(&mut pop, 1, Species::Antelope, 0, 0);
        place(&mut pop, 2, Species::Antelope, 1, 0);

        let plan = SavannaMover.plan(a, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.action, MoveAction::Stay);
        assert_eq!(plan.next, Cell::new(0, 0));
    }

    #[test]
    fn lone_agent_wanders_to_neighbor() {
        let g = grid(5, 5);
        let mut pop = Population::new();
        let a = place(&mut pop, 1, Species::Lion, 2, 2);
        let plan = SavannaMover.plan(a, &pop, &g, &mut rng()).unwrap();
        assert_eq!(plan.action, MoveAction::Step);
        assert!(Cell::new(2, 2).distance_squared(plan.next) <= 2);
        assert!(g.in_bounds(plan.next));
    }

    #[test]
    fn candidates_skip_occupied_and_claimed() {
        let g = grid(3, 3);
        let mut pop = Population::new();
        place(&mut pop, 1, Species::Lion, 1, 1);
        place(&mut pop, 2, Species::Antelope, 0, 0);
        let mut claimer = Agent::new(AgentId(3), Species::Antelope).at(Cell::new(2, 2));
        claimer.next_position = Some(Cell::new(1, 0));
        pop.insert(claimer);

        let cells = candidate_moves(&pop, &g, Cell::new(1, 1));
        assert!(!cells.contains(&Cell::new(0, 0)));
        assert!(!cells.contains(&Cell::new(1, 0)));
        assert!(!cells.contains(&Cell::new(2, 2)));
        assert_eq!(cells.len(), 5);
    }

    #[test]
    fn unplaced_agent_is_rejected() {
        let g = grid(5, 5);
        let mut pop = Population::new();
        pop.insert(Agent::new(AgentId(1), Species::Lion));
        let err = SavannaMover.plan(AgentId(1), &pop, &g, &mut rng()).unwrap_err();
        assert!(matches!(
            err,
            AgentError::InvalidAgent { agent: AgentId(1), ref missing }
                if missing == &[MissingAttribute::CurrentPosition]
        ));
    }

    #[test]
    fn unknown_agent_is_rejected() {
        let g = grid(5, 5);
        let pop = Population::new();
        let err = SavannaMover.plan(AgentId(9), &pop, &g, &mut rng()).unwrap_err();
        assert!(matches!(err, AgentError::AgentNotFound(AgentId(9))));
    }
}
