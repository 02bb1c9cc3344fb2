//! Initial population seeding.
//!
//! Lions are placed first, then antelopes, each through the same
//! capacity-checked path the `a`/`l` commands use. Requests beyond the
//! half-full limit are counted as skipped rather than failing startup.

use savanna_agents::AgentError;
use savanna_core::command::{self, SpawnOutcome};
use savanna_core::config::PopulationConfig;
use savanna_core::tick::SimulationState;
use savanna_types::Species;
use tracing::info;

/// How many agents the seeding pass placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnSummary {
    /// Lions placed.
    pub lions: u32,
    /// Antelopes placed.
    pub antelopes: u32,
    /// Requests dropped because the grid was full.
    pub skipped: u32,
}

/// Place the configured number of lions and antelopes.
pub fn spawn_initial_population(
    state: &mut SimulationState,
    config: &PopulationConfig,
) -> Result<SpawnSummary, AgentError> {
    let mut summary = SpawnSummary::default();

    for (species, count) in [
        (Species::Lion, config.initial_lions),
        (Species::Antelope, config.initial_antelopes),
    ] {
        for _ in 0..count {
            match command::spawn_agent(state, species)? {
                SpawnOutcome::Placed(_) => match species {
                    Species::Lion => summary.lions = summary.lions.saturating_add(1),
                    Species::Antelope => {
                        summary.antelopes = summary.antelopes.saturating_add(1);
                    }
                },
                SpawnOutcome::NoCapacity => summary.skipped = summary.skipped.saturating_add(1),
            }
        }
    }

    info!(
        lions = summary.lions,
        antelopes = summary.antelopes,
        skipped = summary.skipped,
        "Initial population placed"
    );
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use savanna_world::Grid;

    use super::*;

    fn population(initial_lions: u32, initial_antelopes: u32) -> PopulationConfig {
        PopulationConfig {
            initial_lions,
            initial_antelopes,
        }
    }

    #[test]
    fn places_requested_counts() {
        let mut state = SimulationState::new(Grid::new(20, 10).unwrap(), 42);
        let summary = spawn_initial_population(&mut state, &population(3, 8)).unwrap();

        assert_eq!(summary.lions, 3);
        assert_eq!(summary.antelopes, 8);
        assert_eq!(summary.skipped, 0);
        assert_eq!(state.population.count(Species::Lion), 3);
        assert_eq!(state.population.count(Species::Antelope), 8);
    }

    #[test]
    fn placed_agents_share_no_cell() {
        let mut state = SimulationState::new(Grid::new(6, 6).unwrap(), 3);
        spawn_initial_population(&mut state, &population(4, 10)).unwrap();

        let mut cells: Vec<_> = state
            .population
            .iter()
            .filter_map(|a| a.current_position)
            .collect();
        let placed = cells.len();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), placed);
    }

    #[test]
    fn overflow_is_skipped() {
        // A 3x2 grid holds at most four agents before the half-full check trips.
        let mut state = SimulationState::new(Grid::new(3, 2).unwrap(), 1);
        let summary = spawn_initial_population(&mut state, &population(2, 5)).unwrap();

        assert_eq!(summary.lions, 2);
        assert_eq!(summary.antelopes, 2);
        assert_eq!(summary.skipped, 3);
        assert_eq!(state.population.len(), 4);
    }
}
