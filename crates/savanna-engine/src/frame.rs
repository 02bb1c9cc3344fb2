//! Tick callback that prints the grid as a text frame.
//!
//! Each cell is `.` when empty or the occupant's symbol. With color enabled
//! the symbol is wrapped in an ANSI escape chosen by its [`Tint`].

use std::collections::BTreeMap;

use savanna_core::runner::TickCallback;
use savanna_core::tick::{SimulationState, TickReport};
use savanna_types::{Appearance, Cell, Species, Tint};

const EMPTY: char = '.';
const RESET: &str = "\u{1b}[0m";

/// Prints a frame after every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameCallback {
    color: bool,
}

impl FrameCallback {
    /// Create a frame printer.
    pub const fn new(color: bool) -> Self {
        Self { color }
    }
}

impl TickCallback for FrameCallback {
    fn on_tick(&mut self, report: &TickReport, state: &SimulationState) {
        print!("{}", render_frame(report, state, self.color));
    }
}

const fn escape(tint: Tint) -> Option<&'static str> {
    match tint {
        Tint::Normal => None,
        Tint::Fed => Some("\u{1b}[31m"),
        Tint::Weak => Some("\u{1b}[2m"),
    }
}

/// Render the header line and grid for one tick.
pub fn render_frame(report: &TickReport, state: &SimulationState, color: bool) -> String {
    let occupants: BTreeMap<Cell, Appearance> = state
        .population
        .iter()
        .filter(|agent| agent.alive)
        .filter_map(|agent| agent.current_position.map(|cell| (cell, agent.appearance())))
        .collect();

    let mut out = format!(
        "tick {}  lions {}  antelopes {}  births {}  deaths {}\n",
        report.tick,
        state.population.count(Species::Lion),
        state.population.count(Species::Antelope),
        report.births,
        report.deaths,
    );

    for y in 0..state.grid.height() {
        for x in 0..state.grid.width() {
            match occupants.get(&Cell::new(x, y)) {
                Some(look) => match escape(look.tint).filter(|_| color) {
                    Some(code) => {
                        out.push_str(code);
                        out.push(look.symbol);
                        out.push_str(RESET);
                    }
                    None => out.push(look.symbol),
                },
                None => out.push(EMPTY),
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use savanna_types::{Agent, AgentId};
    use savanna_world::Grid;

    use super::*;

    fn state_with(agents: Vec<Agent>) -> SimulationState {
        let mut state = SimulationState::new(Grid::new(3, 2).unwrap(), 42);
        for agent in agents {
            state.population.insert(agent);
        }
        state
    }

    fn report(tick: u64) -> TickReport {
        TickReport {
            tick,
            ..TickReport::default()
        }
    }

    #[test]
    fn plain_frame_shows_symbols() {
        let state = state_with(vec![
            Agent::new(AgentId(1), Species::Lion).at(Cell::new(0, 0)),
            Agent::new(AgentId(2), Species::Antelope).at(Cell::new(2, 1)),
        ]);
        let frame = render_frame(&report(4), &state, false);
        assert_eq!(
            frame,
            "tick 4  lions 1  antelopes 1  births 0  deaths 0\nL..\n..A\n"
        );
    }

    #[test]
    fn dead_agents_are_not_drawn() {
        let mut eaten = Agent::new(AgentId(1), Species::Antelope).at(Cell::new(1, 0));
        eaten.alive = false;
        let state = state_with(vec![eaten]);
        let frame = render_frame(&report(1), &state, false);
        assert!(frame.ends_with("...\n...\n"));
    }

    #[test]
    fn color_follows_tint() {
        let mut fed = Agent::new(AgentId(1), Species::Lion).at(Cell::new(0, 0));
        fed.just_ate = true;
        let mut weak = Agent::new(AgentId(2), Species::Antelope).at(Cell::new(1, 0));
        weak.health = 1.0;
        let normal = Agent::new(AgentId(3), Species::Antelope).at(Cell::new(2, 0));
        let state = state_with(vec![fed, weak, normal]);

        let frame = render_frame(&report(1), &state, true);
        let first_row = frame.lines().nth(1).unwrap();
        assert_eq!(first_row, "\u{1b}[31mL\u{1b}[0m\u{1b}[2mA\u{1b}[0mA");
    }

    #[test]
    fn color_disabled_ignores_tint() {
        let mut fed = Agent::new(AgentId(1), Species::Lion).at(Cell::new(0, 0));
        fed.just_ate = true;
        let state = state_with(vec![fed]);
        let frame = render_frame(&report(1), &state, false);
        assert!(!frame.contains('\u{1b}'));
    }
}
