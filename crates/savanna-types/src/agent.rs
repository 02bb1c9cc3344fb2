//! The agent record shared by every crate in the workspace.
//!
//! An [`Agent`] is plain data. Placement, planning, commit and culling are
//! performed by `savanna-agents` and orchestrated by `savanna-core`.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::ids::AgentId;
use crate::species::Species;

/// Health below which an agent is drawn as weak.
pub const WEAK_HEALTH: f64 = 2.0;

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// A single Lion or Antelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier issued by the population counter.
    pub id: AgentId,
    /// Species of the agent. Never changes.
    pub species: Species,
    /// Where the agent stands. `None` only between creation and placement.
    pub current_position: Option<Cell>,
    /// Where the agent will stand after the next commit.
    pub next_position: Option<Cell>,
    /// Remaining health. The agent dies when this reaches zero.
    pub health: f64,
    /// Whether the agent is still alive.
    pub alive: bool,
    /// Radius of the square neighborhood the agent perceives.
    pub vision_range: i32,
    /// Set for one frame after a lion eats.
    pub just_ate: bool,
}

impl Agent {
    /// Create an unplaced agent with the species' initial constants.
    pub const fn new(id: AgentId, species: Species) -> Self {
        Self {
            id,
            species,
            current_position: None,
            next_position: None,
            health: species.initial_health(),
            alive: true,
            vision_range: species.vision_range(),
            just_ate: false,
        }
    }

    /// Builder-style helper that places the agent at `cell`.
    #[must_use]
    pub const fn at(mut self, cell: Cell) -> Self {
        self.current_position = Some(cell);
        self
    }

    /// Whether the agent is a Lion.
    pub const fn is_lion(&self) -> bool {
        matches!(self.species, Species::Lion)
    }

    /// Whether the agent is an Antelope.
    pub const fn is_antelope(&self) -> bool {
        matches!(self.species, Species::Antelope)
    }

    /// Presentation hint for the agent's current state.
    pub fn appearance(&self) -> Appearance {
        let tint = if self.is_lion() && self.just_ate {
            Tint::Fed
        } else if self.health < WEAK_HEALTH {
            Tint::Weak
        } else {
            Tint::Normal
        };
        Appearance {
            symbol: self.species.symbol(),
            tint,
        }
    }
}

// ---------------------------------------------------------------------------
// Appearance
// ---------------------------------------------------------------------------

/// Color class a renderer should use for an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tint {
    /// Default color for the species.
    Normal,
    /// A lion that ate during the last tick.
    Fed,
    /// Health is close to running out.
    Weak,
}

/// Symbol and tint selected for an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Appearance {
    /// Single-character symbol (`L` or `A`).
    pub symbol: char,
    /// Color class.
    pub tint: Tint,
}
