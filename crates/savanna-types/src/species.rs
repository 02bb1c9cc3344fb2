//! The closed set of species and their fixed constants.
//!
//! Rule constants are fixed per species and are not read from config.

use serde::{Deserialize, Serialize};

/// An agent's species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    /// Predator. Chases and eats antelopes.
    Lion,
    /// Prey. Flees from lions.
    Antelope,
}

impl Species {
    /// Radius of the square neighborhood the species can see.
    pub const fn vision_range(self) -> i32 {
        match self {
            Self::Lion => 2,
            Self::Antelope => 4,
        }
    }

    /// Health a freshly created agent starts with.
    pub const fn initial_health(self) -> f64 {
        match self {
            Self::Lion => 15.0,
            Self::Antelope => 20.0,
        }
    }

    /// Single-character symbol callers may draw for the species.
    pub const fn symbol(self) -> char {
        match self {
            Self::Lion => 'L',
            Self::Antelope => 'A',
        }
    }
}

impl core::fmt::Display for Species {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Lion => write!(f, "lion"),
            Self::Antelope => write!(f, "antelope"),
        }
    }
}
