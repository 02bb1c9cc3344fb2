//! Shared type definitions for the Savanna simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the Savanna workspace: grid coordinates, species, agent identity and the
//! per-agent state that the movers and the pair engine operate on.
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] record and its presentation hints
//! - [`cell`] -- Grid coordinates and distance helpers
//! - [`ids`] -- Monotonic identifier newtypes
//! - [`species`] -- The closed species set and its fixed constant table

pub mod agent;
pub mod cell;
pub mod ids;
pub mod species;

// Re-export all public types at crate root for convenience.
pub use agent::{Agent, Appearance, Tint};
pub use cell::Cell;
pub use ids::AgentId;
pub use species::Species;
