//! Grid geometry for the Savanna simulation.
//!
//! The world is a bounded rectangle of cells with no wraparound. This crate
//! answers the spatial questions the movers and the pair engine ask: is a
//! cell on the board, how far apart are two cells, and which cells surround
//! a given one.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid construction.
//! - [`grid`] -- [`Grid`] bounds checks and neighborhood enumeration.

pub mod error;
pub mod grid;

pub use error::WorldError;
pub use grid::Grid;
