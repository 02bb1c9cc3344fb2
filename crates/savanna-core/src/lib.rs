//! Tick orchestration and the simulation loop for Savanna.
//!
//! This crate owns the per-tick pipeline (plan, pair, commit, merge
//! newborns, cull) and the control plane around it.
//!
//! # Modules
//!
//! - [`command`] -- [`Command`] queue fed by input tasks and drained by the
//!   runner between ticks.
//! - [`config`] -- Configuration loading from `savanna-config.yaml` into
//!   strongly-typed structs.
//! - [`operator`] -- Shared stop flag, tick interval and tick bound.
//! - [`runner`] -- [`run_simulation`], the bounded async tick loop.
//! - [`tick`] -- [`run_tick`] and the [`SimulationState`] it advances.
//!
//! [`Command`]: command::Command
//! [`run_simulation`]: runner::run_simulation
//! [`run_tick`]: tick::run_tick
//! [`SimulationState`]: tick::SimulationState

pub mod command;
pub mod config;
pub mod operator;
pub mod runner;
pub mod tick;
