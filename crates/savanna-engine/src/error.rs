//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the run so
//! that `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: savanna_core::config::ConfigError,
    },

    /// The configured grid dimensions were rejected.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: savanna_world::WorldError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: savanna_core::runner::RunnerError,
    },

    /// Seeding the initial population failed.
    #[error("spawner error: {source}")]
    Spawner {
        /// The underlying agent error.
        #[from]
        source: savanna_agents::AgentError,
    },
}
