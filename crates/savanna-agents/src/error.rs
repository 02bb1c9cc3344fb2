//! Error types for the savanna-agents crate.
//!
//! Precondition failures are aggregated: a single [`AgentError::InvalidAgent`]
//! lists every attribute the agent was missing rather than stopping at the
//! first one.

use savanna_types::AgentId;

/// An attribute an operation requires but the agent does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAttribute {
    /// The agent has not been placed on the grid.
    CurrentPosition,
    /// The agent has not planned a move this tick.
    NextPosition,
}

impl core::fmt::Display for MissingAttribute {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CurrentPosition => write!(f, "current position"),
            Self::NextPosition => write!(f, "next position"),
        }
    }
}

/// Errors that can occur during population and movement operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The agent is missing one or more attributes the operation requires.
    #[error("invalid agent {agent}: missing {}", join_missing(missing))]
    InvalidAgent {
        /// The offending agent.
        agent: AgentId,
        /// Every attribute that was missing.
        missing: Vec<MissingAttribute>,
    },

    /// Pairing was attempted before the agent planned its move.
    #[error("agent {agent} has no next position; pairing must run after planning")]
    NextPositionUnset {
        /// The agent without a planned move.
        agent: AgentId,
    },

    /// Agent with the given ID was not found in the population.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// The agent id counter has no values left.
    #[error("agent id counter exhausted")]
    IdExhausted,
}

fn join_missing(missing: &[MissingAttribute]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
