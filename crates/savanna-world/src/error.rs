//! Error types for the `savanna-world` crate.

/// Errors that can occur while building a grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Width or height was zero or negative.
    #[error("invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in grid calculation")]
    ArithmeticOverflow,
}
