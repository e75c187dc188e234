//! Error types for the protocol-facing side of the engine.
//!
//! Board operations themselves never return these: an occupied point is an
//! ordinary `false` from [`Board::play_move`](crate::board::Board::play_move),
//! and an off-board point is a caller bug that panics. These errors cover
//! text that arrives from outside (coordinates, colors, sizes, policy names).

use thiserror::Error;

/// Errors raised while interpreting caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Coordinate text that does not name a point on the current board
    #[error("invalid coordinate: {0}")]
    InvalidCoord(String),

    /// Color text other than b/black/w/white
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Board side outside the supported range
    #[error("unacceptable size: {size} (must be {min}-{max})")]
    BoardSize { size: usize, min: usize, max: usize },

    /// Policy name that is neither `random` nor `rule_based`
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    /// Move rejected by the board
    #[error("illegal move: {color} {coord} ({reason})")]
    IllegalMove {
        color: String,
        coord: String,
        reason: &'static str,
    },
}

/// Result type alias for engine input handling.
pub type EngineResult<T> = Result<T, EngineError>;
