//! Centralized error types for the simulation core.
//!
//! Construction-time failures (malformed board text, disconnected maze)
//! surface as `Result`s. In-simulation precondition violations — querying
//! a tile outside the board, a forced intersection with no exit — are
//! logic bugs in the level data and panic instead.

/// Main error type for the simulation.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Board parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),
}

/// Error type for board parsing operations.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),

    #[error("Pen door must have exactly 2 cells, found {0}")]
    InvalidDoorCount(usize),

    #[error("Board must define exactly one player start, found {0}")]
    InvalidPlayerStartCount(usize),

    #[error("Tunnel ends must come in pairs, found {0}")]
    InvalidTunnelEndCount(usize),
}

/// Errors related to map construction.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("Pellet at ({x}, {y}) is unreachable from the player start")]
    UnreachablePellet { x: i32, y: i32 },

    #[error("Player start at ({x}, {y}) is not walkable")]
    BlockedPlayerStart { x: i32, y: i32 },
}

/// Result type for simulation operations.
pub type GameResult<T> = Result<T, GameError>;
