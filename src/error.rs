use thiserror::Error;

/// Errors raised while decoding board coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Square text that is not a two-character `a1`..`h8` name.
    #[error("Invalid square: {0}")]
    InvalidSquare(String),

    /// Numeric coordinates outside the 8x8 grid.
    #[error("Out of bounds: file={file} rank={rank}")]
    OutOfBounds { file: i32, rank: i32 },
}

/// Reasons a room rejects a client action.
///
/// The `Display` text is sent verbatim as the `error` payload message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Invalid move message")]
    InvalidMoveMessage,

    #[error("Spectators cannot move.")]
    SpectatorMove,

    #[error("Not your turn.")]
    NotYourTurn,

    #[error(transparent)]
    InvalidSquare(#[from] ParseError),

    #[error("Illegal move.")]
    IllegalMove,

    #[error("Unknown message type: {0}")]
    UnknownMessageType(String),
}
