use std::fmt;

use crate::game::{PieceType, Position};

/// A requested move. `from != to` is checked by the board, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// Piece a pawn becomes on its last rank; `None` means queen.
    pub promotion: Option<PieceType>,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub const fn with_promotion(
        from: Position,
        to: Position,
        promotion: Option<PieceType>,
    ) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={promotion}")?;
        }
        Ok(())
    }
}
