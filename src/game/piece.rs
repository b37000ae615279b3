use serde::{Deserialize, Serialize};
use std::fmt;

/// Side color. Serialized as `WHITE` / `BLACK` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank delta of a single pawn step.
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    pub const fn pawn_start_rank(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    pub const fn promotion_rank(self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    pub const fn back_rank(self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "WHITE"),
            Self::Black => write!(f, "BLACK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Parse a requested promotion piece, case-insensitively.
    ///
    /// Only pieces a pawn may promote to are accepted; anything else is `None`.
    pub fn from_promotion_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "QUEEN" => Some(Self::Queen),
            "ROOK" => Some(Self::Rook),
            "BISHOP" => Some(Self::Bishop),
            "KNIGHT" => Some(Self::Knight),
            _ => None,
        }
    }

    pub const fn is_promotion_target(self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Bishop | Self::Knight)
    }

    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'P' => Some(Self::Pawn),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'R' => Some(Self::Rook),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pawn => "PAWN",
            Self::Knight => "KNIGHT",
            Self::Bishop => "BISHOP",
            Self::Rook => "ROOK",
            Self::Queen => "QUEEN",
            Self::King => "KING",
        };
        f.write_str(name)
    }
}

/// A piece on the board. Pieces are values; moving one produces a moved copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceType,
    has_moved: bool,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self {
        Self {
            color,
            kind,
            has_moved: false,
        }
    }

    pub const fn color(self) -> Color {
        self.color
    }

    pub const fn kind(self) -> PieceType {
        self.kind
    }

    pub const fn has_moved(self) -> bool {
        self.has_moved
    }

    pub const fn mark_moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }

    /// Two-character wire code, e.g. `wP` or `bK`.
    pub fn code(self) -> String {
        let color = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{color}{}", self.kind.letter())
    }

    /// Parse a wire code back into an unmoved piece.
    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let color = match chars.next()? {
            'w' => Color::White,
            'b' => Color::Black,
            _ => return None,
        };
        let kind = PieceType::from_letter(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(color, kind))
    }
}
