use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A square on the 8x8 board. File 0..7 is `a`..`h`, rank 0..7 is `1`..`8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    file: u8,
    rank: u8,
}

impl Position {
    pub fn new(file: i32, rank: i32) -> Result<Self, ParseError> {
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            return Err(ParseError::OutOfBounds { file, rank });
        }
        Ok(Self {
            file: file as u8,
            rank: rank as u8,
        })
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Parse a square name such as `e4`.
    pub fn from_algebraic(s: &str) -> Result<Self, ParseError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::InvalidSquare(s.to_string()));
        }
        let file = i32::from(bytes[0]) - i32::from(b'a');
        let rank = i32::from(bytes[1]) - i32::from(b'1');
        Self::new(file, rank).map_err(|_| ParseError::InvalidSquare(s.to_string()))
    }

    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.file) as char;
        let rank = (b'1' + self.rank) as char;
        format!("{file}{rank}")
    }

    /// The square `df` files and `dr` ranks away, if it is still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = i32::from(self.file) + i32::from(df);
        let rank = i32::from(self.rank) + i32::from(dr);
        Self::new(file, rank).ok()
    }

    pub(crate) fn index(self) -> usize {
        usize::from(self.rank) * 8 + usize::from(self.file)
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Self {
            file: (index % 8) as u8,
            rank: (index / 8) as u8,
        }
    }
}

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_algebraic(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}
