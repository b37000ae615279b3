//! Board representation and the move-legality rules.

pub mod board;
pub mod moves;
pub mod piece;
pub mod position;

pub use board::{Board, WireBoard};
pub use moves::Move;
pub use piece::{Color, Piece, PieceType};
pub use position::Position;
