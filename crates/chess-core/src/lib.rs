//! Core types for chess.
//!
//! This crate provides the value types shared by the position engine:
//! - [`Piece`] and [`Color`] for piece identity
//! - [`Square`] for board coordinates (row 0 is rank 8, column 0 is file a)
//! - [`CastleSide`] and [`CastlingRights`]
//! - [`Move`] and [`MoveFlag`] for one ply
//! - [`Fen`] for parsing and rendering the 6-field position text

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::{CastleSide, CastlingRights};
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveFlag};
pub use piece::Piece;
pub use square::Square;
