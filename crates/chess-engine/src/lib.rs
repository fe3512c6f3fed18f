//! Chess position engine with reversible move application.
//!
//! This crate provides:
//! - [`Board`] - mutable game state with `make_move` / `unmake_move`
//! - Legal move generation, check detection and draw predicates
//! - FEN loading and rendering, plus a repetition key per position
//! - SAN notation parsing and generation
//! - [`RulesConfig`] - tunable castling and draw rules, loadable from TOML
//!
//! # Architecture
//!
//! Pieces live in an arena indexed by [`PieceId`] and the 8x8 grid stores
//! ids. Every applied move pushes one undo record, so any sequence of moves
//! can be reverted exactly. Legality is decided by applying a pseudo-legal
//! move, testing whether the mover's king is attacked, and reverting.
//!
//! # Example
//!
//! ```
//! use chess_engine::{resolve, Board, GameStatus};
//!
//! let mut board = Board::new();
//! println!("Legal moves from starting position: {}", board.legal_moves().len());
//!
//! for san in ["e4", "e5", "Nf3"] {
//!     let m = resolve(&mut board, san).unwrap();
//!     board.make_move(m).unwrap();
//! }
//! assert_eq!(board.status(), GameStatus::Ongoing);
//! println!("Position after 1.e4 e5 2.Nf3: {}", board.to_fen());
//!
//! board.unmake_move();
//! assert_eq!(board.ply_count(), 2);
//! ```

mod board;
mod codec;
mod config;
pub mod movegen;
mod rules;
pub mod san;

pub use board::{Board, BoardPiece, MoveError, PieceId};
pub use config::{ConfigError, RulesConfig};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{is_square_attacked, MoveList};
pub use rules::{DrawReason, GameStatus};
pub use san::{move_to_san, resolve, SanError};
