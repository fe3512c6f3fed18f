//! Move generation.
//!
//! Generators here are pseudo-legal: they follow each piece's movement rules
//! but ignore whether the mover's king is left in check. The legality filter
//! lives in [`Board::legal_moves`](crate::Board::legal_moves).

mod attacks;
pub mod perft;

use crate::board::{Board, PieceId};
use chess_core::{CastleSide, Move, MoveFlag, Piece, Square};

pub use attacks::is_square_attacked;

/// A growable list of moves.
///
/// Reachable positions have at most 218 legal moves, so the list reserves
/// room for [`MoveList::MAX_MOVES`] up front and rarely reallocates. FEN
/// input can describe positions with more pseudo-legal moves than that; the
/// list grows to hold them.
#[derive(Clone)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Number of moves reserved when a list is created.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(Self::MAX_MOVES),
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Returns true if `m` is in the list.
    pub fn contains(&self, m: &Move) -> bool {
        self.moves.contains(m)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Appends the pseudo-legal moves of the piece `id` to `moves`.
///
/// Pieces that are no longer on the board generate nothing.
pub fn pseudo_legal_moves(board: &Board, id: PieceId, moves: &mut MoveList) {
    let bp = board.piece(id);
    let Some(from) = bp.location else {
        return;
    };

    match bp.piece {
        Piece::Pawn => generate_pawn_moves(board, from, moves),
        Piece::Bishop | Piece::Rook | Piece::Queen => generate_slider_moves(board, from, moves),
        Piece::Knight => generate_step_moves(board, from, moves),
        Piece::King => {
            generate_step_moves(board, from, moves);
            generate_castling_moves(board, id, from, moves);
        }
    }
}

/// Adds a move to `to` unless it is blocked by an own piece.
///
/// Returns true if the square was empty.
fn push_to(board: &Board, from: Square, to: Square, moves: &mut MoveList) -> bool {
    let Some((piece, color)) = board.piece_at(from) else {
        return false;
    };
    match board.piece_at(to) {
        None => {
            moves.push(Move::new(from, to, piece, color));
            true
        }
        Some((_, other)) => {
            if other != color {
                moves.push(Move::new(from, to, piece, color).capturing());
            }
            false
        }
    }
}

fn generate_slider_moves(board: &Board, from: Square, moves: &mut MoveList) {
    let Some((piece, _)) = board.piece_at(from) else {
        return;
    };
    for &(dr, dc) in piece.directions() {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            if !push_to(board, from, to, moves) {
                break;
            }
            cur = to;
        }
    }
}

fn generate_step_moves(board: &Board, from: Square, moves: &mut MoveList) {
    let Some((piece, _)) = board.piece_at(from) else {
        return;
    };
    for &(dr, dc) in piece.directions() {
        if let Some(to) = from.offset(dr, dc) {
            push_to(board, from, to, moves);
        }
    }
}

fn generate_castling_moves(board: &Board, king: PieceId, from: Square, moves: &mut MoveList) {
    let bp = board.piece(king);
    let color = bp.color;
    if bp.move_count != 0 || from.row() != color.home_row() || from.col() != 4 {
        return;
    }

    for side in CastleSide::ALL {
        let corner = side.rook_square(color);
        let rook_ready = board.id_at(corner).is_some_and(|id| {
            let rook = board.piece(id);
            rook.piece == Piece::Rook && rook.color == color && rook.move_count == 0
        });
        if !rook_ready {
            continue;
        }

        let row = from.row();
        let path_clear = side
            .between_cols()
            .iter()
            .all(|&col| Square::new(row, col).is_some_and(|sq| board.piece_at(sq).is_none()));
        if !path_clear {
            continue;
        }

        if let Some(to) = Square::new(row, side.king_to_col()) {
            moves.push(
                Move::new(from, to, Piece::King, color).with_flag(MoveFlag::Castle(side)),
            );
        }
    }
}

/// Pushes one pawn move, fanning out into the four promotions on the last row.
fn push_pawn_move(m: Move, moves: &mut MoveList) {
    if m.to().row() == m.color().promotion_row() {
        for piece in Piece::PROMOTIONS {
            moves.push(m.with_flag(MoveFlag::Promotion(piece)));
        }
    } else {
        moves.push(m);
    }
}

fn generate_pawn_moves(board: &Board, from: Square, moves: &mut MoveList) {
    let Some((_, color)) = board.piece_at(from) else {
        return;
    };
    let forward = color.forward();

    // Pushes
    if let Some(one) = from.offset(forward, 0) {
        if board.piece_at(one).is_none() {
            push_pawn_move(Move::new(from, one, Piece::Pawn, color), moves);

            if from.row() == color.pawn_row() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.piece_at(two).is_none() {
                        moves.push(
                            Move::new(from, two, Piece::Pawn, color)
                                .with_flag(MoveFlag::DoublePush),
                        );
                    }
                }
            }
        }
    }

    // Captures
    for dc in [-1, 1] {
        let Some(to) = from.offset(forward, dc) else {
            continue;
        };
        match board.piece_at(to) {
            Some((_, other)) if other != color => {
                push_pawn_move(Move::new(from, to, Piece::Pawn, color).capturing(), moves);
            }
            Some(_) => {}
            None if board.en_passant() == Some(to) => {
                let victim = Square::new(from.row(), to.col());
                let enemy_pawn = victim
                    .and_then(|sq| board.piece_at(sq))
                    .is_some_and(|(piece, c)| piece == Piece::Pawn && c != color);
                if enemy_pawn {
                    moves.push(
                        Move::new(from, to, Piece::Pawn, color)
                            .capturing()
                            .with_flag(MoveFlag::EnPassant),
                    );
                }
            }
            None => {}
        }
    }
}
