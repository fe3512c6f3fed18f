//! Mutable board state with reversible move application.
//!
//! Pieces live in an arena and are addressed by [`PieceId`]; the 8x8 grid
//! stores ids. Captured pieces and promoted pawns stay in the arena with no
//! location so that [`Board::unmake_move`] can put them back. Every
//! [`Board::make_move`] pushes exactly one undo record.

use std::collections::HashMap;

use chess_core::{CastleSide, Color, Fen, Move, Piece, Square};
use thiserror::Error;

use crate::movegen::{self, MoveList};
use crate::RulesConfig;

/// Errors raised when a move cannot be applied to the board.
///
/// These indicate a malformed move, not an illegal one: `make_move` applies
/// any move whose squares are consistent with the board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece at {0}")]
    NoPieceAt(Square),

    #[error("cannot capture own piece at {0}")]
    FriendlyCapture(Square),

    #[error("no rook at {0} to castle with")]
    MissingCastlingRook(Square),

    #[error("castling rook destination {0} is occupied")]
    OccupiedCastlingSquare(Square),

    #[error("en passant target {0} is occupied")]
    OccupiedEnPassantTarget(Square),
}

/// Stable handle of a piece in the board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(usize);

impl PieceId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A piece tracked by the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardPiece {
    pub piece: Piece,
    pub color: Color,
    /// `None` once captured or promoted away.
    pub location: Option<Square>,
    /// Times moved; maintained for kings and rooks only.
    pub move_count: u32,
}

/// Everything needed to revert one `make_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Undo {
    mv: Move,
    mover: PieceId,
    captured: Option<(PieceId, Square)>,
    promoted: Option<PieceId>,
    rook: Option<(PieceId, Square, Square)>,
    halfmove_clock: u32,
    fullmove_number: u32,
    en_passant: Option<Square>,
    key: String,
}

/// The complete, mutable state of a game in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: Vec<BoardPiece>,
    grid: [Option<PieceId>; 64],
    side_to_move: Color,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    history: Vec<Undo>,
    repetitions: HashMap<String, u32>,
    rules: RulesConfig,
}

impl Board {
    /// Creates the standard starting position.
    pub fn new() -> Self {
        Self::from_fen(Fen::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates the starting position with custom rules.
    pub fn with_rules(rules: RulesConfig) -> Self {
        let mut board = Self::new();
        board.rules = rules;
        board
    }

    /// Builds a board from a validated FEN record.
    ///
    /// Kings and rooks start out as moved; each castling right present
    /// resets the move count of the king on its home square and of the
    /// own-color rook in the matching corner.
    pub(crate) fn from_record(record: &Fen, rules: RulesConfig) -> Self {
        let mut board = Board {
            pieces: Vec::with_capacity(32),
            grid: [None; 64],
            side_to_move: record.side_to_move,
            en_passant: record.en_passant,
            halfmove_clock: record.halfmove_clock,
            fullmove_number: record.fullmove_number,
            history: Vec::new(),
            repetitions: HashMap::new(),
            rules,
        };

        for sq in Square::all() {
            if let Some((piece, color)) = record.piece_at(sq) {
                let move_count = u32::from(matches!(piece, Piece::King | Piece::Rook));
                board.spawn(piece, color, sq, move_count);
            }
        }

        for color in Color::ALL {
            for side in CastleSide::ALL {
                if !record.castling.has(color, side) {
                    continue;
                }
                let king_home = Square::new(color.home_row(), 4);
                if let Some(id) = king_home.and_then(|sq| board.id_of(sq, Piece::King, color)) {
                    board.pieces[id.0].move_count = 0;
                }
                if let Some(id) = board.id_of(side.rook_square(color), Piece::Rook, color) {
                    board.pieces[id.0].move_count = 0;
                }
            }
        }

        board.record_position();
        board
    }

    fn spawn(&mut self, piece: Piece, color: Color, sq: Square, move_count: u32) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(BoardPiece {
            piece,
            color,
            location: Some(sq),
            move_count,
        });
        self.grid[sq.index()] = Some(id);
        id
    }

    fn id_of(&self, sq: Square, piece: Piece, color: Color) -> Option<PieceId> {
        self.grid[sq.index()].filter(|id| {
            let p = &self.pieces[id.0];
            p.piece == piece && p.color == color
        })
    }

    fn place(&mut self, sq: Square, id: PieceId) {
        self.grid[sq.index()] = Some(id);
        self.pieces[id.0].location = Some(sq);
    }

    fn lift(&mut self, sq: Square) -> Option<PieceId> {
        let id = self.grid[sq.index()].take()?;
        self.pieces[id.0].location = None;
        Some(id)
    }

    fn record_position(&mut self) -> String {
        let key = self.repetition_key();
        *self.repetitions.entry(key.clone()).or_insert(0) += 1;
        key
    }

    fn forget_position(&mut self, key: &str) {
        if let Some(count) = self.repetitions.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.repetitions.remove(key);
            }
        }
    }

    /// Returns the active rules.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Replaces the active rules.
    pub fn set_rules(&mut self, rules: RulesConfig) {
        self.rules = rules;
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the en passant target square, set only right after a double push.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last pawn move or capture.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Full-move number, incremented after each Black move.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Number of moves that can be unmade.
    #[inline]
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// The most recently applied move.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|undo| undo.mv)
    }

    /// Returns the piece and color on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.grid[sq.index()].map(|id| {
            let p = &self.pieces[id.0];
            (p.piece, p.color)
        })
    }

    /// Returns the arena id of the piece on `sq`.
    #[inline]
    pub fn id_at(&self, sq: Square) -> Option<PieceId> {
        self.grid[sq.index()]
    }

    /// Returns the arena entry for `id`.
    #[inline]
    pub fn piece(&self, id: PieceId) -> &BoardPiece {
        &self.pieces[id.0]
    }

    /// Active pieces of `color`, in board order from a8 to h1.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = PieceId> + '_ {
        self.grid
            .iter()
            .flatten()
            .copied()
            .filter(move |id| self.pieces[id.0].color == color)
    }

    /// Square of the king of `color`, if it is on the board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|id| self.pieces[id.0].piece == Piece::King)
            .and_then(|id| self.pieces[id.0].location)
    }

    /// How many times the current position has occurred.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions
            .get(&self.repetition_key())
            .copied()
            .unwrap_or(0)
    }

    /// Applies a move without checking legality.
    ///
    /// Returns the captured piece, if any. The board is left untouched when
    /// an error is returned.
    ///
    /// # Errors
    ///
    /// Fails if the source square is empty, the captured square holds a piece
    /// of the mover's color, a castling rook is missing or cannot land, or an
    /// en passant destination is occupied.
    pub fn make_move(&mut self, mv: Move) -> Result<Option<(Piece, Color)>, MoveError> {
        let from = mv.from();
        let to = mv.to();
        let mover = self.grid[from.index()].ok_or(MoveError::NoPieceAt(from))?;
        let color = self.pieces[mover.0].color;

        let victim_sq = match mv.en_passant_victim() {
            Some(sq) => {
                if self.grid[to.index()].is_some() {
                    return Err(MoveError::OccupiedEnPassantTarget(to));
                }
                sq
            }
            None => to,
        };
        let victim = self.grid[victim_sq.index()];
        if let Some(id) = victim {
            if self.pieces[id.0].color == color {
                return Err(MoveError::FriendlyCapture(victim_sq));
            }
        }

        let rook = match mv.castle_side() {
            Some(side) => {
                let rook_from = side.rook_square(color);
                let rook_to = side.rook_target_square(color);
                let id = self.grid[rook_from.index()]
                    .filter(|id| {
                        let rook = &self.pieces[id.0];
                        rook.color == color && rook.piece == Piece::Rook
                    })
                    .ok_or(MoveError::MissingCastlingRook(rook_from))?;
                if self.grid[rook_to.index()].is_some() {
                    return Err(MoveError::OccupiedCastlingSquare(rook_to));
                }
                Some((id, rook_from, rook_to))
            }
            None => None,
        };

        let captured = victim.map(|id| {
            self.lift(victim_sq);
            (id, victim_sq)
        });

        self.lift(from);
        self.place(to, mover);

        let promoted = mv.promotion().map(|piece| {
            self.pieces[mover.0].location = None;
            self.spawn(piece, color, to, 1)
        });

        if let Some((id, rook_from, rook_to)) = rook {
            self.lift(rook_from);
            self.place(rook_to, id);
            self.pieces[id.0].move_count += 1;
        }

        let moved = self.pieces[mover.0].piece;
        if matches!(moved, Piece::King | Piece::Rook) {
            self.pieces[mover.0].move_count += 1;
        }

        let halfmove_clock = self.halfmove_clock;
        let fullmove_number = self.fullmove_number;
        let en_passant = self.en_passant;

        self.side_to_move = self.side_to_move.opposite();
        self.en_passant = if mv.is_double_push() {
            Square::new((from.row() + to.row()) / 2, from.col())
        } else {
            None
        };
        if moved == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if self.side_to_move == Color::White {
            self.fullmove_number += 1;
        }

        let key = self.record_position();
        self.history.push(Undo {
            mv,
            mover,
            captured,
            promoted,
            rook,
            halfmove_clock,
            fullmove_number,
            en_passant,
            key,
        });

        tracing::trace!("make {:?}", mv);
        Ok(captured.map(|(id, _)| (self.pieces[id.0].piece, self.pieces[id.0].color)))
    }

    /// Reverts the most recent [`make_move`](Self::make_move).
    ///
    /// Returns the reverted move, or `None` if there is no history.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let undo = self.history.pop()?;
        self.forget_position(&undo.key);

        let mv = undo.mv;
        self.side_to_move = self.side_to_move.opposite();
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.en_passant = undo.en_passant;

        if let Some((id, rook_from, rook_to)) = undo.rook {
            self.lift(rook_to);
            self.place(rook_from, id);
            self.pieces[id.0].move_count -= 1;
        }

        self.lift(mv.to());
        if let Some(promoted) = undo.promoted {
            debug_assert_eq!(promoted.0 + 1, self.pieces.len());
            self.pieces.pop();
        }
        self.place(mv.from(), undo.mover);
        if matches!(self.pieces[undo.mover.0].piece, Piece::King | Piece::Rook) {
            self.pieces[undo.mover.0].move_count -= 1;
        }

        if let Some((id, sq)) = undo.captured {
            self.place(sq, id);
        }

        tracing::trace!("unmake {:?}", mv);
        Some(mv)
    }

    /// Returns true if the king of `color` is attacked.
    ///
    /// Recomputed from scratch on every call. A side without a king is never
    /// in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(sq) => movegen::is_square_attacked(self, sq, color.opposite()),
            None => false,
        }
    }

    /// Generates all legal moves for the side to move.
    ///
    /// Each pseudo-legal move is tried with make/unmake and kept only if the
    /// mover's king is safe afterwards. Castling is also rejected when the
    /// king starts in check, and under strict castling when the square it
    /// crosses is attacked.
    pub fn legal_moves(&mut self) -> MoveList {
        let us = self.side_to_move;
        let them = us.opposite();
        let in_check = self.is_in_check(us);

        let mut pseudo = MoveList::new();
        let ids: Vec<PieceId> = self.pieces(us).collect();
        for id in ids {
            movegen::pseudo_legal_moves(self, id, &mut pseudo);
        }

        let mut legal = MoveList::new();
        for &m in &pseudo {
            if let Some(side) = m.castle_side() {
                if in_check {
                    continue;
                }
                let transit = Square::new(m.from().row(), side.rook_to_col());
                if self.rules.strict_castling
                    && transit.is_some_and(|sq| movegen::is_square_attacked(self, sq, them))
                {
                    continue;
                }
            }
            if self.make_move(m).is_err() {
                continue;
            }
            let safe = !self.is_in_check(us);
            self.unmake_move();
            if safe {
                legal.push(m);
            }
        }
        legal
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
