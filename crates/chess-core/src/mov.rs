//! Move representation.

use crate::{CastleSide, Color, Piece, Square};
use std::fmt;

/// Special behavior attached to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// No special action.
    Normal,
    /// Pawn double push from its starting row; enables en passant next ply.
    DoublePush,
    /// En passant capture; the victim stands beside the source, not on the destination.
    EnPassant,
    /// King move that also relocates the rook on the given side.
    Castle(CastleSide),
    /// Pawn reaching the last row and turning into the given piece.
    Promotion(Piece),
}

/// One ply: source and destination, the moving piece and its special flags.
///
/// Moves are plain values. They carry enough information for the board to
/// apply and revert them but say nothing about legality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    color: Color,
    capture: bool,
    flag: MoveFlag,
}

impl Move {
    /// Creates a quiet move with no special flags.
    #[inline]
    pub const fn new(from: Square, to: Square, piece: Piece, color: Color) -> Self {
        Move {
            from,
            to,
            piece,
            color,
            capture: false,
            flag: MoveFlag::Normal,
        }
    }

    /// Marks the move as a capture.
    #[inline]
    pub const fn capturing(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Sets the special flag.
    #[inline]
    pub const fn with_flag(mut self, flag: MoveFlag) -> Self {
        self.flag = flag;
        self
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Returns the kind of the moving piece.
    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    /// Returns the color of the moving piece.
    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// Returns the move flag.
    #[inline]
    pub const fn flag(self) -> MoveFlag {
        self.flag
    }

    /// Returns true if the move removes an enemy piece (en passant included).
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.capture
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        matches!(self.flag, MoveFlag::DoublePush)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.flag, MoveFlag::EnPassant)
    }

    /// Returns the castling side if this is a castling move.
    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        match self.flag {
            MoveFlag::Castle(side) => Some(side),
            _ => None,
        }
    }

    /// Returns the promotion piece if this is a promotion move.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match self.flag {
            MoveFlag::Promotion(piece) => Some(piece),
            _ => None,
        }
    }

    /// Square of the pawn removed by an en passant capture.
    ///
    /// The victim shares the source row and the destination column.
    #[inline]
    pub const fn en_passant_victim(self) -> Option<Square> {
        match self.flag {
            MoveFlag::EnPassant => Square::new(self.from.row(), self.to.col()),
            _ => None,
        }
    }

    /// Returns coordinate notation (e.g., "e2e4", "e7e8q").
    pub fn to_coordinate(self) -> String {
        match self.promotion() {
            Some(piece) => format!(
                "{}{}{}",
                self.from,
                self.to,
                piece.letter().to_ascii_lowercase()
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}{})", self.piece.to_fen_char(self.color), self.to_coordinate())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinate())
    }
}
