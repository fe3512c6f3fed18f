//! Conversion between a [`Board`] and FEN text.

use crate::{Board, RulesConfig};
use chess_core::{CastleSide, CastlingRights, Color, Fen, FenError, Piece, Square};

impl Board {
    /// Parses a FEN string into a new board with default rules.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_with(fen, Piece::from_fen_char)
    }

    /// Parses a FEN string, mapping placement symbols through `symbols`.
    pub fn from_fen_with<F>(fen: &str, symbols: F) -> Result<Self, FenError>
    where
        F: Fn(char) -> Option<(Piece, Color)>,
    {
        let record = Fen::parse_with(fen, symbols)?;
        Ok(Board::from_record(&record, RulesConfig::default()))
    }

    /// Replaces the current position with the one described by `fen`.
    ///
    /// History and repetition counts start over; the rules are kept. On
    /// error the board is left exactly as it was.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenError> {
        self.load_fen_with(fen, Piece::from_fen_char)
    }

    /// Like [`load_fen`](Self::load_fen) with a custom symbol mapping.
    pub fn load_fen_with<F>(&mut self, fen: &str, symbols: F) -> Result<(), FenError>
    where
        F: Fn(char) -> Option<(Piece, Color)>,
    {
        let record = Fen::parse_with(fen, symbols)?;
        *self = Board::from_record(&record, *self.rules());
        tracing::debug!("Loaded position {}", fen);
        Ok(())
    }

    /// Castling availability, derived from unmoved kings and rooks.
    pub fn castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::NONE;
        for color in Color::ALL {
            let king_ready = Square::new(color.home_row(), 4)
                .and_then(|sq| self.id_at(sq))
                .is_some_and(|id| {
                    let king = self.piece(id);
                    king.piece == Piece::King && king.color == color && king.move_count == 0
                });
            if !king_ready {
                continue;
            }
            for side in CastleSide::ALL {
                let rook_ready = self.id_at(side.rook_square(color)).is_some_and(|id| {
                    let rook = self.piece(id);
                    rook.piece == Piece::Rook && rook.color == color && rook.move_count == 0
                });
                if rook_ready {
                    rights.insert(color, side);
                }
            }
        }
        rights
    }

    /// The en passant target, if the side to move has a pawn that could
    /// capture onto it.
    pub fn capturable_en_passant(&self) -> Option<Square> {
        let target = self.en_passant()?;
        let us = self.side_to_move();
        let victim = target.offset(-us.forward(), 0)?;
        let capturer = |dc: i8| {
            victim
                .offset(0, dc)
                .and_then(|sq| self.piece_at(sq))
                .is_some_and(|(piece, color)| piece == Piece::Pawn && color == us)
        };
        if capturer(-1) || capturer(1) {
            Some(target)
        } else {
            None
        }
    }

    fn to_record(&self, en_passant: Option<Square>) -> Fen {
        let mut record = Fen::empty();
        for sq in Square::all() {
            record.placement[sq.index()] = self.piece_at(sq);
        }
        record.side_to_move = self.side_to_move();
        record.castling = self.castling_rights();
        record.en_passant = en_passant;
        record.halfmove_clock = self.halfmove_clock();
        record.fullmove_number = self.fullmove_number();
        record
    }

    /// Renders the position as FEN, with the en passant target as stored.
    pub fn to_fen(&self) -> String {
        self.to_record(self.en_passant()).to_string()
    }

    /// Renders the position as FEN, listing en passant only when a capture
    /// onto the target is possible.
    pub fn to_fen_normalized(&self) -> String {
        self.to_record(self.capturable_en_passant()).to_string()
    }

    /// First four normalized FEN fields; equal keys mean repeated positions.
    pub fn repetition_key(&self) -> String {
        self.to_record(self.capturable_en_passant()).repetition_key()
    }
}
