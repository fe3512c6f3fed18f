//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{CastlingRights, Color, Piece, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// A fully validated FEN record.
///
/// This is the text-level view of a position. The engine builds its board
/// from a record and renders a record back from its board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Piece on each square, indexed by [`Square::index`].
    pub placement: [Option<(Piece, Color)>; 64],
    /// The side to move.
    pub side_to_move: Color,
    /// Castling availability.
    pub castling: CastlingRights,
    /// En passant target square.
    pub en_passant: Option<Square>,
    /// Halfmove clock (for 50-move rule).
    pub halfmove_clock: u32,
    /// Fullmove number.
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Creates a record with an empty board, White to move, no rights.
    pub fn empty() -> Self {
        Fen {
            placement: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parses a FEN string with the standard piece letters.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        Self::parse_with(fen, Piece::from_fen_char)
    }

    /// Parses a FEN string, mapping placement symbols through `symbols`.
    ///
    /// Any character that is neither a digit nor accepted by `symbols`
    /// is rejected as an unknown symbol.
    pub fn parse_with<F>(fen: &str, symbols: F) -> Result<Self, FenError>
    where
        F: Fn(char) -> Option<(Piece, Color)>,
    {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0], &symbols)?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = CastlingRights::from_fen_field(parts[2])
            .ok_or_else(|| FenError::InvalidCastlingRights(parts[2].to_string()))?;

        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = Self::parse_counter(parts[4])
            .ok_or_else(|| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = Self::parse_counter(parts[5])
            .filter(|&n| n > 0)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Parses a clock field: plain ASCII digits, no sign.
    fn parse_counter(field: &str) -> Option<u32> {
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        field.parse().ok()
    }

    fn parse_placement<F>(field: &str, symbols: &F) -> Result<[Option<(Piece, Color)>; 64], FenError>
    where
        F: Fn(char) -> Option<(Piece, Color)>,
    {
        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut placement = [None; 64];
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0u32;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip;
                } else if let Some(piece) = symbols(c) {
                    if col < 8 {
                        placement[row * 8 + col as usize] = Some(piece);
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - row
                    )));
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - row,
                    col
                )));
            }
        }

        Ok(placement)
    }

    fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(field) {
            Some(sq) if sq.rank_char() == '3' || sq.rank_char() == '6' => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
        }
    }

    /// Returns the piece and color on `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.placement[sq.index()]
    }

    /// Renders the piece placement field (ranks 8 to 1).
    pub fn placement_field(&self) -> String {
        let mut out = String::new();
        for row in 0..8u8 {
            let mut empty_count = 0;
            for col in 0..8u8 {
                match Square::new(row, col).and_then(|sq| self.piece_at(sq)) {
                    Some((piece, color)) => {
                        if empty_count > 0 {
                            out.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        out.push(piece.to_fen_char(color));
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                out.push_str(&empty_count.to_string());
            }
            if row < 7 {
                out.push('/');
            }
        }
        out
    }

    /// Renders the first four fields: placement, side, castling, en passant.
    ///
    /// The clocks are left out so that positions reached at different
    /// move numbers compare equal.
    pub fn repetition_key(&self) -> String {
        let en_passant = match self.en_passant {
            Some(sq) => sq.to_algebraic(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {} {}",
            self.placement_field(),
            self.side_to_move.fen_char(),
            self.castling,
            en_passant
        )
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.repetition_key(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for Fen {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, CastlingRights::ALL);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(fen.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(fen.piece_at(Square::A8), Some((Piece::Rook, Color::Black)));
    }

    #[test]
    fn roundtrip() {
        let original = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let parsed = Fen::parse(original).unwrap();
        assert_eq!(parsed.to_string(), original);

        let custom = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3";
        assert_eq!(Fen::parse(custom).unwrap().to_string(), custom);
    }

    #[test]
    fn repetition_key_drops_clocks() {
        let a = Fen::parse("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        let b = Fen::parse("8/8/8/8/8/8/8/K6k w - - 12 40").unwrap();
        assert_eq!(a.repetition_key(), "8/8/8/8/8/8/8/K6k w - -");
        assert_eq!(a.repetition_key(), b.repetition_key());
    }

    #[test]
    fn invalid_part_count() {
        assert_eq!(Fen::parse("invalid"), Err(FenError::InvalidPartCount(1)));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0"),
            Err(FenError::InvalidPartCount(5))
        ));
    }

    #[test]
    fn invalid_piece_placement_rank_count() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_piece_placement_unknown_symbol() {
        let err = Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap_err();
        assert_eq!(
            err,
            FenError::InvalidPiecePlacement("invalid character 'X' in rank 2".to_string())
        );
    }

    #[test]
    fn invalid_piece_placement_wrong_squares() {
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Fen::parse("rnbqkbn/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn invalid_other_fields() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 x KQkq - 0 1"),
            Err(FenError::InvalidActiveColor(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::InvalidCastlingRights(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - abc 0 1"),
            Err(FenError::InvalidEnPassantSquare(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::InvalidHalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 xyz"),
            Err(FenError::InvalidFullmoveNumber(_))
        ));
    }

    #[test]
    fn parse_with_custom_symbols() {
        // German letters: S (Springer) for knights, L (Laeufer) for bishops.
        let german = |c: char| match c {
            'S' => Some((Piece::Knight, Color::White)),
            'L' => Some((Piece::Bishop, Color::White)),
            other => Piece::from_fen_char(other),
        };
        let fen = Fen::parse_with("4k3/8/8/8/8/8/8/1S2KL2 w - - 0 1", german).unwrap();
        assert_eq!(
            fen.piece_at(Square::from_algebraic("b1").unwrap()),
            Some((Piece::Knight, Color::White))
        );
        assert_eq!(fen.placement_field(), "4k3/8/8/8/8/8/8/1N2KB2");
        assert!(Fen::parse("4k3/8/8/8/8/8/8/1S2KL2 w - - 0 1").is_err());
    }

    #[test]
    fn clocks_reject_signs_and_zero_fullmove() {
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - +5 1"),
            Err(FenError::InvalidHalfmoveClock("+5".to_string()))
        );
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 +1"),
            Err(FenError::InvalidFullmoveNumber("+1".to_string()))
        );
        assert_eq!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 0"),
            Err(FenError::InvalidFullmoveNumber("0".to_string()))
        );
        assert!(Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 -1").is_err());
        assert_eq!(Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 07 12").unwrap().halfmove_clock, 7);
    }

    #[test]
    fn default_is_startpos() {
        assert_eq!(Fen::default().to_string(), Fen::STARTPOS);
        assert_eq!(Fen::empty().to_string(), "8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn error_display_names_field() {
        assert!(FenError::InvalidPartCount(3).to_string().contains('3'));
        assert!(FenError::InvalidEnPassantSquare("z9".to_string())
            .to_string()
            .contains("z9"));
    }
}
