//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"
//!
//! Parsing is strict about the capture marker: `Nf3` never matches a
//! capture and `Nxf3` never matches a quiet move.

use crate::Board;
use chess_core::{CastleSide, Move, Piece, Square};
use thiserror::Error;

/// Error type for SAN parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanError {
    /// The text does not follow the SAN grammar.
    #[error("invalid SAN: {0}")]
    Unparseable(String),
    /// The text is well-formed but no legal move matches it.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// More than one legal move matches.
    #[error("ambiguous move {san}: {count} legal moves match")]
    AmbiguousMove { san: String, count: usize },
}

/// Parsed components of a SAN string.
#[derive(Debug, PartialEq, Eq)]
enum ParsedSan {
    Castle(CastleSide),
    Normal {
        piece: Piece,
        from_col: Option<u8>,
        from_row: Option<u8>,
        capture: bool,
        to: Square,
        promotion: Option<Piece>,
    },
}

/// Parses a SAN string and returns the matching legal move.
///
/// Surrounding whitespace and a trailing `+` or `#` are accepted. The
/// annotation is not checked against the position.
pub fn resolve(board: &mut Board, text: &str) -> Result<Move, SanError> {
    let result = parse(text).and_then(|parsed| find_matching_move(board, text.trim(), &parsed));
    if let Err(e) = &result {
        tracing::debug!("SAN resolution failed: {}", e);
    }
    result
}

fn parse(text: &str) -> Result<ParsedSan, SanError> {
    let san = text.trim();
    let unparseable = || SanError::Unparseable(san.to_string());

    let body = san
        .strip_suffix('+')
        .or_else(|| san.strip_suffix('#'))
        .unwrap_or(san);

    match body {
        "O-O" | "0-0" => return Ok(ParsedSan::Castle(CastleSide::Kingside)),
        "O-O-O" | "0-0-0" => return Ok(ParsedSan::Castle(CastleSide::Queenside)),
        _ => {}
    }

    let mut chars: Vec<char> = body.chars().collect();

    // Promotion suffix
    let mut promotion = None;
    if chars.len() >= 2 && chars[chars.len() - 2] == '=' {
        let letter = chars[chars.len() - 1].to_ascii_uppercase();
        let piece = Piece::from_letter(letter)
            .filter(|p| Piece::PROMOTIONS.contains(p))
            .ok_or_else(unparseable)?;
        promotion = Some(piece);
        chars.truncate(chars.len() - 2);
    }

    // Destination square
    if chars.len() < 2 {
        return Err(unparseable());
    }
    let to_col = Square::col_from_file(chars[chars.len() - 2]).ok_or_else(unparseable)?;
    let to_row = Square::row_from_rank(chars[chars.len() - 1]).ok_or_else(unparseable)?;
    let to = Square::new(to_row, to_col).ok_or_else(unparseable)?;
    chars.truncate(chars.len() - 2);

    // Capture marker
    let capture = chars.last() == Some(&'x');
    if capture {
        chars.pop();
    }

    // Piece letter; pawns have none
    let mut rest = chars.as_slice();
    let piece = match rest.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            let piece = Piece::from_letter(c)
                .filter(|&p| p != Piece::Pawn)
                .ok_or_else(unparseable)?;
            rest = &rest[1..];
            piece
        }
        _ => Piece::Pawn,
    };

    // Disambiguator: file, rank, or both
    let (from_col, from_row) = match rest {
        [] => (None, None),
        [c] => match (Square::col_from_file(*c), Square::row_from_rank(*c)) {
            (Some(col), _) => (Some(col), None),
            (_, Some(row)) => (None, Some(row)),
            _ => return Err(unparseable()),
        },
        [f, r] => (
            Some(Square::col_from_file(*f).ok_or_else(unparseable)?),
            Some(Square::row_from_rank(*r).ok_or_else(unparseable)?),
        ),
        _ => return Err(unparseable()),
    };

    Ok(ParsedSan::Normal {
        piece,
        from_col,
        from_row,
        capture,
        to,
        promotion,
    })
}

fn find_matching_move(
    board: &mut Board,
    san: &str,
    parsed: &ParsedSan,
) -> Result<Move, SanError> {
    let moves = board.legal_moves();
    let matching: Vec<Move> = moves
        .as_slice()
        .iter()
        .copied()
        .filter(|m| is_match(m, parsed))
        .collect();

    match matching.as_slice() {
        [] => Err(SanError::NoMatchingMove(san.to_string())),
        [m] => Ok(*m),
        _ => Err(SanError::AmbiguousMove {
            san: san.to_string(),
            count: matching.len(),
        }),
    }
}

fn is_match(m: &Move, parsed: &ParsedSan) -> bool {
    match *parsed {
        ParsedSan::Castle(side) => m.castle_side() == Some(side),
        ParsedSan::Normal {
            piece,
            from_col,
            from_row,
            capture,
            to,
            promotion,
        } => {
            m.castle_side().is_none()
                && m.piece() == piece
                && m.to() == to
                && m.is_capture() == capture
                && m.promotion() == promotion
                && from_col.map_or(true, |col| m.from().col() == col)
                && from_row.map_or(true, |row| m.from().row() == row)
        }
    }
}

/// Converts a legal move to SAN notation given the current position.
///
/// The board must be in the state BEFORE the move is made; it is left
/// unchanged on return.
pub fn move_to_san(board: &mut Board, m: Move) -> String {
    let mut san = String::new();

    if let Some(side) = m.castle_side() {
        san.push_str(side.san());
        return add_check_suffix(board, m, san);
    }

    let from = m.from();
    let piece = m.piece();

    if piece != Piece::Pawn {
        san.push(piece.letter());
        san.push_str(&get_disambiguation(board, m));
    }

    if m.is_capture() {
        if piece == Piece::Pawn {
            san.push(from.file_char());
        }
        san.push('x');
    }

    san.push_str(&m.to().to_algebraic());

    if let Some(promo) = m.promotion() {
        san.push('=');
        san.push(promo.letter());
    }

    add_check_suffix(board, m, san)
}

fn get_disambiguation(board: &mut Board, m: Move) -> String {
    let from = m.from();
    let rivals: Vec<Square> = board
        .legal_moves()
        .as_slice()
        .iter()
        .filter(|o| o.piece() == m.piece() && o.to() == m.to() && o.from() != from)
        .map(|o| o.from())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    if rivals.iter().all(|sq| sq.col() != from.col()) {
        return from.file_char().to_string();
    }
    if rivals.iter().all(|sq| sq.row() != from.row()) {
        return from.rank_char().to_string();
    }
    from.to_algebraic()
}

fn add_check_suffix(board: &mut Board, m: Move, mut san: String) -> String {
    if board.make_move(m).is_err() {
        return san;
    }
    let them = board.side_to_move();
    if board.is_in_check(them) {
        if board.legal_moves().is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    board.unmake_move();
    san
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn parse_simple_moves() {
        let mut board = Board::new();
        let m = resolve(&mut board, "e4").unwrap();
        assert_eq!(m.from(), sq("e2"));
        assert_eq!(m.to(), sq("e4"));
        assert!(m.is_double_push());

        let m = resolve(&mut board, "Nf3").unwrap();
        assert_eq!(m.from(), sq("g1"));
        assert_eq!(m.to(), sq("f3"));
        assert_eq!(m.piece(), Piece::Knight);
    }

    #[test]
    fn whitespace_and_suffixes_are_accepted() {
        let mut board = Board::new();
        assert!(resolve(&mut board, "  Nf3+ ").is_ok());
        assert!(resolve(&mut board, "e4#").is_ok());
    }

    #[test]
    fn disambiguation_by_file() {
        let mut board = Board::from_fen("8/8/8/8/8/8/8/1N1K1N1k w - - 0 1").unwrap();
        assert_eq!(
            resolve(&mut board, "Nd2"),
            Err(SanError::AmbiguousMove {
                san: "Nd2".to_string(),
                count: 2
            })
        );
        let m = resolve(&mut board, "Nbd2").unwrap();
        assert_eq!(m.from(), sq("b1"));
        let m = resolve(&mut board, "Nfd2").unwrap();
        assert_eq!(m.from(), sq("f1"));
        let m = resolve(&mut board, "Nb1d2").unwrap();
        assert_eq!(m.from(), sq("b1"));
    }

    #[test]
    fn disambiguation_by_rank() {
        let mut board = Board::from_fen("7k/8/8/R7/8/8/8/R3K3 w - - 0 1").unwrap();
        let m = resolve(&mut board, "R1a3").unwrap();
        assert_eq!(m.from(), Square::A1);
        let m = resolve(&mut board, "R5a3").unwrap();
        assert_eq!(m.from(), sq("a5"));
    }

    #[test]
    fn illegal_and_malformed_are_distinct() {
        let mut board = Board::new();
        assert_eq!(
            resolve(&mut board, "Ke4"),
            Err(SanError::NoMatchingMove("Ke4".to_string()))
        );
        assert_eq!(
            resolve(&mut board, "xyz"),
            Err(SanError::Unparseable("xyz".to_string()))
        );
        assert!(matches!(resolve(&mut board, ""), Err(SanError::Unparseable(_))));
        assert!(matches!(resolve(&mut board, "Pe4"), Err(SanError::Unparseable(_))));
        assert!(matches!(resolve(&mut board, "e9"), Err(SanError::Unparseable(_))));
        assert!(matches!(
            resolve(&mut board, "e8=K"),
            Err(SanError::Unparseable(_))
        ));
    }

    #[test]
    fn capture_marker_must_match() {
        let mut board = Board::new();
        assert!(matches!(
            resolve(&mut board, "Nxf3"),
            Err(SanError::NoMatchingMove(_))
        ));

        let mut board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        assert!(matches!(
            resolve(&mut board, "ed5"),
            Err(SanError::NoMatchingMove(_))
        ));
        let m = resolve(&mut board, "exd5").unwrap();
        assert!(m.is_capture());
    }

    #[test]
    fn castling_tokens() {
        let mut board = Board::new();
        assert!(matches!(
            resolve(&mut board, "O-O"),
            Err(SanError::NoMatchingMove(_))
        ));

        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let m = resolve(&mut board, "O-O").unwrap();
        assert_eq!(m.castle_side(), Some(CastleSide::Kingside));
        let m = resolve(&mut board, "0-0-0").unwrap();
        assert_eq!(m.castle_side(), Some(CastleSide::Queenside));
        assert_eq!(m.to(), Square::C1);
    }

    #[test]
    fn promotion_letters() {
        let mut board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let m = resolve(&mut board, "a8=Q").unwrap();
        assert_eq!(m.promotion(), Some(Piece::Queen));
        let m = resolve(&mut board, "a8=n").unwrap();
        assert_eq!(m.promotion(), Some(Piece::Knight));
        // A promotion must name its piece.
        assert!(matches!(
            resolve(&mut board, "a8"),
            Err(SanError::NoMatchingMove(_))
        ));
    }

    #[test]
    fn move_to_san_basic() {
        let mut board = Board::new();
        let e4 = resolve(&mut board, "e4").unwrap();
        assert_eq!(move_to_san(&mut board, e4), "e4");
        let nf3 = resolve(&mut board, "Nf3").unwrap();
        assert_eq!(move_to_san(&mut board, nf3), "Nf3");
    }

    #[test]
    fn move_to_san_disambiguates() {
        let mut board = Board::from_fen("8/8/8/8/8/8/8/1N1K1N1k w - - 0 1").unwrap();
        let m = Move::new(sq("b1"), sq("d2"), Piece::Knight, Color::White);
        assert_eq!(move_to_san(&mut board, m), "Nbd2");

        let mut board = Board::from_fen("7k/8/8/R7/8/8/8/R3K3 w - - 0 1").unwrap();
        let m = Move::new(sq("a5"), sq("a3"), Piece::Rook, Color::White);
        assert_eq!(move_to_san(&mut board, m), "R5a3");
    }

    #[test]
    fn move_to_san_check_and_mate() {
        let mut board =
            Board::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2")
                .unwrap();
        let qh4 = resolve(&mut board, "Qh4").unwrap();
        assert_eq!(move_to_san(&mut board, qh4), "Qh4#");

        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let ra8 = resolve(&mut board, "Ra8").unwrap();
        assert_eq!(move_to_san(&mut board, ra8), "Ra8+");
    }

    #[test]
    fn move_to_san_pawn_capture_and_castle() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2")
                .unwrap();
        let exd5 = resolve(&mut board, "exd5").unwrap();
        assert_eq!(move_to_san(&mut board, exd5), "exd5");

        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        let ooo = resolve(&mut board, "O-O-O").unwrap();
        assert_eq!(move_to_san(&mut board, ooo), "O-O-O");
    }

    #[test]
    fn san_roundtrip() {
        let mut board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let snapshot = board.clone();
        for m in board.legal_moves().as_slice().to_vec() {
            let san = move_to_san(&mut board, m);
            let parsed = resolve(&mut board, &san).unwrap();
            assert_eq!(parsed, m, "round trip failed for {}", san);
        }
        assert_eq!(board, snapshot);
    }
}
