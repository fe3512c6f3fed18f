//! Square attack queries.

use crate::Board;
use chess_core::{Color, Piece, Square};

/// Returns true if any piece of color `by` attacks `sq`.
///
/// Scans outward from the target square: pawn diagonals, knight jumps, king
/// steps, then sliding rays until the first blocker.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    // A pawn of `by` attacks diagonally forward, so look one row behind it.
    let back = -by.forward();
    if occupied_by(board, sq.offset(back, -1), by, &[Piece::Pawn])
        || occupied_by(board, sq.offset(back, 1), by, &[Piece::Pawn])
    {
        return true;
    }

    if Piece::Knight
        .directions()
        .iter()
        .any(|&(dr, dc)| occupied_by(board, sq.offset(dr, dc), by, &[Piece::Knight]))
    {
        return true;
    }

    if Piece::King
        .directions()
        .iter()
        .any(|&(dr, dc)| occupied_by(board, sq.offset(dr, dc), by, &[Piece::King]))
    {
        return true;
    }

    let rays = [
        (Piece::Rook, [Piece::Rook, Piece::Queen]),
        (Piece::Bishop, [Piece::Bishop, Piece::Queen]),
    ];
    for (kind, attackers) in rays {
        for &(dr, dc) in kind.directions() {
            let mut cur = sq;
            while let Some(next) = cur.offset(dr, dc) {
                if board.piece_at(next).is_some() {
                    if occupied_by(board, Some(next), by, &attackers) {
                        return true;
                    }
                    break;
                }
                cur = next;
            }
        }
    }

    false
}

fn occupied_by(board: &Board, target: Option<Square>, by: Color, kinds: &[Piece]) -> bool {
    target
        .and_then(|t| board.piece_at(t))
        .is_some_and(|(piece, color)| color == by && kinds.contains(&piece))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn pawn_attacks_depend_on_color() {
        let board = Board::from_fen("4k3/8/8/3p4/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, sq("d3"), Color::White));
        assert!(is_square_attacked(&board, sq("f3"), Color::White));
        assert!(!is_square_attacked(&board, sq("e3"), Color::White));

        assert!(is_square_attacked(&board, sq("c4"), Color::Black));
        assert!(is_square_attacked(&board, sq("e4"), Color::Black));
        assert!(!is_square_attacked(&board, sq("c6"), Color::Black));
    }

    #[test]
    fn knight_and_king_attacks() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, sq("b3"), Color::White));
        assert!(is_square_attacked(&board, sq("c2"), Color::White));
        assert!(is_square_attacked(&board, sq("d2"), Color::White));
        assert!(is_square_attacked(&board, sq("f7"), Color::Black));
        assert!(!is_square_attacked(&board, sq("a4"), Color::White));
    }

    #[test]
    fn sliders_stop_at_first_blocker() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R2NK2q w - - 0 1").unwrap();
        assert!(is_square_attacked(&board, sq("c1"), Color::White));
        assert!(!is_square_attacked(&board, sq("e1"), Color::White));
        assert!(is_square_attacked(&board, sq("a8"), Color::White));
        // Queen on h1 is blocked by the king for squares past e1.
        assert!(is_square_attacked(&board, sq("e1"), Color::Black));
        assert!(!is_square_attacked(&board, sq("d1"), Color::Black));
        assert!(is_square_attacked(&board, sq("a8"), Color::Black));
    }
}
