//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! The walk applies and reverts moves on a single board, so it also
//! exercises [`Board::unmake_move`].

use crate::Board;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = board.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        if board.make_move(*m).is_ok() {
            nodes += perft(board, depth - 1);
            board.unmake_move();
        }
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let moves = board.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        if board.make_move(*m).is_err() {
            continue;
        }
        let nodes = if depth > 1 {
            perft(board, depth - 1)
        } else {
            1
        };
        board.unmake_move();
        results.push((m.to_coordinate(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
