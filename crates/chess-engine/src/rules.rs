//! Game termination: checkmate, stalemate and draw conditions.

use crate::Board;
use chess_core::{Color, Piece};

/// Outcome of the side to move having (or lacking) legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    Ongoing,
    /// The side to move is in check and has no legal move.
    Checkmate,
    /// The side to move is not in check and has no legal move.
    Stalemate,
}

/// Reason for a draw that does not depend on the moves available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// Neither side can possibly deliver mate.
    InsufficientMaterial,
    /// The half-move clock reached the configured limit (100 by default).
    FiftyMoveRule,
    /// The current position occurred the configured number of times (3 by default).
    ThreefoldRepetition,
}

impl Board {
    /// Determines whether the side to move is mated, stalemated, or can play on.
    pub fn status(&mut self) -> GameStatus {
        if !self.legal_moves().is_empty() {
            return GameStatus::Ongoing;
        }
        let us = self.side_to_move();
        let status = if self.is_in_check(us) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        };
        tracing::debug!("{:?} with {} to move", status, us);
        status
    }

    /// Returns true when one side has a bare king and the other has at most
    /// a single minor piece or two knights.
    pub fn is_insufficient_material(&self) -> bool {
        let white = self.material(Color::White);
        let black = self.material(Color::Black);

        let cannot_mate = |pieces: &[Piece]| match pieces {
            [] => true,
            [single] => single.is_minor(),
            [a, b] => *a == Piece::Knight && *b == Piece::Knight,
            _ => false,
        };

        (white.is_empty() && cannot_mate(&black)) || (black.is_empty() && cannot_mate(&white))
    }

    /// Non-king pieces of `color` still on the board.
    fn material(&self, color: Color) -> Vec<Piece> {
        self.pieces(color)
            .map(|id| self.piece(id).piece)
            .filter(|&piece| piece != Piece::King)
            .collect()
    }

    /// Returns true once the half-move clock reaches the configured limit.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock() >= self.rules().fifty_move_plies
    }

    /// Returns true if the current position has occurred at least as often as
    /// the configured threshold.
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= self.rules().repetition_threshold
    }

    /// Returns the first draw condition that holds, checked in the order
    /// insufficient material, fifty-move rule, repetition.
    pub fn draw_reason(&self) -> Option<DrawReason> {
        if self.is_insufficient_material() {
            Some(DrawReason::InsufficientMaterial)
        } else if self.is_fifty_move_draw() {
            Some(DrawReason::FiftyMoveRule)
        } else if self.is_threefold_repetition() {
            Some(DrawReason::ThreefoldRepetition)
        } else {
            None
        }
    }
}
