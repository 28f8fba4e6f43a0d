// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Whole-game analysis: classifying a position as ongoing, check,
//! checkmate, or stalemate.

use std::fmt;

use crate::{movegen, Position};

/// The status of a game, from the perspective of the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// The side to move has legal moves and is not in check.
    Ongoing,
    /// The side to move is in check but has at least one legal move.
    Check,
    /// The side to move is in check and has no legal moves. The side that
    /// delivered the check wins.
    Checkmate,
    /// The side to move is not in check but has no legal moves. The game is
    /// drawn.
    Stalemate,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        };
        write!(f, "{}", text)
    }
}

/// Classifies the position for the side to move. Check and checkmate are
/// separated by whether any legal move remains; no-legal-moves without check
/// is stalemate.
pub fn game_status(pos: &Position) -> GameStatus {
    let in_check = pos.is_check(pos.side_to_move());
    let has_moves = !movegen::all_legal_moves(pos).is_empty();
    let status = match (in_check, has_moves) {
        (false, true) => GameStatus::Ongoing,
        (true, true) => GameStatus::Check,
        (true, false) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
    };
    tracing::debug!(status = %status, side = ?pos.side_to_move(), "classified position");
    status
}

#[cfg(test)]
mod tests {
    use super::{game_status, GameStatus};
    use crate::{core::*, Position};

    #[test]
    fn start_position_is_ongoing() {
        let pos = Position::from_start_position();
        assert_eq!(GameStatus::Ongoing, game_status(&pos));
    }

    #[test]
    fn escapable_check() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap();
        assert_eq!(GameStatus::Check, game_status(&pos));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        // 1. f3 e5 2. g4 Qh4#
        let pos =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert_eq!(GameStatus::Checkmate, game_status(&pos));
    }

    #[test]
    fn back_rank_mate() {
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/4R1K1 b - - 0 1").unwrap();
        // The rook is not yet on the back rank; the king has f8 and h8.
        assert_eq!(GameStatus::Ongoing, game_status(&pos));

        let mated = pos
            .apply(Move::quiet(G8, H8))
            .unwrap()
            .apply(Move::quiet(E1, E8))
            .unwrap();
        assert_eq!(GameStatus::Checkmate, game_status(&mated));
    }

    #[test]
    fn cornered_king_stalemate() {
        // The black king on a8 has no moves but is not attacked.
        let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        assert_eq!(GameStatus::Stalemate, game_status(&pos));
    }

    #[test]
    fn block_or_capture_averts_mate() {
        // The check can be answered by interposing the rook from a7, so this
        // is check rather than checkmate.
        let pos = Position::from_fen("4k3/r7/8/8/8/8/8/4R1K1 b - - 0 1").unwrap();
        assert_eq!(GameStatus::Check, game_status(&pos));
    }
}
