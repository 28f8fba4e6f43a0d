// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move generation. Moves are produced in two stages: the generators in this
//! module emit pseudo-legal moves, which obey the movement rules of each
//! piece but may leave the mover's king in check, and the legality queries
//! filter those down by simulating each move on a scratch position.
//!
//! Castling is the exception: its legality conditions (path clear, king not
//! in check, transit square not attacked) cannot be checked by simulating
//! the move afterwards, so the king generator checks them up front and only
//! ever emits legal castles.

use crate::{
    core::*,
    position::{king_start, kingside_rook, queenside_rook, Position},
};

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
    PieceKind::Queen,
];

pub fn generate_pawn_moves(us: Color, pos: &Position, moves: &mut Vec<Move>) {
    let them = us.toggle();
    let their_pieces = pos.pieces(them);
    let our_pieces = pos.pieces(us);
    let all_pieces = their_pieces.or(our_pieces);
    let empty_squares = !all_pieces;
    let (up, down, up_left, up_right, promo_rank, start_rank) = if us == Color::White {
        (
            Direction::North,
            Direction::South,
            Direction::NorthWest,
            Direction::NorthEast,
            SS_RANK_8,
            SS_RANK_2,
        )
    } else {
        (
            Direction::South,
            Direction::North,
            Direction::SouthWest,
            Direction::SouthEast,
            SS_RANK_1,
            SS_RANK_7,
        )
    };
    let rank_below_promo = promo_rank.shift(down);
    let our_pawns = pos.pawns(us);

    // Single and double pawn pushes, not counting promotions.
    {
        let single_pushes = our_pawns
            .and(!rank_below_promo)
            .shift(up)
            .and(empty_squares);
        let double_pushes = single_pushes
            .and(start_rank.shift(up))
            .shift(up)
            .and(empty_squares);
        for target in single_pushes {
            moves.push(Move::quiet(target.towards(down), target));
        }
        for target in double_pushes {
            moves.push(Move::double_pawn_push(
                target.towards(down).towards(down),
                target,
            ));
        }
    }

    // Promotions, both captures and not. Every push or capture onto the
    // promotion rank yields four moves, one per promotion piece.
    let pawns_near_promo = our_pawns.and(rank_below_promo);
    if !pawns_near_promo.is_empty() {
        let up_left_promo = pawns_near_promo.shift(up_left).and(their_pieces);
        let up_right_promo = pawns_near_promo.shift(up_right).and(their_pieces);
        let up_promo = pawns_near_promo.shift(up).and(empty_squares);
        for target in up_left_promo {
            for kind in PROMOTION_KINDS {
                moves.push(Move::promotion_capture(
                    target.towards(up_left.reverse()),
                    target,
                    kind,
                ));
            }
        }
        for target in up_right_promo {
            for kind in PROMOTION_KINDS {
                moves.push(Move::promotion_capture(
                    target.towards(up_right.reverse()),
                    target,
                    kind,
                ));
            }
        }
        for target in up_promo {
            for kind in PROMOTION_KINDS {
                moves.push(Move::promotion(target.towards(up.reverse()), target, kind));
            }
        }
    }

    // Non-promotion captures, including en-passant.
    let non_promo_pawns = our_pawns.and(!pawns_near_promo);
    {
        let up_left_cap = non_promo_pawns.shift(up_left).and(their_pieces);
        let up_right_cap = non_promo_pawns.shift(up_right).and(their_pieces);
        for target in up_left_cap {
            moves.push(Move::capture(target.towards(up_left.reverse()), target));
        }
        for target in up_right_cap {
            moves.push(Move::capture(target.towards(up_right.reverse()), target));
        }

        // The en-passant square belongs to the side to move; it is not a
        // capture target for the side that just pushed past it.
        if us == pos.side_to_move() {
            if let Some(ep_square) = pos.en_passant_square() {
                for source in pawn_attacks(ep_square, them).and(our_pawns) {
                    moves.push(Move::en_passant(source, ep_square));
                }
            }
        }
    }
}

pub fn generate_moves_for_kind(us: Color, pos: &Position, kind: PieceKind, moves: &mut Vec<Move>) {
    debug_assert!(
        kind != PieceKind::King && kind != PieceKind::Pawn,
        "kings and pawns have their own movegen routines"
    );

    let all_pieces = pos.pieces(Color::White) | pos.pieces(Color::Black);
    let enemy_pieces = pos.pieces(us.toggle());
    for piece in pos.pieces_of_kind(us, kind) {
        for atk in attacks(kind, us, piece, all_pieces) {
            if enemy_pieces.contains(atk) {
                moves.push(Move::capture(piece, atk));
            } else {
                moves.push(Move::quiet(piece, atk));
            }
        }
    }
}

pub fn generate_king_moves(us: Color, pos: &Position, moves: &mut Vec<Move>) {
    let king = match pos.king(us) {
        Some(king) => king,
        None => return,
    };
    let them = us.toggle();
    let our_pieces = pos.pieces(us);
    let all_pieces = our_pieces | pos.pieces(them);

    for target in king_attacks(king).and(!our_pieces) {
        if pos.pieces(them).contains(target) {
            moves.push(Move::capture(king, target));
        } else {
            moves.push(Move::quiet(king, target));
        }
    }

    // Castling. Only available from the king's starting square, with the
    // matching right intact, the squares between king and rook empty, and
    // none of the king's start, transit, or destination squares attacked.
    if king != king_start(us) || pos.is_attacked(king, them) {
        return;
    }

    let our_rooks = pos.rooks(us);

    if pos.can_castle_kingside(us) {
        let transit = king.towards(Direction::East);
        let dest = transit.towards(Direction::East);
        let path_clear = !all_pieces.contains(transit) && !all_pieces.contains(dest);
        if path_clear
            && our_rooks.contains(kingside_rook(us))
            && !pos.is_attacked(transit, them)
            && !pos.is_attacked(dest, them)
        {
            moves.push(Move::kingside_castle(king, dest));
        }
    }

    if pos.can_castle_queenside(us) {
        let transit = king.towards(Direction::West);
        let dest = transit.towards(Direction::West);
        // The square next to the rook must also be empty, although the king
        // never passes through it.
        let rook_neighbor = dest.towards(Direction::West);
        let path_clear = !all_pieces.contains(transit)
            && !all_pieces.contains(dest)
            && !all_pieces.contains(rook_neighbor);
        if path_clear
            && our_rooks.contains(queenside_rook(us))
            && !pos.is_attacked(transit, them)
            && !pos.is_attacked(dest, them)
        {
            moves.push(Move::queenside_castle(king, dest));
        }
    }
}

/// Generates all pseudo-legal moves for the given color.
pub fn generate_moves(us: Color, pos: &Position, moves: &mut Vec<Move>) {
    generate_pawn_moves(us, pos, moves);
    generate_moves_for_kind(us, pos, PieceKind::Bishop, moves);
    generate_moves_for_kind(us, pos, PieceKind::Knight, moves);
    generate_moves_for_kind(us, pos, PieceKind::Rook, moves);
    generate_moves_for_kind(us, pos, PieceKind::Queen, moves);
    generate_king_moves(us, pos, moves);
}

fn pseudo_legal_moves_from(pos: &Position, square: Square) -> Result<Vec<Move>, EmptySquareError> {
    let piece = pos.piece_at(square).ok_or(EmptySquareError(square))?;
    let mut moves = Vec::new();
    generate_moves(piece.color, pos, &mut moves);
    moves.retain(|mov| mov.source() == square);
    Ok(moves)
}

/// The destination squares the piece on `square` could move to if the only
/// constraint were each piece's movement rules. The answer ignores whose
/// turn it is and may include moves that leave the mover's king in check.
///
/// Fails with `EmptySquareError` if there is no piece on `square`.
pub fn pseudo_legal_targets(pos: &Position, square: Square) -> Result<SquareSet, EmptySquareError> {
    let moves = pseudo_legal_moves_from(pos, square)?;
    Ok(moves.iter().map(|mov| mov.destination()).collect())
}

/// The full list of legal moves for the piece on `square`. Empty when the
/// piece belongs to the side not on move.
///
/// Fails with `EmptySquareError` if there is no piece on `square`.
pub fn legal_moves_from(pos: &Position, square: Square) -> Result<Vec<Move>, EmptySquareError> {
    let piece = pos.piece_at(square).ok_or(EmptySquareError(square))?;
    if piece.color != pos.side_to_move() {
        return Ok(Vec::new());
    }

    let mut moves = pseudo_legal_moves_from(pos, square)?;
    moves.retain(|&mov| !pos.would_leave_king_in_check(mov));
    Ok(moves)
}

/// The destination squares the piece on `square` may legally move to. This
/// is the square set a board UI should highlight when the piece is picked
/// up: empty if the piece belongs to the side not on move.
///
/// Fails with `EmptySquareError` if there is no piece on `square`.
pub fn legal_targets(pos: &Position, square: Square) -> Result<SquareSet, EmptySquareError> {
    let moves = legal_moves_from(pos, square)?;
    Ok(moves.iter().map(|mov| mov.destination()).collect())
}

/// All legal moves for the side to move. An empty answer means the game is
/// over: checkmate if the side to move is in check, stalemate otherwise.
pub fn all_legal_moves(pos: &Position) -> Vec<Move> {
    let mut moves = Vec::new();
    generate_moves(pos.side_to_move(), pos, &mut moves);
    moves.retain(|&mov| !pos.would_leave_king_in_check(mov));
    moves
}

/// Counts the leaf nodes of the legal move tree of the given depth. Perft
/// totals for well-known positions are published, which makes this the
/// standard whole-pipeline test of generation, legality, and application.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mov in all_legal_moves(pos) {
        let mut child = pos.clone();
        child.make_move(mov);
        nodes += perft(&child, depth - 1);
    }

    nodes
}
