// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::convert::TryFrom;
use std::fmt::{self, Write};

use thiserror::Error;

use crate::{core::*, Position};

const SOURCE_MASK: u16 = 0x003F;
const DESTINATION_MASK: u16 = 0x0FC0;
const SPECIAL_1_BIT: u16 = 0x1000;
const SPECIAL_0_BIT: u16 = 0x2000;
const CAPTURE_BIT: u16 = 0x4000;
const PROMO_BIT: u16 = 0x8000;
const ATTR_SHIFT: u16 = 12;

/// A pawn may only promote to a knight, bishop, rook, or queen. Anything else
/// is rejected; the caller is expected to re-prompt for a valid choice.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid promotion kind: {0:?}")]
pub struct InvalidPromotionError(pub PieceKind);

/// Errors arising when constructing a [`Move`] from caller-supplied squares.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoveBuildError {
    #[error(transparent)]
    EmptySquare(#[from] EmptySquareError),
    #[error(transparent)]
    InvalidPromotion(#[from] InvalidPromotionError),
}

/// A single chess move, packed into sixteen bits:
///
///  * bits 0-5: source square
///  * bits 6-11: destination square
///  * bit 12: "special 1"
///  * bit 13: "special 0"
///  * bit 14: capture
///  * bit 15: promotion
///
/// The two special bits are overloaded to distinguish the moves that do not
/// fit a plain source/destination pair:
///
/// | Promo | Capt  | Spc 0 | Spc 1 | Move                   |
/// |-------|-------|-------|-------|------------------------|
/// | 0     | 0     | 0     | 0     | Quiet                  |
/// | 0     | 0     | 0     | 1     | Double Pawn Push       |
/// | 0     | 0     | 1     | 0     | Kingside Castle        |
/// | 0     | 0     | 1     | 1     | Queenside Castle       |
/// | 0     | 1     | 0     | 0     | Capture                |
/// | 0     | 1     | 0     | 1     | En Passant Capture     |
/// | 1     | *     | 0     | 0     | Knight Promotion       |
/// | 1     | *     | 0     | 1     | Bishop Promotion       |
/// | 1     | *     | 1     | 0     | Rook Promotion         |
/// | 1     | *     | 1     | 1     | Queen Promotion        |
///
/// When the promotion bit is set the capture bit is free to combine with any
/// promotion piece encoding.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Constructs a new quiet move from the source square to the destination
    /// square.
    pub fn quiet(source: Square, dest: Square) -> Move {
        Move(source.0 as u16 | ((dest.0 as u16) << 6))
    }

    /// Constructs a new capture move from the source square to the destination
    /// square.
    pub fn capture(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | CAPTURE_BIT)
    }

    /// Constructs a new en passant capture from the source square to the
    /// destination square. The destination is the skipped square, not the
    /// square of the captured pawn.
    pub fn en_passant(source: Square, dest: Square) -> Move {
        Move(Move::capture(source, dest).0 | SPECIAL_1_BIT)
    }

    /// Constructs a new double pawn push from the source square to the
    /// destination square.
    pub fn double_pawn_push(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | SPECIAL_1_BIT)
    }

    /// Constructs a new promotion from the source square to the destination
    /// square. Panics if `promoted` is not a legal promotion target; fallible
    /// callers should go through [`Move::from_parts`].
    pub fn promotion(source: Square, dest: Square, promoted: PieceKind) -> Move {
        let piece_bits = match promoted {
            PieceKind::Knight => 0,
            PieceKind::Bishop => SPECIAL_1_BIT,
            PieceKind::Rook => SPECIAL_0_BIT,
            PieceKind::Queen => SPECIAL_0_BIT | SPECIAL_1_BIT,
            _ => panic!("invalid promotion piece: {:?}", promoted),
        };

        Move(Move::quiet(source, dest).0 | PROMO_BIT | piece_bits)
    }

    /// Constructs a new promotion capture from the source square to the
    /// destination square.
    pub fn promotion_capture(source: Square, dest: Square, promoted: PieceKind) -> Move {
        Move(Move::promotion(source, dest, promoted).0 | CAPTURE_BIT)
    }

    /// Constructs a new kingside castle. Castles are encoded with the king's
    /// source and destination squares.
    pub fn kingside_castle(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | SPECIAL_0_BIT)
    }

    /// Constructs a new queenside castle.
    pub fn queenside_castle(source: Square, dest: Square) -> Move {
        Move(Move::quiet(source, dest).0 | SPECIAL_0_BIT | SPECIAL_1_BIT)
    }

    /// Returns the source square of this move.
    pub fn source(self) -> Square {
        Square((self.0 & SOURCE_MASK) as u8)
    }

    /// Returns the destination square of this move.
    pub fn destination(self) -> Square {
        Square(((self.0 & DESTINATION_MASK) >> 6) as u8)
    }

    fn attrs(self) -> u16 {
        self.0 >> ATTR_SHIFT
    }

    pub fn is_quiet(self) -> bool {
        self.attrs() == 0
    }

    pub fn is_capture(self) -> bool {
        self.0 & CAPTURE_BIT != 0
    }

    pub fn is_en_passant(self) -> bool {
        self.attrs() == 0b0101
    }

    pub fn is_double_pawn_push(self) -> bool {
        self.attrs() == 0b0001
    }

    pub fn is_promotion(self) -> bool {
        self.0 & PROMO_BIT != 0
    }

    pub fn is_kingside_castle(self) -> bool {
        self.attrs() == 0b0010
    }

    pub fn is_queenside_castle(self) -> bool {
        self.attrs() == 0b0011
    }

    pub fn is_castle(self) -> bool {
        self.is_kingside_castle() || self.is_queenside_castle()
    }

    /// If this move is a promotion, returns the piece kind that the pawn is
    /// being promoted to. Panics if the move is not a promotion.
    pub fn promotion_piece(self) -> PieceKind {
        assert!(self.is_promotion());
        match self.0 & (SPECIAL_0_BIT | SPECIAL_1_BIT) {
            0 => PieceKind::Knight,
            SPECIAL_1_BIT => PieceKind::Bishop,
            SPECIAL_0_BIT => PieceKind::Rook,
            _ => PieceKind::Queen,
        }
    }

    /// Constructs a Move from a source square, a destination square, and an
    /// optional promotion choice, inferring the move category from the given
    /// position. This is the constructor that a UI drop handler wants: it is
    /// given only where a piece was picked up and where it was released.
    ///
    /// When a pawn reaches the last rank and no promotion choice is supplied,
    /// the promotion defaults to a queen. A supplied promotion kind outside
    /// knight/bishop/rook/queen is rejected with `InvalidPromotionError`.
    ///
    /// The returned move is not guaranteed to be legal; it is up to the
    /// caller to validate it, which [`Position::apply`] does.
    pub fn from_parts(
        pos: &Position,
        source: Square,
        dest: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveBuildError> {
        let piece = pos
            .piece_at(source)
            .ok_or(EmptySquareError(source))?;
        if let Some(kind) = promotion {
            if !kind.is_valid_promotion() {
                return Err(InvalidPromotionError(kind).into());
            }
        }

        let is_capture = pos.piece_at(dest).is_some();
        if piece.kind == PieceKind::Pawn {
            let (up, promo_rank, start_rank) = match piece.color {
                Color::White => (Direction::North, SS_RANK_8, SS_RANK_2),
                Color::Black => (Direction::South, SS_RANK_1, SS_RANK_7),
            };

            if start_rank.contains(source) && source.towards(up).towards(up) == dest {
                return Ok(Move::double_pawn_push(source, dest));
            }

            if attacks::pawn_attacks(source, piece.color).contains(dest) {
                if promo_rank.contains(dest) {
                    let kind = promotion.unwrap_or(PieceKind::Queen);
                    return Ok(Move::promotion_capture(source, dest, kind));
                }

                if pos.en_passant_square() == Some(dest) {
                    return Ok(Move::en_passant(source, dest));
                }

                return Ok(Move::capture(source, dest));
            }

            if promo_rank.contains(dest) {
                let kind = promotion.unwrap_or(PieceKind::Queen);
                return Ok(Move::promotion(source, dest, kind));
            }

            return Ok(Move::quiet(source, dest));
        }

        if piece.kind == PieceKind::King {
            let (king_start, kingside_dest, queenside_dest) = match piece.color {
                Color::White => (E1, G1, C1),
                Color::Black => (E8, G8, C8),
            };

            if source == king_start {
                if dest == kingside_dest {
                    return Ok(Move::kingside_castle(source, dest));
                }

                if dest == queenside_dest {
                    return Ok(Move::queenside_castle(source, dest));
                }
            }
        }

        if is_capture {
            Ok(Move::capture(source, dest))
        } else {
            Ok(Move::quiet(source, dest))
        }
    }

    /// Parses the textual representation of a move ("e2e4", "e7e8q") against
    /// a position. Returns None if the text is not a move at all; category
    /// inference is delegated to [`Move::from_parts`].
    pub fn from_text(pos: &Position, text: &str) -> Option<Move> {
        let chars: Vec<_> = text.chars().collect();
        if chars.len() < 4 || chars.len() > 5 {
            return None;
        }

        let source_file = File::try_from(chars[0]).ok()?;
        let source_rank = Rank::try_from(chars[1]).ok()?;
        let dest_file = File::try_from(chars[2]).ok()?;
        let dest_rank = Rank::try_from(chars[3]).ok()?;
        let promotion = match chars.get(4) {
            Some('n') => Some(PieceKind::Knight),
            Some('b') => Some(PieceKind::Bishop),
            Some('r') => Some(PieceKind::Rook),
            Some('q') => Some(PieceKind::Queen),
            Some(_) => return None,
            None => None,
        };

        let source = Square::of(source_rank, source_file);
        let dest = Square::of(dest_rank, dest_file);
        Move::from_parts(pos, source, dest, promotion).ok()
    }

    /// Returns the textual representation of this move: source square,
    /// destination square, and the promotion piece if there is one.
    pub fn as_text(self) -> String {
        let mut buf = String::new();
        write!(&mut buf, "{}{}", self.source(), self.destination()).unwrap();
        if self.is_promotion() {
            write!(&mut buf, "{}", self.promotion_piece()).unwrap();
        }

        buf
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_text())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{} (0x{:04x})", self.as_text(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::core::*;
    use crate::Position;

    #[test]
    fn quiet() {
        let quiet = Move::quiet(A4, A5);
        assert_eq!(A4, quiet.source());
        assert_eq!(A5, quiet.destination());
        assert!(quiet.is_quiet());
    }

    #[test]
    fn capture() {
        let capture = Move::capture(B4, C4);
        assert_eq!(B4, capture.source());
        assert_eq!(C4, capture.destination());
        assert!(capture.is_capture());
        assert!(!capture.is_quiet());
        assert!(!capture.is_en_passant());
    }

    #[test]
    fn en_passant() {
        let ep = Move::en_passant(E5, D6);
        assert!(ep.is_en_passant());
        assert!(ep.is_capture());
        assert!(!ep.is_quiet());
        assert!(!ep.is_double_pawn_push());
    }

    #[test]
    fn double_pawn_push() {
        let push = Move::double_pawn_push(D2, D4);
        assert!(push.is_double_pawn_push());
        assert!(!push.is_capture());
        assert!(!push.is_en_passant());
    }

    #[test]
    fn promotions() {
        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
        ] {
            let promo = Move::promotion(A7, A8, kind);
            assert!(promo.is_promotion());
            assert!(!promo.is_capture());
            assert_eq!(kind, promo.promotion_piece());

            let promo_capture = Move::promotion_capture(A7, B8, kind);
            assert!(promo_capture.is_promotion());
            assert!(promo_capture.is_capture());
            assert_eq!(kind, promo_capture.promotion_piece());
        }
    }

    #[test]
    fn castles() {
        let kingside = Move::kingside_castle(E1, G1);
        assert!(kingside.is_kingside_castle());
        assert!(kingside.is_castle());
        assert!(!kingside.is_queenside_castle());
        assert!(!kingside.is_capture());

        let queenside = Move::queenside_castle(E8, C8);
        assert!(queenside.is_queenside_castle());
        assert!(queenside.is_castle());
        assert!(!queenside.is_kingside_castle());
    }

    #[test]
    fn text_smoke() {
        assert_eq!("a1a2", Move::quiet(A1, A2).as_text());
        assert_eq!("a7a8q", Move::promotion(A7, A8, PieceKind::Queen).as_text());
        assert_eq!("e1g1", Move::kingside_castle(E1, G1).as_text());
    }

    #[test]
    fn from_parts_pawn_moves() {
        let pos = Position::from_fen("8/8/8/8/8/4p3/3P4/8 w - c3 0 1").unwrap();
        assert_eq!(
            Ok(Move::quiet(D2, D3)),
            Move::from_parts(&pos, D2, D3, None)
        );
        assert_eq!(
            Ok(Move::double_pawn_push(D2, D4)),
            Move::from_parts(&pos, D2, D4, None)
        );
        assert_eq!(
            Ok(Move::capture(D2, E3)),
            Move::from_parts(&pos, D2, E3, None)
        );
        assert_eq!(
            Ok(Move::en_passant(D2, C3)),
            Move::from_parts(&pos, D2, C3, None)
        );
    }

    #[test]
    fn from_parts_empty_square() {
        let pos = Position::from_start_position();
        assert_eq!(
            Err(MoveBuildError::EmptySquare(EmptySquareError(E4))),
            Move::from_parts(&pos, E4, E5, None)
        );
    }

    #[test]
    fn from_parts_promotion_default_queen() {
        let pos = Position::from_fen("8/4P3/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(
            Ok(Move::promotion(E7, E8, PieceKind::Queen)),
            Move::from_parts(&pos, E7, E8, None)
        );
        assert_eq!(
            Ok(Move::promotion(E7, E8, PieceKind::Knight)),
            Move::from_parts(&pos, E7, E8, Some(PieceKind::Knight))
        );
    }

    #[test]
    fn from_parts_invalid_promotion() {
        let pos = Position::from_fen("8/4P3/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(
            Err(MoveBuildError::InvalidPromotion(InvalidPromotionError(
                PieceKind::King
            ))),
            Move::from_parts(&pos, E7, E8, Some(PieceKind::King))
        );
    }

    #[test]
    fn from_parts_castles() {
        let pos = Position::from_fen("8/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            Ok(Move::kingside_castle(E1, G1)),
            Move::from_parts(&pos, E1, G1, None)
        );
        assert_eq!(
            Ok(Move::queenside_castle(E1, C1)),
            Move::from_parts(&pos, E1, C1, None)
        );
        assert_eq!(
            Ok(Move::quiet(E1, E2)),
            Move::from_parts(&pos, E1, E2, None)
        );
    }

    #[test]
    fn from_text_sliding_moves() {
        let pos = Position::from_fen("8/3q4/8/8/8/3R4/8/8 w - - 0 1").unwrap();
        assert_eq!(Some(Move::quiet(D3, D5)), Move::from_text(&pos, "d3d5"));
        assert_eq!(Some(Move::capture(D3, D7)), Move::from_text(&pos, "d3d7"));
        assert_eq!(None, Move::from_text(&pos, "d3"));
        assert_eq!(None, Move::from_text(&pos, "d3d5x"));
    }
}
