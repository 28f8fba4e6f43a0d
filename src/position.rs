// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    convert::TryFrom,
    fmt::{self, Write},
};

use thiserror::Error;

use crate::{
    core::{self, *},
    movegen,
};

/// A move was rejected because it is not in the legal move set of the
/// position it was applied to. Recoverable: the caller should restore the
/// piece to its source square and wait for another move.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("illegal move: {0}")]
pub struct IllegalMoveError(pub Move);

/// A position: the complete state of a chess game at one point in time. A
/// Position records the piece placement plus the metadata needed to apply
/// every rule of the game: whose turn it is, the castling rights that remain,
/// the en-passant target square if the last move was a double pawn push, and
/// the two move clocks.
///
/// Positions are snapshots. Applying a move produces a new Position and
/// leaves the original untouched, so a what-if simulation never needs a
/// rollback step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// SquareSets for each piece and color combination (6 pieces, 2 colors = 12 sets).
    sets_by_piece: [SquareSet; 12],
    /// SquareSets for each color.
    sets_by_color: [SquareSet; 2],
    /// The en-passant square, if the previous move was a double pawn push.
    en_passant_square: Option<Square>,
    /// The halfmove clock: moves since the last capture or pawn move.
    halfmove_clock: u16,
    /// The fullmove number, incremented after every black move.
    fullmove_number: u16,
    /// Castle rights remaining for both players.
    castle_status: CastleStatus,
    /// Color whose turn it is to move.
    side_to_move: Color,
}

impl Position {
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.castle_status.contains(CastleStatus::WHITE_KINGSIDE),
            Color::Black => self.castle_status.contains(CastleStatus::BLACK_KINGSIDE),
        }
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.castle_status.contains(CastleStatus::WHITE_QUEENSIDE),
            Color::Black => self.castle_status.contains(CastleStatus::BLACK_QUEENSIDE),
        }
    }

    pub fn pieces(&self, color: Color) -> SquareSet {
        self.sets_by_color[color as usize]
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> SquareSet {
        let offset = match color {
            Color::White => 0,
            Color::Black => 6,
        };
        self.sets_by_piece[offset + kind as usize]
    }

    pub fn pawns(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Pawn)
    }

    pub fn knights(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Knight)
    }

    pub fn bishops(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Bishop)
    }

    pub fn rooks(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Rook)
    }

    pub fn queens(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Queen)
    }

    /// Returns the square of the given color's king. A position mid-setup may
    /// have no king; an ongoing game always has exactly one per color.
    pub fn king(&self, color: Color) -> Option<Square> {
        let kings = self.pieces_of_kind(color, PieceKind::King);
        assert!(kings.len() <= 1);
        kings.into_iter().next()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let color = if self.sets_by_color[Color::White as usize].contains(square) {
            Color::White
        } else if self.sets_by_color[Color::Black as usize].contains(square) {
            Color::Black
        } else {
            return None;
        };

        for kind in core::piece_kinds() {
            if self.pieces_of_kind(color, kind).contains(square) {
                return Some(Piece { kind, color });
            }
        }

        // A color set and the piece sets disagree; a piece update was missed.
        unreachable!()
    }
}

impl Position {
    pub fn new() -> Position {
        Position {
            sets_by_piece: [SquareSet::empty(); 12],
            sets_by_color: [SquareSet::empty(); 2],
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            castle_status: CastleStatus::NONE,
            side_to_move: Color::White,
        }
    }

    pub(crate) fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), ()> {
        if self.piece_at(square).is_some() {
            return Err(());
        }

        self.sets_by_color[piece.color as usize].insert(square);
        let offset = if piece.color == Color::White { 0 } else { 6 };
        self.sets_by_piece[piece.kind as usize + offset].insert(square);
        Ok(())
    }

    pub(crate) fn remove_piece(&mut self, square: Square) -> Result<(), ()> {
        let piece = match self.piece_at(square) {
            Some(piece) => piece,
            None => return Err(()),
        };

        self.sets_by_color[piece.color as usize].remove(square);
        let offset = if piece.color == Color::White { 0 } else { 6 };
        self.sets_by_piece[piece.kind as usize + offset].remove(square);
        Ok(())
    }

    /// Returns the set of squares holding pieces of `attacker` that attack
    /// `target`. Pawns count only their capture diagonals as attacks; a pawn
    /// never attacks the square directly ahead of it.
    pub fn squares_attacking(&self, attacker: Color, target: Square) -> SquareSet {
        let mut attacks = SquareSet::empty();
        let occupancy = self.pieces(Color::White) | self.pieces(Color::Black);

        // Sliders: cast queen rays out from the target square. Anything the
        // rays hit attacks the target along the matching ray, so filter the
        // hits down to pieces that slide in that direction.
        let sliders =
            self.queens(attacker) | self.rooks(attacker) | self.bishops(attacker);
        for slider in queen_attacks(target, occupancy).and(sliders) {
            let piece = self
                .piece_at(slider)
                .expect("piece set produced a piece not on the board");
            if core::attacks(piece.kind, piece.color, slider, occupancy).contains(target) {
                attacks.insert(slider);
            }
        }

        // Knight attacks are symmetric: the knights attacking the target are
        // exactly the knights a knight on the target would attack.
        attacks = attacks | knight_attacks(target).and(self.knights(attacker));

        // Pawns: a pawn of `attacker` attacks the target if the target,
        // viewed as a pawn of the opposite color, attacks the pawn's square.
        attacks = attacks | pawn_attacks(target, attacker.toggle()).and(self.pawns(attacker));

        if let Some(king) = self.king(attacker) {
            if king_attacks(king).contains(target) {
                attacks.insert(king);
            }
        }

        attacks
    }

    /// True if any piece of `by` attacks `square`.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        !self.squares_attacking(by, square).is_empty()
    }

    /// True if the given color's king is currently attacked.
    pub fn is_check(&self, us: Color) -> bool {
        match self.king(us) {
            Some(king) => self.is_attacked(king, us.toggle()),
            None => false,
        }
    }

    /// True if playing `mov` would leave the mover's own king attacked. The
    /// move is applied to a scratch copy of this position; this position is
    /// not modified.
    ///
    /// `mov` must be pseudo-legal for the piece on its source square. This is
    /// the test that separates legal moves from pseudo-legal ones.
    pub fn would_leave_king_in_check(&self, mov: Move) -> bool {
        let mover = match self.piece_at(mov.source()) {
            Some(piece) => piece.color,
            None => return false,
        };

        let mut scratch = self.clone();
        scratch.side_to_move = mover;
        scratch.make_move(mov);
        scratch.is_check(mover)
    }

    /// Applies `mov` to this position, returning the resulting position. The
    /// move is validated against the legal move set first; a move that is not
    /// legal is rejected with `IllegalMoveError` and no state changes.
    pub fn apply(&self, mov: Move) -> Result<Position, IllegalMoveError> {
        let legal = movegen::legal_moves_from(self, mov.source())
            .map_err(|_| IllegalMoveError(mov))?;
        if !legal.contains(&mov) {
            return Err(IllegalMoveError(mov));
        }

        let mut next = self.clone();
        next.make_move(mov);
        tracing::trace!(mov = %mov, fen = %next.as_fen(), "applied move");
        Ok(next)
    }
}

//
// Move application and associated state updates.
//

impl Position {
    /// Makes a move on the position, updating all internal state to reflect
    /// the effects of the move. The move must already be validated; this
    /// routine panics on moves that do not make sense for the position, such
    /// as moving from an empty square.
    pub(crate) fn make_move(&mut self, mov: Move) {
        let us = self.side_to_move;
        let them = us.toggle();
        let moving_piece = self
            .piece_at(mov.source())
            .expect("invalid move: no piece at source square");

        // Captured pieces leave the board before the moving piece arrives.
        if mov.is_capture() {
            // For en-passant the captured pawn is not on the destination
            // square: it sits on the destination's file, on the rank the
            // capturing pawn started from.
            let target_square = if mov.is_en_passant() {
                let ep_square = self
                    .en_passant_square
                    .expect("invalid move: en-passant capture without en-passant square");
                let behind = match us {
                    Color::White => Direction::South,
                    Color::Black => Direction::North,
                };
                ep_square.towards(behind)
            } else {
                mov.destination()
            };

            self.remove_piece(target_square)
                .expect("invalid move: no piece at capture target");

            // Capturing a rook on its home square takes the opponent's
            // castle right on that side with it.
            if target_square == kingside_rook(them) {
                self.castle_status &= !kingside_castle_mask(them);
            } else if target_square == queenside_rook(them) {
                self.castle_status &= !queenside_castle_mask(them);
            }
        }

        // Castles move two pieces. The move itself carries the king; the rook
        // hops to the square the king passed through.
        if mov.is_castle() {
            let (rook_source, rook_dest) = if mov.is_kingside_castle() {
                (kingside_rook(us), mov.destination().towards(Direction::West))
            } else {
                (queenside_rook(us), mov.destination().towards(Direction::East))
            };

            let rook = self
                .piece_at(rook_source)
                .expect("invalid move: castle without rook");
            self.remove_piece(rook_source)
                .expect("invalid move: castle without rook");
            self.add_piece(rook_dest, rook)
                .expect("invalid move: piece on rook destination square");
        }

        // Move the piece itself, swapping in the promoted piece if this move
        // is a promotion.
        let piece_to_add = if mov.is_promotion() {
            Piece {
                kind: mov.promotion_piece(),
                color: us,
            }
        } else {
            moving_piece
        };

        self.remove_piece(mov.source())
            .expect("invalid move: no piece at source square");
        self.add_piece(mov.destination(), piece_to_add)
            .expect("invalid move: piece at destination square");

        // A double pawn push exposes the skipped square to en-passant capture
        // for exactly one turn; every other move clears it.
        self.en_passant_square = if mov.is_double_pawn_push() {
            let behind = match us {
                Color::White => Direction::South,
                Color::Black => Direction::North,
            };
            Some(mov.destination().towards(behind))
        } else {
            None
        };

        // The mover may have forfeited castle rights by moving their king or
        // one of their rooks.
        match moving_piece.kind {
            PieceKind::King => {
                self.castle_status &= !castle_mask(us);
            }
            PieceKind::Rook if mov.source() == kingside_rook(us) => {
                self.castle_status &= !kingside_castle_mask(us);
            }
            PieceKind::Rook if mov.source() == queenside_rook(us) => {
                self.castle_status &= !queenside_castle_mask(us);
            }
            _ => {}
        }

        if mov.is_capture() || moving_piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.side_to_move = them;
        if self.side_to_move == Color::White {
            self.fullmove_number += 1;
        }
    }
}

//
// FEN parsing and generation. Positions are created by parsing FEN strings
// and can be serialized back; serialization is the exact inverse of parsing.
//

/// Possible errors that can arise when parsing a FEN string into a `Position`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum FenParseError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("unexpected trailing input")]
    TrailingInput,
    #[error("piece placement does not have 8 ranks")]
    WrongRankCount,
    #[error("rank does not describe exactly 8 squares")]
    RankWrongSize,
    #[error("unknown piece: {0}")]
    UnknownPiece(char),
    #[error("invalid side to move")]
    InvalidSideToMove,
    #[error("invalid castle rights")]
    InvalidCastle,
    #[error("invalid en-passant square")]
    InvalidEnPassant,
    #[error("invalid halfmove clock")]
    InvalidHalfmove,
    #[error("invalid fullmove number")]
    InvalidFullmove,
}

impl Position {
    pub fn from_start_position() -> Position {
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap()
    }

    /// Constructs a new position from a FEN representation: six
    /// space-separated fields holding the piece placement, the active color,
    /// the castle rights, the en-passant square, the halfmove clock, and the
    /// fullmove number. Nothing of a malformed FEN string survives; either
    /// the whole string parses or no Position is produced.
    pub fn from_fen(fen: impl AsRef<str>) -> Result<Position, FenParseError> {
        let text = fen.as_ref();
        let mut fields = text.split_whitespace();
        let placement = fields.next().ok_or(FenParseError::MissingField("piece placement"))?;
        let active = fields.next().ok_or(FenParseError::MissingField("active color"))?;
        let castles = fields.next().ok_or(FenParseError::MissingField("castle rights"))?;
        let en_passant = fields.next().ok_or(FenParseError::MissingField("en-passant square"))?;
        let halfmove = fields.next().ok_or(FenParseError::MissingField("halfmove clock"))?;
        let fullmove = fields.next().ok_or(FenParseError::MissingField("fullmove number"))?;
        if fields.next().is_some() {
            return Err(FenParseError::TrailingInput);
        }

        let mut pos = Position::new();

        // Placement lists ranks from rank 8 down to rank 1, with digits
        // standing for runs of consecutive empty squares.
        let rank_strs: Vec<_> = placement.split('/').collect();
        if rank_strs.len() != 8 {
            return Err(FenParseError::WrongRankCount);
        }

        for (i, rank_str) in rank_strs.iter().enumerate() {
            let rank = Rank::try_from(7 - i as u8).unwrap();
            let mut file = 0u8;
            for c in rank_str.chars() {
                match c {
                    '1'..='8' => file += c as u8 - b'0',
                    _ => {
                        let piece =
                            Piece::try_from(c).map_err(|_| FenParseError::UnknownPiece(c))?;
                        if file >= 8 {
                            return Err(FenParseError::RankWrongSize);
                        }

                        let square = Square::of(rank, File::try_from(file).unwrap());
                        pos.add_piece(square, piece)
                            .expect("FEN placed two pieces on one square");
                        file += 1;
                    }
                }

                if file > 8 {
                    return Err(FenParseError::RankWrongSize);
                }
            }

            if file != 8 {
                return Err(FenParseError::RankWrongSize);
            }
        }

        pos.side_to_move = match active {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(FenParseError::InvalidSideToMove),
        };

        if castles != "-" {
            if castles.is_empty() {
                return Err(FenParseError::InvalidCastle);
            }

            for c in castles.chars() {
                match c {
                    'K' => pos.castle_status |= CastleStatus::WHITE_KINGSIDE,
                    'Q' => pos.castle_status |= CastleStatus::WHITE_QUEENSIDE,
                    'k' => pos.castle_status |= CastleStatus::BLACK_KINGSIDE,
                    'q' => pos.castle_status |= CastleStatus::BLACK_QUEENSIDE,
                    _ => return Err(FenParseError::InvalidCastle),
                }
            }
        }

        if en_passant != "-" {
            let chars: Vec<_> = en_passant.chars().collect();
            if chars.len() != 2 {
                return Err(FenParseError::InvalidEnPassant);
            }

            let file = File::try_from(chars[0]).map_err(|_| FenParseError::InvalidEnPassant)?;
            let rank = Rank::try_from(chars[1]).map_err(|_| FenParseError::InvalidEnPassant)?;
            pos.en_passant_square = Some(Square::of(rank, file));
        }

        pos.halfmove_clock = halfmove
            .parse::<u16>()
            .map_err(|_| FenParseError::InvalidHalfmove)?;
        pos.fullmove_number = fullmove
            .parse::<u16>()
            .map_err(|_| FenParseError::InvalidFullmove)?;
        Ok(pos)
    }

    pub fn as_fen(&self) -> String {
        let mut buf = String::new();
        for rank in core::ranks().rev() {
            let mut empty_squares = 0;
            for file in core::files() {
                let square = Square::of(rank, file);
                if let Some(piece) = self.piece_at(square) {
                    if empty_squares != 0 {
                        write!(&mut buf, "{}", empty_squares).unwrap();
                    }
                    write!(&mut buf, "{}", piece).unwrap();
                    empty_squares = 0;
                } else {
                    empty_squares += 1;
                }
            }

            if empty_squares != 0 {
                write!(&mut buf, "{}", empty_squares).unwrap();
            }

            if rank != core::RANK_1 {
                buf.push('/');
            }
        }

        buf.push(' ');
        match self.side_to_move() {
            Color::White => buf.push('w'),
            Color::Black => buf.push('b'),
        }
        buf.push(' ');
        if self.castle_status == CastleStatus::NONE {
            buf.push('-');
        } else {
            if self.can_castle_kingside(Color::White) {
                buf.push('K');
            }
            if self.can_castle_queenside(Color::White) {
                buf.push('Q');
            }
            if self.can_castle_kingside(Color::Black) {
                buf.push('k');
            }
            if self.can_castle_queenside(Color::Black) {
                buf.push('q');
            }
        }
        buf.push(' ');
        match self.en_passant_square() {
            Some(square) => write!(&mut buf, "{}", square).unwrap(),
            None => buf.push('-'),
        }
        write!(
            &mut buf,
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        )
        .unwrap();
        buf
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in core::files() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in core::files() {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

pub(crate) fn king_start(color: Color) -> Square {
    match color {
        Color::White => E1,
        Color::Black => E8,
    }
}

pub(crate) fn kingside_rook(color: Color) -> Square {
    match color {
        Color::White => H1,
        Color::Black => H8,
    }
}

pub(crate) fn queenside_rook(color: Color) -> Square {
    match color {
        Color::White => A1,
        Color::Black => A8,
    }
}

fn kingside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_KINGSIDE,
        Color::Black => CastleStatus::BLACK_KINGSIDE,
    }
}

fn queenside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_QUEENSIDE,
        Color::Black => CastleStatus::BLACK_QUEENSIDE,
    }
}

fn castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE,
        Color::Black => CastleStatus::BLACK,
    }
}
