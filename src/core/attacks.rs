// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack sets for every piece kind. Leaper attacks (king, knight, pawn) are
//! precomputed per square; slider attacks (bishop, rook, queen) are computed
//! from precomputed rays, cut off at the first occupied square.

use std::convert::TryFrom;

use lazy_static::lazy_static;

use crate::core::*;

/// Returns the square displaced from `sq` by the given rank and file deltas,
/// or None if the displacement leaves the board.
fn displace(sq: Square, rank_delta: i32, file_delta: i32) -> Option<Square> {
    let rank = sq.rank().as_u8() as i32 + rank_delta;
    let file = sq.file().as_u8() as i32 + file_delta;
    if !(0..8).contains(&rank) || !(0..8).contains(&file) {
        return None;
    }

    let rank = Rank::try_from(rank as u8).unwrap();
    let file = File::try_from(file as u8).unwrap();
    Some(Square::of(rank, file))
}

fn leaper_table(deltas: &[(i32, i32)]) -> [SquareSet; 64] {
    let mut table = [SquareSet::empty(); 64];
    for sq in squares() {
        let mut set = SquareSet::empty();
        for &(rank_delta, file_delta) in deltas {
            if let Some(target) = displace(sq, rank_delta, file_delta) {
                set.insert(target);
            }
        }

        table[sq.as_u8() as usize] = set;
    }

    table
}

const KING_DELTAS: [(i32, i32); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (2, -1),
    (2, 1),
    (1, -2),
    (1, 2),
    (-1, -2),
    (-1, 2),
    (-2, -1),
    (-2, 1),
];

fn pawn_table() -> [[SquareSet; 2]; 64] {
    let mut table = [[SquareSet::empty(); 2]; 64];
    for sq in squares() {
        for color in colors() {
            // Pawns attack their capture diagonals only; the push squares
            // ahead of a pawn are never attacked.
            let rank_delta = match color {
                Color::White => 1,
                Color::Black => -1,
            };

            let mut set = SquareSet::empty();
            for file_delta in [-1, 1] {
                if let Some(target) = displace(sq, rank_delta, file_delta) {
                    set.insert(target);
                }
            }

            table[sq.as_u8() as usize][color as usize] = set;
        }
    }

    table
}

/// Rays indexed by square and direction. Index 64 is a sentinel holding empty
/// rays, used when a blocker scan finds no blocking square.
fn ray_table() -> Box<[[SquareSet; 8]; 65]> {
    let dir_deltas = |dir: Direction| -> (i32, i32) {
        match dir {
            Direction::North => (1, 0),
            Direction::NorthEast => (1, 1),
            Direction::East => (0, 1),
            Direction::SouthEast => (-1, 1),
            Direction::South => (-1, 0),
            Direction::SouthWest => (-1, -1),
            Direction::West => (0, -1),
            Direction::NorthWest => (1, -1),
        }
    };

    let mut table = Box::new([[SquareSet::empty(); 8]; 65]);
    for sq in squares() {
        for dir in [
            Direction::North,
            Direction::NorthEast,
            Direction::East,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::West,
            Direction::NorthWest,
        ] {
            let (rank_delta, file_delta) = dir_deltas(dir);
            let mut ray = SquareSet::empty();
            let mut cursor = sq;
            while let Some(next) = displace(cursor, rank_delta, file_delta) {
                ray.insert(next);
                cursor = next;
            }

            table[sq.as_u8() as usize][dir as usize] = ray;
        }
    }

    table
}

lazy_static! {
    static ref KING_TABLE: [SquareSet; 64] = leaper_table(&KING_DELTAS);
    static ref KNIGHT_TABLE: [SquareSet; 64] = leaper_table(&KNIGHT_DELTAS);
    static ref PAWN_TABLE: [[SquareSet; 2]; 64] = pawn_table();
    static ref RAY_TABLE: Box<[[SquareSet; 8]; 65]> = ray_table();
}

fn positive_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.as_vector() > 0);
    let ray = RAY_TABLE[sq.as_u8() as usize][dir as usize];
    let blockers = ray.and(occupancy).bits();
    // For positive rays the blocking square closest to `sq` is the lowest set
    // bit; everything on the blocker's own ray is occluded.
    let blocking_square = blockers.trailing_zeros() as usize;
    ray.xor(RAY_TABLE[blocking_square][dir as usize])
}

fn negative_ray_attacks(sq: Square, occupancy: SquareSet, dir: Direction) -> SquareSet {
    debug_assert!(dir.as_vector() < 0);
    let ray = RAY_TABLE[sq.as_u8() as usize][dir as usize];
    let blockers = ray.and(occupancy).bits();
    // For negative rays the closest blocker is the highest set bit. The
    // sentinel index 64 is used when there is no blocker at all.
    let blocking_square = (64 - blockers.leading_zeros()).checked_sub(1).unwrap_or(64) as usize;
    ray.xor(RAY_TABLE[blocking_square][dir as usize])
}

pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    PAWN_TABLE[sq.as_u8() as usize][color as usize]
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE[sq.as_u8() as usize]
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE[sq.as_u8() as usize]
}

pub fn bishop_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::NorthEast)
        | positive_ray_attacks(sq, occupancy, Direction::NorthWest)
        | negative_ray_attacks(sq, occupancy, Direction::SouthEast)
        | negative_ray_attacks(sq, occupancy, Direction::SouthWest)
}

pub fn rook_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    positive_ray_attacks(sq, occupancy, Direction::North)
        | positive_ray_attacks(sq, occupancy, Direction::East)
        | negative_ray_attacks(sq, occupancy, Direction::South)
        | negative_ray_attacks(sq, occupancy, Direction::West)
}

pub fn queen_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

pub fn attacks(kind: PieceKind, color: Color, sq: Square, occupancy: SquareSet) -> SquareSet {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupancy),
        PieceKind::Rook => rook_attacks(sq, occupancy),
        PieceKind::Queen => queen_attacks(sq, occupancy),
        PieceKind::King => king_attacks(sq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;

    #[test]
    fn king_center_and_corner() {
        assert_eq!(8, king_attacks(E4).len());
        assert_eq!(3, king_attacks(A1).len());
        assert!(king_attacks(A1).contains(A2));
        assert!(king_attacks(A1).contains(B1));
        assert!(king_attacks(A1).contains(B2));
    }

    #[test]
    fn knight_center_and_corner() {
        assert_eq!(8, knight_attacks(E4).len());
        assert_eq!(2, knight_attacks(A1).len());
        assert!(knight_attacks(A1).contains(B3));
        assert!(knight_attacks(A1).contains(C2));
    }

    #[test]
    fn knight_does_not_wrap_files() {
        // A knight on the h-file must not produce attacks on the a-file.
        assert!(!knight_attacks(H4).contains(A4));
        assert!(!knight_attacks(H4).contains(A5));
        assert_eq!(4, knight_attacks(H4).len());
    }

    #[test]
    fn pawn_attacks_are_diagonal_only() {
        let white = pawn_attacks(E4, Color::White);
        assert_eq!(2, white.len());
        assert!(white.contains(D5));
        assert!(white.contains(F5));
        assert!(!white.contains(E5));

        let black = pawn_attacks(E4, Color::Black);
        assert_eq!(2, black.len());
        assert!(black.contains(D3));
        assert!(black.contains(F3));
    }

    #[test]
    fn pawn_edge_files() {
        let white = pawn_attacks(A2, Color::White);
        assert_eq!(1, white.len());
        assert!(white.contains(B3));

        let black = pawn_attacks(H7, Color::Black);
        assert_eq!(1, black.len());
        assert!(black.contains(G6));
    }

    #[test]
    fn rook_open_board() {
        assert_eq!(14, rook_attacks(E4, SquareSet::empty()).len());
    }

    #[test]
    fn rook_blocker_included() {
        // A blocker is included in the attack set; squares past it are not.
        let occ = SquareSet::unit(E6);
        let attacks = rook_attacks(E4, occ);
        assert!(attacks.contains(E5));
        assert!(attacks.contains(E6));
        assert!(!attacks.contains(E7));
        assert!(!attacks.contains(E8));
    }

    #[test]
    fn bishop_blocker_included() {
        let occ = SquareSet::unit(C6);
        let attacks = bishop_attacks(E4, occ);
        assert!(attacks.contains(D5));
        assert!(attacks.contains(C6));
        assert!(!attacks.contains(B7));
        assert!(attacks.contains(H1));
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        let occ = SquareSet::unit(C4) | SquareSet::unit(G6);
        let expected = rook_attacks(D4, occ) | bishop_attacks(D4, occ);
        assert_eq!(expected, queen_attacks(D4, occ));
    }
}
