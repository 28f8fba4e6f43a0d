// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::ops;

use crate::core::{self, Direction, File, Rank, Square};

/// A set of squares on the chessboard, stored as a 64-bit mask with one bit
/// per square. The API is modeled after [`std::collections::HashSet`] but the
/// representation is chosen so that whole-board operations stay cheap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SquareSet(u64);

impl SquareSet {
    /// Creates a new, empty SquareSet.
    pub const fn empty() -> SquareSet {
        SquareSet(0)
    }

    /// Creates a new SquareSet with all squares present in the set.
    pub const fn all() -> SquareSet {
        SquareSet(u64::MAX)
    }

    /// Creates a SquareSet containing the single given square.
    pub const fn unit(square: Square) -> SquareSet {
        SquareSet(1u64 << square.0)
    }

    /// Tests whether or not the given square is contained within this SquareSet.
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1u64 << square.0) != 0
    }

    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square.0;
    }

    pub fn remove(&mut self, square: Square) {
        self.0 &= !(1u64 << square.0);
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn and(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 & other.0)
    }

    pub const fn or(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 | other.0)
    }

    pub const fn not(self) -> SquareSet {
        SquareSet(!self.0)
    }

    pub const fn xor(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 ^ other.0)
    }

    /// Restricts this set to squares on the given rank.
    pub const fn rank(self, rank: Rank) -> SquareSet {
        SquareSet(self.0 & (0xFFu64 << (rank.as_u8() * 8)))
    }

    /// Restricts this set to squares on the given file.
    pub const fn file(self, file: File) -> SquareSet {
        SquareSet(self.0 & (SS_FILE_A.0 << file.as_u8()))
    }

    /// Shifts all squares in the SquareSet one square in the given direction.
    /// Squares shifted off of the board are dropped.
    pub const fn shift(self, direction: Direction) -> SquareSet {
        match direction {
            Direction::North => SquareSet(self.0 << 8),
            Direction::NorthEast => SquareSet(self.and(SS_FILE_H.not()).0 << 9),
            Direction::East => SquareSet(self.and(SS_FILE_H.not()).0 << 1),
            Direction::SouthEast => SquareSet(self.and(SS_FILE_H.not()).0 >> 7),
            Direction::South => SquareSet(self.0 >> 8),
            Direction::SouthWest => SquareSet(self.and(SS_FILE_A.not()).0 >> 9),
            Direction::West => SquareSet(self.and(SS_FILE_A.not()).0 >> 1),
            Direction::NorthWest => SquareSet(self.and(SS_FILE_A.not()).0 << 7),
        }
    }

    pub const fn bits(self) -> u64 {
        self.0
    }
}

impl ops::BitOr for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl ops::BitAnd for SquareSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(rhs)
    }
}

impl ops::BitXor for SquareSet {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.xor(rhs)
    }
}

impl ops::Not for SquareSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.not()
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIterator;

    fn into_iter(self) -> Self::IntoIter {
        SquareSetIterator(self.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> SquareSet {
        let mut set = SquareSet::empty();
        for sq in iter {
            set.insert(sq);
        }

        set
    }
}

impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in core::ranks().rev() {
            for file in core::files() {
                let sq = Square::of(rank, file);
                if self.contains(sq) {
                    write!(f, " 1 ")?;
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

pub const SS_RANK_1: SquareSet = SquareSet::all().rank(core::RANK_1);
pub const SS_RANK_2: SquareSet = SquareSet::all().rank(core::RANK_2);
pub const SS_RANK_3: SquareSet = SquareSet::all().rank(core::RANK_3);
pub const SS_RANK_4: SquareSet = SquareSet::all().rank(core::RANK_4);
pub const SS_RANK_5: SquareSet = SquareSet::all().rank(core::RANK_5);
pub const SS_RANK_6: SquareSet = SquareSet::all().rank(core::RANK_6);
pub const SS_RANK_7: SquareSet = SquareSet::all().rank(core::RANK_7);
pub const SS_RANK_8: SquareSet = SquareSet::all().rank(core::RANK_8);
pub const SS_FILE_A: SquareSet = SquareSet(0x0101010101010101);
pub const SS_FILE_B: SquareSet = SquareSet(SS_FILE_A.0 << 1);
pub const SS_FILE_C: SquareSet = SquareSet(SS_FILE_A.0 << 2);
pub const SS_FILE_D: SquareSet = SquareSet(SS_FILE_A.0 << 3);
pub const SS_FILE_E: SquareSet = SquareSet(SS_FILE_A.0 << 4);
pub const SS_FILE_F: SquareSet = SquareSet(SS_FILE_A.0 << 5);
pub const SS_FILE_G: SquareSet = SquareSet(SS_FILE_A.0 << 6);
pub const SS_FILE_H: SquareSet = SquareSet(SS_FILE_A.0 << 7);

/// An iterator over the squares stored in a [`SquareSet`], yielded in
/// ascending square order.
pub struct SquareSetIterator(u64);

impl Iterator for SquareSetIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let next = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            Some(Square(next))
        }
    }
}
