// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! arbiter is a rules core for two-player chess. It knows how to read and
//! write positions as FEN, enumerate the legal moves of a position, apply a
//! move to produce a new position, and classify a position as ongoing,
//! check, checkmate, or stalemate. It has no opinions about which move is
//! best; it only answers what is allowed.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod movegen;
pub mod position;

pub use position::Position;
