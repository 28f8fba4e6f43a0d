// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use structopt::StructOpt;

use arbiter::{analysis, movegen, Position};

/// Prints the legal moves and the game status of a position.
#[derive(Debug, StructOpt)]
struct Options {
    /// FEN representation of the position to analyze.
    #[structopt(name = "FEN")]
    fen: String,
}

fn main() -> anyhow::Result<()> {
    let ops = Options::from_args();
    let pos = Position::from_fen(&ops.fen).context("parsing FEN")?;
    for mov in movegen::all_legal_moves(&pos) {
        println!("{}", mov.as_text());
    }

    println!("status: {}", analysis::game_status(&pos));
    Ok(())
}
