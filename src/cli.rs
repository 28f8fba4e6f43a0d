// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A line-oriented driver for interactive use and for harnessing by other
//! programs. The driver holds one current position; commands inspect it or
//! replace it with the position a move produces.

use std::io::{self, BufRead};

use anyhow::{anyhow, bail, Context};

use crate::{
    analysis,
    core::{Move, Square},
    movegen, Position,
};

pub fn run() -> io::Result<()> {
    let mut position = Position::from_start_position();
    let stdin = io::stdin();
    let locked_stdin = stdin.lock();
    for maybe_line in locked_stdin.lines() {
        let line = maybe_line?;
        let components: Vec<_> = line.split_whitespace().collect();
        let (&command, arguments) = components.split_first().unwrap_or((&"", &[]));
        match (command, arguments) {
            ("", []) => {}
            ("position", args) => {
                if let Err(e) = handle_position(&mut position, args) {
                    println!("invalid position command: {:#}", e);
                }
            }
            ("move", args) => {
                if let Err(e) = handle_move(&mut position, args) {
                    println!("invalid move command: {:#}", e);
                }
            }
            ("moves", args) => {
                if let Err(e) = handle_moves(&position, args) {
                    println!("invalid moves command: {:#}", e);
                }
            }
            ("targets", args) => {
                if let Err(e) = handle_targets(&position, args) {
                    println!("invalid targets command: {:#}", e);
                }
            }
            ("perft", args) => {
                if let Err(e) = handle_perft(&position, args) {
                    println!("invalid perft command: {:#}", e);
                }
            }
            ("status", []) => println!("{}", analysis::game_status(&position)),
            ("fen", []) => println!("{}", position.as_fen()),
            ("show", []) => print!("{}", position),
            ("quit", []) => break,
            _ => println!("unrecognized command: {} {:?}", command, arguments),
        }
    }

    Ok(())
}

fn handle_position(position: &mut Position, args: &[&str]) -> anyhow::Result<()> {
    let (&kind, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("expected 'startpos' or 'fen'"))?;
    let mut next = match kind {
        "startpos" => (Position::from_start_position(), rest),
        "fen" => {
            // A FEN string is itself whitespace-separated; it is the next
            // six tokens.
            if rest.len() < 6 {
                bail!("FEN string expected");
            }

            let (fen_tokens, rest) = rest.split_at(6);
            let pos = Position::from_fen(fen_tokens.join(" ")).context("parsing FEN")?;
            (pos, rest)
        }
        tok => bail!("unknown token: {}", tok),
    };

    // An optional trailing move list plays out from the given position.
    if let Some((&"moves", move_texts)) = next.1.split_first() {
        for text in move_texts {
            let mov = Move::from_text(&next.0, text)
                .ok_or_else(|| anyhow!("unparseable move: {}", text))?;
            next.0 = next
                .0
                .apply(mov)
                .with_context(|| format!("applying move {}", text))?;
        }
    } else if !next.1.is_empty() {
        bail!("unknown token: {}", next.1[0]);
    }

    *position = next.0;
    Ok(())
}

fn handle_move(position: &mut Position, args: &[&str]) -> anyhow::Result<()> {
    let text = match args {
        [text] => text,
        _ => bail!("expected a single move"),
    };

    let mov =
        Move::from_text(position, text).ok_or_else(|| anyhow!("unparseable move: {}", text))?;
    *position = position.apply(mov)?;
    println!("{}", position.as_fen());
    Ok(())
}

fn handle_moves(position: &Position, args: &[&str]) -> anyhow::Result<()> {
    let moves = match args {
        [] => movegen::all_legal_moves(position),
        [square] => {
            let square: Square = square.parse().context("parsing square")?;
            movegen::legal_moves_from(position, square)?
        }
        _ => bail!("expected at most one square"),
    };

    for mov in moves {
        println!("{}", mov.as_text());
    }

    Ok(())
}

fn handle_targets(position: &Position, args: &[&str]) -> anyhow::Result<()> {
    let square: Square = match args {
        [square] => square.parse().context("parsing square")?,
        _ => bail!("expected a single square"),
    };

    for target in movegen::legal_targets(position, square)? {
        println!("{}", target);
    }

    Ok(())
}

fn handle_perft(position: &Position, args: &[&str]) -> anyhow::Result<()> {
    let depth: u32 = match args {
        [depth] => depth.parse().context("parsing depth")?,
        _ => bail!("expected a single depth"),
    };

    println!("{}", movegen::perft(position, depth));
    Ok(())
}
