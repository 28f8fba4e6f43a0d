// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use arbiter::core::{self, Color, Move};
use arbiter::movegen;
use arbiter::Position;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b KQkq a3 0 1";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("fen-parse", |b| {
        b.iter(|| Position::from_fen(black_box(KIWIPETE)).unwrap());
    });

    c.bench_function("quiet-move-apply", |b| {
        let pos = Position::from_fen("8/8/4b3/8/2B5/8/8/8 w - - 0 1").unwrap();
        let mov = Move::quiet(core::C4, core::D5);
        b.iter(|| black_box(&pos).apply(black_box(mov)).unwrap());
    });

    c.bench_function("pawn-movegen", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        b.iter(|| {
            let mut moves = Vec::new();
            movegen::generate_pawn_moves(black_box(Color::Black), black_box(&pos), &mut moves);
        });
    });

    c.bench_function("kiwipete-movegen-all", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        b.iter(|| {
            let mut moves = Vec::new();
            movegen::generate_moves(black_box(Color::Black), black_box(&pos), &mut moves);
        });
    });

    c.bench_function("kiwipete-legal-moves", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        b.iter(|| movegen::all_legal_moves(black_box(&pos)));
    });

    c.bench_function("startpos-perft-3", |b| {
        let pos = Position::from_start_position();
        b.iter(|| movegen::perft(black_box(&pos), 3));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
