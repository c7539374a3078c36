use arcade_grid::config::Twenty48Config;
use arcade_grid::engine::{reconstruct, Game, Grid, Move, Submit};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use std::time::Duration;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grids = vec![Grid::EMPTY];
    let mut g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    grids.push(g);
    // a spread of densities, reached deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..40 {
        let res = g.shift(seq[i % seq.len()]);
        if res.moved {
            g = res.grid.with_random_tile(&mut rng);
        }
        grids.push(g);
    }
    grids
}

fn bench_shift(c: &mut Criterion) {
    for dir in Move::ALL {
        c.bench_function(&format!("shift/{dir}"), |bch| {
            let grids = corpus();
            bch.iter(|| {
                let mut acc = 0u64;
                for &g in &grids {
                    acc = acc.wrapping_add(g.shift(dir).score);
                }
                black_box(acc)
            })
        });
    }
}

fn bench_provenance(c: &mut Criterion) {
    c.bench_function("movement/reconstruct", |bch| {
        let pairs: Vec<(Grid, Grid)> = corpus().into_iter().map(|g| (g, g.shift(Move::Left).grid)).collect();
        bch.iter(|| {
            let mut acc = 0usize;
            for &(before, after) in &pairs {
                acc += reconstruct(before, after, Move::Left).len();
            }
            black_box(acc)
        })
    });
}

fn bench_session(c: &mut Criterion) {
    c.bench_function("grid/make_move_left", |bch| {
        bch.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(9);
                let g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
                (g, rng)
            },
            |(mut g, mut rng)| {
                for _ in 0..64 {
                    g = g.make_move(Move::Left, &mut rng).0;
                }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("game/submit_settle", |bch| {
        bch.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(3);
                let game = Game::new(Twenty48Config::default(), &mut rng);
                (game, rng)
            },
            |(mut game, mut rng)| {
                let mut now = Duration::ZERO;
                for i in 0..64 {
                    if let Submit::Applied(a) = game.submit(Move::ALL[i % 4], now) {
                        now = a.settle_at;
                        game.settle(now, &mut rng);
                    }
                }
                black_box(game.score())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(engine_ops, bench_shift, bench_provenance, bench_session);
criterion_main!(engine_ops);
