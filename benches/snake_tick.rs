use arcade_grid::autoplay::snake_move;
use arcade_grid::config::SnakeConfig;
use arcade_grid::snake::{Mode, SnakeGame, Tick};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn bench_tick(c: &mut Criterion) {
    for mode in [Mode::Classic, Mode::Zen, Mode::PowerUp] {
        c.bench_function(&format!("snake/tick_{mode}"), |bch| {
            bch.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(11);
                    let mut game = SnakeGame::new(SnakeConfig::default(), mode, &mut rng);
                    game.turn(snake_move(&game));
                    (game, rng)
                },
                |(mut game, mut rng)| {
                    for _ in 0..256 {
                        game.turn(snake_move(&game));
                        if let Tick::Crashed(_) = game.tick(&mut rng) {
                            break;
                        }
                    }
                    black_box(game.score())
                },
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(snake_tick, bench_tick);
criterion_main!(snake_tick);
