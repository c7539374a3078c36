use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::Context;
use arcade_grid::autoplay::{play_snake, play_twenty48};
use arcade_grid::config::{ArcadeConfig, Twenty48Config};
use arcade_grid::engine::{Game, SCORE_KEY};
use arcade_grid::scores::{JsonFileStore, MemoryStore, ScoreStore};
use arcade_grid::snake::{Mode, SnakeGame, Tick};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "arcade-grid", about = "Headless runs of the 2048 and Snake engines")]
struct Args {
    /// TOML config file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Play one 2048 game with the corner-priority policy
    Twenty48 {
        /// RNG seed; random when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many accepted moves
        #[arg(long)]
        max_moves: Option<u64>,
        /// Record the final score in this JSON score file
        #[arg(long)]
        scores: Option<PathBuf>,
        /// Only print the final board
        #[arg(long)]
        quiet: bool,
    },
    /// Play one snake round with the greedy food-seeking policy
    Snake {
        #[arg(long)]
        seed: Option<u64>,
        /// classic, zen or powerup
        #[arg(long, default_value = "classic")]
        mode: Mode,
        /// Stop after this many ticks
        #[arg(long, default_value_t = 5_000)]
        ticks: u64,
        #[arg(long)]
        scores: Option<PathBuf>,
    },
    /// Run many 2048 games in parallel and report score statistics
    Simulate {
        #[arg(long, default_value_t = 1_000)]
        games: u64,
        /// Base seed; game `i` uses `seed + i`
        #[arg(long)]
        seed: Option<u64>,
        /// Suppress the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => ArcadeConfig::from_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ArcadeConfig::default(),
    };

    match args.cmd {
        Cmd::Twenty48 { seed, max_moves, scores, quiet } => {
            let mut store = open_store(scores.or_else(|| cfg.scores.path.clone()));
            run_twenty48(&cfg, seed, max_moves, quiet, store.as_mut())
        }
        Cmd::Snake { seed, mode, ticks, scores } => {
            let mut store = open_store(scores.or_else(|| cfg.scores.path.clone()));
            run_snake(&cfg, seed, mode, ticks, store.as_mut())
        }
        Cmd::Simulate { games, seed, quiet } => run_simulation(&cfg.twenty48, games, seed, quiet),
    }
}

fn open_store(path: Option<PathBuf>) -> Box<dyn ScoreStore> {
    match path {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    info!("seed {seed}");
    StdRng::seed_from_u64(seed)
}

fn run_twenty48(
    cfg: &ArcadeConfig,
    seed: Option<u64>,
    max_moves: Option<u64>,
    quiet: bool,
    store: &mut dyn ScoreStore,
) -> anyhow::Result<()> {
    let mut rng = seeded(seed);
    let best = store.load(SCORE_KEY, cfg.scores.capacity).best();
    let mut game = Game::new(cfg.twenty48.clone(), &mut rng).with_best(best);
    if !quiet {
        println!("{}", game.grid());
    }

    let run = play_twenty48(&mut game, &mut rng, max_moves, |dir, applied, game| {
        if !quiet {
            println!("{dir}: +{}{}", applied.score_delta, game.grid());
        }
    });

    if quiet {
        println!("{}", game.grid());
    }
    println!(
        "Moves: {} | score: {} | highest tile: {} | won: {} | over: {} | simulated time: {:.1}s",
        run.steps,
        game.score(),
        game.grid().highest_tile(),
        game.is_won(),
        run.finished,
        run.elapsed.as_secs_f64()
    );
    if run.finished {
        if let Err(e) = game.record_score(store, cfg.scores.capacity) {
            warn!("could not save score: {e}");
        }
    }
    Ok(())
}

fn run_snake(
    cfg: &ArcadeConfig,
    seed: Option<u64>,
    mode: Mode,
    ticks: u64,
    store: &mut dyn ScoreStore,
) -> anyhow::Result<()> {
    let mut rng = seeded(seed);
    let mut game = SnakeGame::new(cfg.snake.clone(), mode, &mut rng);

    let mut eaten = 0u64;
    let run = play_snake(&mut game, &mut rng, ticks, |tick| match tick {
        Tick::Ate(_) => eaten += 1,
        Tick::Crashed(crash) => println!("crashed: {crash:?}"),
        Tick::Moved | Tick::Skipped => {}
    });

    println!(
        "Mode: {} | ticks: {} | food: {} | length: {} | score: {} | simulated time: {:.1}s",
        mode,
        run.steps,
        eaten,
        game.len(),
        game.score(),
        run.elapsed.as_secs_f64()
    );
    if run.finished {
        if let Err(e) = game.record_score(store, cfg.scores.capacity) {
            warn!("could not save score: {e}");
        }
    }
    Ok(())
}

struct Outcome {
    score: u64,
    won: bool,
}

fn play_out(rules: &Twenty48Config, seed: u64) -> Outcome {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(rules.clone(), &mut rng);
    play_twenty48(&mut game, &mut rng, None, |_, _, _| {});
    Outcome { score: game.score(), won: game.is_won() }
}

fn run_simulation(rules: &Twenty48Config, games: u64, seed: Option<u64>, quiet: bool) -> anyhow::Result<()> {
    let base = seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let start = Instant::now();
    let done = AtomicU64::new(0);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} games | {elapsed_precise} | {msg}")?,
        );
        pb
    };

    let outcomes: Vec<Outcome> = (0..games)
        .into_par_iter()
        .map(|i| {
            let outcome = play_out(rules, base.wrapping_add(i));
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            if n % 64 == 0 {
                let rate = n as f64 / start.elapsed().as_secs_f64().max(1e-6);
                pb.set_message(format!("games/sec: {rate:.1}"));
            }
            pb.inc(1);
            outcome
        })
        .collect();
    pb.finish_and_clear();

    if outcomes.is_empty() {
        println!("No games played");
        return Ok(());
    }
    let total: u64 = outcomes.iter().map(|o| o.score).sum();
    let max = outcomes.iter().map(|o| o.score).max().unwrap_or(0);
    let wins = outcomes.iter().filter(|o| o.won).count();
    let n = outcomes.len() as f64;
    println!(
        "Games: {} | mean score: {:.1} | max score: {} | win rate: {:.2}% | {:.2}s",
        outcomes.len(),
        total as f64 / n,
        max,
        100.0 * wins as f64 / n,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
