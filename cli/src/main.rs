//! # Sliding-Tile CLI
//!
//! Command-line front end for the board engine: play interactively in the
//! terminal, or run headless simulations with a fixed policy.

mod input;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use tile_slide_core::{
    BoardEngine, Direction, EngineConfig, GameResult, Grid, SpawnPolicy, Tile, BOARD_SIZE,
    MIN_BOARD_SIZE,
};

use input::{parse_input, InputAction, RawMode};

const HEADER: &str = "=== 2048 ===\nControls: WASD or Arrow Keys | Q to quit | R to restart\n";

#[derive(Parser, Debug)]
#[command(name = "tile-slide")]
#[command(author, version, about = "Play the sliding-tile merge puzzle in the terminal or run simulations")]
struct Args {
    /// Board side length
    #[arg(long, default_value_t = BOARD_SIZE, value_parser = parse_size)]
    size: usize,

    /// Random seed for deterministic runs (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of episodes to run in headless mode
    #[arg(short, long)]
    episodes: Option<u32>,

    /// Maximum moves per episode (0 = unlimited)
    #[arg(short, long, default_value_t = 10_000)]
    max_steps: u32,

    /// Policy for headless mode
    #[arg(short, long, value_enum, default_value = "random")]
    policy: Policy,

    /// Replay a fixed move list (e.g. up,left,left) instead of playing
    #[arg(long, value_delimiter = ',', value_name = "DIRECTIONS")]
    moves: Option<Vec<Direction>>,

    /// Show board after each move in headless mode
    #[arg(long)]
    verbose: bool,

    /// Spawn a tile after every input, even one that moved nothing
    #[arg(long)]
    legacy_spawn: bool,

    /// Disable tile colours
    #[arg(long)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Random legal moves
    Random,
    /// Cycle through directions: Left, Down, Right, Up
    Cycle,
}

fn parse_size(value: &str) -> std::result::Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a board size", value))?;
    if size < MIN_BOARD_SIZE {
        return Err(format!("board size must be at least {}", MIN_BOARD_SIZE));
    }
    Ok(size)
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            spawn_policy: if self.legacy_spawn {
                SpawnPolicy::Always
            } else {
                SpawnPolicy::OnChange
            },
            ..EngineConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    debug!("using seed {}", seed);

    if let Some(moves) = &args.moves {
        run_replay(&args, seed, moves)
    } else if let Some(episodes) = args.episodes {
        run_headless(&args, seed, episodes)
    } else {
        run_interactive(&args, seed)
    }
}

/// Run interactive mode where the user plays with the keyboard.
fn run_interactive(args: &Args, seed: u64) -> Result<()> {
    let _raw = RawMode::enable()?;
    let color = !args.no_color;

    let mut engine = BoardEngine::with_config(seed, args.engine_config());
    engine.start(args.size);
    let mut stdin = io::stdin();
    let mut buffer = [0u8; 3];

    draw(&engine, color, None)?;

    loop {
        let bytes_read = stdin.read(&mut buffer).context("failed to read key")?;
        if bytes_read == 0 {
            break;
        }

        match parse_input(&buffer[..bytes_read]) {
            InputAction::Move(dir) => {
                if !engine.is_continuing() {
                    continue;
                }
                let result = engine.event(dir);
                let status = (!result.continuation).then_some(
                    "\n  *** GAME OVER ***\n\n  Press R to restart or Q to quit",
                );
                draw(&engine, color, status)?;
            }
            InputAction::Restart => {
                engine.start(args.size);
                draw(&engine, color, None)?;
            }
            InputAction::Quit => {
                println!("\nGoodbye!");
                break;
            }
            InputAction::None => {}
        }
    }

    Ok(())
}

fn draw(engine: &BoardEngine, color: bool, status: Option<&str>) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "\x1b[2J\x1b[H")?;
    writeln!(stdout, "{}", HEADER)?;
    write!(stdout, "{}", render::render(engine.grid(), color))?;
    writeln!(stdout, "  Max Tile: {}", engine.max_tile())?;
    if let Some(status) = status {
        writeln!(stdout, "{}", status)?;
    }
    stdout.flush().context("failed to flush stdout")
}

/// Play `moves` in order from a fresh seeded game, stopping early on game over.
fn replay(args: &Args, seed: u64, moves: &[Direction]) -> (Grid, Vec<(Direction, GameResult)>) {
    let mut engine = BoardEngine::with_config(seed, args.engine_config());
    let initial = engine.start(args.size).clone();
    let mut steps = Vec::with_capacity(moves.len());

    for &dir in moves {
        let result = engine.event(dir);
        let finished = !result.continuation;
        steps.push((dir, result));
        if finished {
            break;
        }
    }

    (initial, steps)
}

fn run_replay(args: &Args, seed: u64, moves: &[Direction]) -> Result<()> {
    let color = !args.no_color;
    let (initial, steps) = replay(args, seed, moves);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "seed={}", seed)?;
    write!(stdout, "{}", render::render(&initial, color))?;
    for (i, (dir, result)) in steps.iter().enumerate() {
        writeln!(stdout, "Move {}: {} changed={}", i + 1, dir, result.changed)?;
        write!(stdout, "{}", render::render(&result.grid, color))?;
    }

    let continuation = steps.last().map_or(initial.is_continuing(), |(_, r)| r.continuation);
    if steps.len() < moves.len() {
        writeln!(stdout, "game over after {} of {} moves", steps.len(), moves.len())?;
    }
    writeln!(stdout, "continuation={}", continuation)?;
    stdout.flush().context("failed to flush stdout")
}

/// Outcome of one headless game.
#[derive(Debug, Clone, Copy)]
struct Episode {
    moves: u32,
    max_tile: Tile,
}

/// Run headless simulation mode.
fn run_headless(args: &Args, seed: u64, episodes: u32) -> Result<()> {
    if episodes == 0 {
        anyhow::bail!("--episodes must be at least 1");
    }

    // Separate RNG for move selection
    let mut policy_rng = StdRng::seed_from_u64(seed.wrapping_add(1000));
    let mut results = Vec::with_capacity(episodes as usize);

    for episode in 0..episodes {
        let episode_seed = seed.wrapping_add(episode as u64);
        let outcome = play_episode(args, episode_seed, &mut policy_rng);
        info!(
            "episode {}: moves={} max_tile={}",
            episode + 1,
            outcome.moves,
            outcome.max_tile
        );
        if args.verbose {
            println!(
                "Episode {}: Moves={}, MaxTile={}",
                episode + 1,
                outcome.moves,
                outcome.max_tile
            );
        }
        results.push(outcome);
    }

    print_summary(args, seed, &results);
    Ok(())
}

fn play_episode(args: &Args, seed: u64, rng: &mut StdRng) -> Episode {
    let mut engine = BoardEngine::with_config(seed, args.engine_config());
    engine.start(args.size);
    let mut moves = 0;
    let mut cycle = 0;

    while engine.is_continuing() && (args.max_steps == 0 || moves < args.max_steps) {
        let choice = match args.policy {
            Policy::Random => select_random_direction(&engine, rng),
            Policy::Cycle => select_cycle_direction(&engine, &mut cycle),
        };
        let Some(dir) = choice else {
            break;
        };

        engine.event(dir);
        moves += 1;

        if args.verbose {
            println!("Move {}: {}", moves, dir);
            print!("{}", render::render(engine.grid(), false));
        }
    }

    Episode {
        moves,
        max_tile: engine.max_tile(),
    }
}

fn print_summary(args: &Args, seed: u64, results: &[Episode]) {
    let count = results.len().max(1);
    let total_moves: u64 = results.iter().map(|e| e.moves as u64).sum();
    let min_moves = results.iter().map(|e| e.moves).min().unwrap_or(0);
    let max_moves = results.iter().map(|e| e.moves).max().unwrap_or(0);
    let max_tile_overall = results.iter().map(|e| e.max_tile).max().unwrap_or(0);

    let mut distribution: BTreeMap<Tile, u32> = BTreeMap::new();
    for episode in results {
        *distribution.entry(episode.max_tile).or_insert(0) += 1;
    }

    // Output results in parseable format
    println!("=== Simulation Results ===");
    println!("episodes={}", results.len());
    println!("size={}", args.size);
    println!("policy={:?}", args.policy);
    println!("seed={}", seed);
    println!("max_steps={}", args.max_steps);
    println!("avg_moves={:.2}", total_moves as f64 / count as f64);
    println!("min_moves={}", min_moves);
    println!("max_moves={}", max_moves);
    println!("max_tile_overall={}", max_tile_overall);
    let tiles: Vec<String> = distribution
        .iter()
        .map(|(tile, n)| format!("{}:{}", tile, n))
        .collect();
    println!("tile_distribution={}", tiles.join(","));
}

/// Pick uniformly among the directions that change the board.
fn select_random_direction(engine: &BoardEngine, rng: &mut StdRng) -> Option<Direction> {
    engine.legal_directions().choose(rng).copied()
}

/// Try Left, Down, Right, Up in turn, resuming where the last pick left off.
fn select_cycle_direction(engine: &BoardEngine, cycle: &mut usize) -> Option<Direction> {
    const ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Up,
    ];

    for _ in 0..ORDER.len() {
        let dir = ORDER[*cycle % ORDER.len()];
        *cycle += 1;
        if engine.can_move(dir) {
            return Some(dir);
        }
    }

    None
}
