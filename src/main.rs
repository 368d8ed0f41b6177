use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use snake_autopilot::game::SnakeGame;
use snake_autopilot::navigator::DEFAULT_FILL_LIMIT;
use snake_autopilot::{Navigator, Phase, Session, SessionConfig, ShortcutPolicy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Take the first neighbour that gets closer to the food.
    First,
    /// Take the neighbour that gets closest to the food.
    Greedy,
}

impl From<Policy> for ShortcutPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::First => ShortcutPolicy::FirstImproving,
            Policy::Greedy => ShortcutPolicy::Greedy,
        }
    }
}

/// Snake that plays itself along a Hamiltonian cycle.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Grid width in cells (even, at least 4).
    #[arg(long, default_value_t = 18)]
    width: u16,
    /// Grid height in cells (even, at least 4).
    #[arg(long, default_value_t = 18)]
    height: u16,
    /// Initial body length.
    #[arg(long, default_value_t = 3)]
    length: u16,
    /// RNG seed; a random one is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds between moves in interactive mode.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Body share of the grid at which shortcuts stop.
    #[arg(long, default_value_t = DEFAULT_FILL_LIMIT)]
    fill_limit: f64,
    #[arg(long, value_enum, default_value_t = Policy::First)]
    policy: Policy,
    /// Play without a terminal UI and print one line per game.
    #[arg(long)]
    headless: bool,
    /// Games to play in headless mode.
    #[arg(long, default_value_t = 1)]
    games: u32,
    /// Give up on a headless game after this many moves.
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,
    /// Write logs here (interactive mode never logs to the terminal).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = SessionConfig {
        width: args.width,
        height: args.height,
        initial_length: args.length,
        navigator: Navigator::new(args.fill_limit, args.policy.into()),
    };
    let session = Session::new(config, seed).context("starting session")?;
    info!(seed, ?config, "starting");

    if args.headless {
        return run_headless(session, args.games, args.max_ticks);
    }

    let mut game = SnakeGame::new(session, Duration::from_millis(args.tick_ms));
    game.initialize()?;
    let res = game.play();
    game.restore()?;
    res
}

fn run_headless(mut session: Session, games: u32, max_ticks: u64) -> Result<()> {
    let mut wins = 0;

    for game in 1..=games {
        if game > 1 {
            session.respawn()?;
        }

        let phase = session.play_out(max_ticks)?;
        if phase == Phase::Won {
            wins += 1;
        } else {
            warn!(game, ?phase, "game did not fill the grid");
        }

        println!(
            "game {}: {:?} score {} length {}/{} in {} moves",
            game,
            phase,
            session.score(),
            session.snake().len(),
            session.tour().len(),
            session.ticks()
        );
    }

    println!("{}/{} games filled the grid", wins, games);
    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();

    match (&args.log_file, args.headless) {
        (Some(path), _) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("installing log subscriber")?;
        }
        (None, true) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|err| anyhow!(err))
                .context("installing log subscriber")?;
        }
        // Anything written to the terminal would tear through the board.
        (None, false) => {}
    }

    Ok(())
}
