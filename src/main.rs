use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use slide_2048::config::Config;
use slide_2048::game::Game;
use slide_2048::input;
use slide_2048::store::{FileStore, PrefStore};
use slide_2048::tui::{Session, TerminalDriver};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "slide2048", about = "Play 2048 in the terminal")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preferences file (best score, theme); overrides the config
    #[arg(long)]
    store: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// tracing filter, e.g. "info", "debug"
    #[arg(long)]
    log: Option<String>,

    /// Log destination; stdout belongs to the game screen
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Line-oriented mode: read one command per stdin line, print text frames
    #[arg(long)]
    plain: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => Config::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(path) = args.store { cfg.store.path = path; }
    if let Some(seed) = args.seed { cfg.game.seed = Some(seed); }
    if let Some(filter) = args.log { cfg.log.filter = filter; }
    if let Some(file) = args.log_file { cfg.log.file = file; }

    init_tracing(&cfg)?;

    let seed = cfg.game.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, store = %cfg.store.path.display(), "starting");
    let game = Game::new(StdRng::seed_from_u64(seed), FileStore::new(&cfg.store.path));
    let session = Session::new(game);

    if args.plain {
        run_plain(session)
    } else {
        let session = TerminalDriver::new(session).run().context("terminal driver failed")?;
        println!("Final score: {} | Best: {}", session.game().score(), session.game().best_score());
        Ok(())
    }
}

fn init_tracing(cfg: &Config) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log.file)
        .with_context(|| format!("opening log file {}", cfg.log.file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&cfg.log.filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_plain<R: Rng, S: PrefStore>(mut session: Session<R, S>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "{}", session.frame())?;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = input::command_for_word(&line) else {
            writeln!(stdout, "Unknown command: {:?}", line.trim())?;
            continue;
        };
        if !session.handle(command) {
            break;
        }
        write!(stdout, "{}", session.frame())?;
    }
    writeln!(stdout, "Final score: {} | Best: {}", session.game().score(), session.game().best_score())?;
    Ok(())
}
