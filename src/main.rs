use anyhow::{Context, Result, anyhow};
use arcade_snake::feedback::TerminalFeedback;
use arcade_snake::game::{GameConfig, GameEngine, GameMode};
use arcade_snake::modes::PlayMode;
use arcade_snake::settings::JsonFileStore;
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;

#[derive(Parser)]
#[command(name = "arcade_snake")]
#[command(version, about = "Arcade Snake with power-ups, obstacles and game modes")]
struct Cli {
    /// Game mode; remembered for later sessions
    #[arg(long)]
    mode: Option<Mode>,

    /// Grid width
    #[arg(long, default_value = "12")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "20")]
    height: usize,

    /// Settings file (sound, vibration, skin, mode, high score)
    #[arg(long, default_value = "saves/settings.json")]
    settings: PathBuf,

    /// Seed for reproducible food and obstacle placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Speed up with every food
    Classic,
    /// Score as much as possible in 60 seconds
    TimeAttack,
    /// The snake never grows; more obstacles
    Survival,
    /// Slow and obstacle free
    Zen,
}

impl From<Mode> for GameMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Classic => GameMode::Classic,
            Mode::TimeAttack => GameMode::TimeAttack,
            Mode::Survival => GameMode::Survival,
            Mode::Zen => GameMode::Zen,
        }
    }
}

/// The terminal belongs to the TUI, so logs only go to a file
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };

    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // Create game configuration from CLI arguments
    let config = GameConfig::new(cli.width, cli.height);
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, seed),
        None => GameEngine::new(config),
    };
    let store = JsonFileStore::new(cli.settings.clone());
    let feedback = TerminalFeedback::new(std::io::stdout());

    let mut play_mode = PlayMode::new(engine, store, feedback)?;
    if let Some(mode) = cli.mode {
        play_mode.override_mode(mode.into());
    }
    play_mode.run().await?;

    Ok(())
}
