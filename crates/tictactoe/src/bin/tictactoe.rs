use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tictactoe::detect::{self, DetectError};
use tictactoe::game::{FirstPlayer, GameStateMachine, MinimaxPolicy};
use tictactoe::simulation::{SimulatedTable, SimulationParams};
use tictactoe::vision::{BoardCalibration, CalibrationError};
use tictactoe::{init_logging, play_games, AppConfig, ConfigError};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Emit logs as JSON (with the `tracing` feature)
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play games against a simulated human on a simulated table
    Simulate {
        #[arg(long, default_value_t = 10)]
        games: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Probability of a spurious camera reading
        #[arg(long, default_value_t = 0.0)]
        misread_rate: f64,
        /// Robot placements between cooldowns (0 disables them)
        #[arg(long, default_value_t = 0)]
        cooldown_every: usize,
        #[arg(long)]
        first: Option<FirstArg>,
        /// Application config JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the cell rectangles found in an image
    LocateCells {
        image: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write a default application config and factory calibration
    InitConfig {
        #[arg(long, default_value = "robot.json")]
        output: PathBuf,
        #[arg(long, default_value = "calibration.json")]
        calibration: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FirstArg {
    Random,
    Human,
    Robot,
}

impl From<FirstArg> for FirstPlayer {
    fn from(arg: FirstArg) -> Self {
        match arg {
            FirstArg::Random => FirstPlayer::Random,
            FirstArg::Human => FirstPlayer::Human,
            FirstArg::Robot => FirstPlayer::Robot,
        }
    }
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => AppConfig::load_json(path),
        None => Ok(AppConfig::default()),
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Simulate {
            games,
            seed,
            misread_rate,
            cooldown_every,
            first,
            config,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(first) = first {
                config.game.first_player = first.into();
            }
            let table = SimulatedTable::new(SimulationParams {
                seed,
                misread_rate,
                moves_before_cooldown: cooldown_every,
            });
            let mut machine = GameStateMachine::with_rng(
                table.camera(),
                MinimaxPolicy,
                table.arm(),
                config.game,
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            );
            let summary = play_games(&mut machine, Some(games));
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::LocateCells { image, config } => {
            let config = load_config(config.as_ref())?;
            let frame = detect::load_frame(&image, config.channel_order)?;
            let layout = detect::locate_cells(&frame, &config)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
        Command::InitConfig {
            output,
            calibration,
        } => {
            BoardCalibration::default().write_json(&calibration)?;
            let config = AppConfig {
                calibration_path: Some(calibration),
                ..AppConfig::default()
            };
            config.write_json(&output)?;
            log::info!("wrote {}", output.display());
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    init_logging(level, cli.json_logs);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
