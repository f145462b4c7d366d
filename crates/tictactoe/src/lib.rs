//! Facade crate of the tic-tac-toe robot workspace.
//!
//! This crate provides:
//! - re-exports of the underlying crates ([`core`], [`vision`], [`game`]);
//! - [`CameraPerception`], which turns camera frames into board snapshots
//!   for the game loop;
//! - [`play_games`], the multi-game launcher;
//! - [`AppConfig`], the JSON application config;
//! - a [`simulation`] of the table for dry runs without hardware.
//!
//! ## Quickstart
//!
//! ```no_run
//! use tictactoe::game::{GameStateMachine, MinimaxPolicy};
//! use tictactoe::simulation::{SimulatedTable, SimulationParams};
//! use tictactoe::{play_games, AppConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load_json("robot.json")?;
//! let table = SimulatedTable::new(SimulationParams::default());
//! let mut machine =
//!     GameStateMachine::new(table.camera(), MinimaxPolicy, table.arm(), config.game);
//! let summary = play_games(&mut machine, Some(10));
//! println!("robot won {} of {} games", summary.robot_wins, summary.games);
//! # Ok(())
//! # }
//! ```

pub use tictactoe_core as core;
pub use tictactoe_game as game;
pub use tictactoe_vision as vision;

pub use tictactoe_core::{BoardSnapshot, CellValue, Player};
pub use tictactoe_game::{GameOutcome, GameStateMachine, Winner};

mod config;
pub mod detect;
mod launcher;
mod logging;
mod perception;
pub mod simulation;

pub use config::{AppConfig, ConfigError};
pub use launcher::{play_games, LaunchSummary};
pub use logging::{init_logging, log_spec, LOG_ENV};
pub use perception::{CameraPerception, FrameSource, ImageSequence};
