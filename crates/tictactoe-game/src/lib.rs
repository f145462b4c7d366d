//! Game logic of the tic-tac-toe robot.
//!
//! - [`get_winner`]: winning triples and the draw rule.
//! - [`detect_anomaly`]: plausibility checks between readings.
//! - [`choose_next_action`]: the robot's selection rules over a ranked
//!   [`MovePolicy`] output; [`MinimaxPolicy`] is a reference policy.
//! - [`GameStateMachine`]: the turn loop over injected perception
//!   ([`SnapshotSource`]) and actuation ([`RobotBody`]).
//!
//! The machine is synchronous. Cosmetic behaviour may run on
//! [`BackgroundTask`]s, which the machine joins before arm motion.

mod anomaly;
mod config;
mod cosmetic;
mod machine;
mod policy;
mod rules;
mod session;

pub use anomaly::{
    cheating_detected, detect_anomaly, has_human_played, incoherent_board, AnomalyKind,
};
pub use config::{FirstPlayer, GameConfig};
pub use cosmetic::{BackgroundTask, Cue};
pub use machine::{
    GameError, GameOutcome, GameState, GameStateMachine, RobotBody, SnapshotSource, StepEvent,
};
pub use policy::{
    choose_next_action, MinimaxPolicy, MovePolicy, RankedAction, AVOIDED_OPENING_CELL,
};
pub use rules::{get_winner, is_final, Verdict, Winner, WINNING_TRIPLES};
pub use session::GameSession;
