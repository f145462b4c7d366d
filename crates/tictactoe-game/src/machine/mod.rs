//! Turn state machine driving one game at a time.

mod driver;
mod error;
mod ports;
mod state;

pub use driver::GameStateMachine;
pub use error::GameError;
pub use ports::{RobotBody, SnapshotSource};
pub use state::{GameOutcome, GameState, StepEvent};
