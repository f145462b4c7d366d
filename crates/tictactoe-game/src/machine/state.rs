use serde::{Deserialize, Serialize};
use std::fmt;
use tictactoe_core::{BoardSnapshot, Player};

use crate::anomaly::AnomalyKind;
use crate::rules::Winner;

/// How a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Finished(Winner),
    /// Confirmed anomaly; no winner is recorded.
    Aborted(AnomalyKind),
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Finished(w) => write!(f, "winner: {w}"),
            GameOutcome::Aborted(kind) => write!(f, "aborted ({kind:?})"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    AwaitingClearBoard,
    CoinFlip,
    HumanTurn,
    RobotTurn,
    Terminal(Winner),
    Aborted(AnomalyKind),
}

impl GameState {
    /// Outcome of a game that has ended.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match *self {
            GameState::Terminal(w) => Some(GameOutcome::Finished(w)),
            GameState::Aborted(kind) => Some(GameOutcome::Aborted(kind)),
            _ => None,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }
}

/// What a single [`step`](super::GameStateMachine::step) did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// No usable reading this cycle; nothing changed.
    NoSnapshot,
    /// Still waiting for the board to be emptied.
    BoardNotClear { pieces: usize },
    /// Board found empty, session reset.
    GameStarted,
    FirstPlayerChosen(Player),
    /// Human has not moved yet.
    Idle,
    HumanMoved(BoardSnapshot),
    RobotMoved { cell: usize, board: BoardSnapshot },
    /// A flagged reading was not confirmed by a second one; nothing changed.
    AnomalyDismissed(AnomalyKind),
    Finished(GameOutcome),
}
