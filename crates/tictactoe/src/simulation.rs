//! A simulated table: the board, a random human opponent, a noisy camera
//! and an arm that overheats.
//!
//! The simulated human listens to the robot's cues: it moves after a
//! "your turn" cue or a robot placement, and clears the board once a game
//! is over.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tictactoe_core::{BoardSnapshot, CellValue, CELL_COUNT};
use tictactoe_game::{is_final, BackgroundTask, Cue, RobotBody, SnapshotSource};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub seed: u64,
    /// Probability that a camera reading shows a spurious piece.
    pub misread_rate: f64,
    /// Placements after which the arm asks for a cooldown; 0 disables it.
    pub moves_before_cooldown: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: 0,
            misread_rate: 0.0,
            moves_before_cooldown: 0,
        }
    }
}

#[derive(Debug)]
struct Table {
    board: BoardSnapshot,
    human_to_move: bool,
    needs_tidy: bool,
    moves_since_cooldown: usize,
    rng: StdRng,
    params: SimulationParams,
}

impl Table {
    fn human_move(&mut self) {
        let free: Vec<usize> = self.board.empty_cells().collect();
        if let Some(&cell) = free.choose(&mut self.rng) {
            self.board = self.board.with_cell(cell, CellValue::HumanPiece);
        }
        self.human_to_move = false;
    }

    fn misread(&mut self) -> BoardSnapshot {
        let cell = self.rng.random_range(0..CELL_COUNT);
        let value = if self.board.cell(cell).is_empty() {
            CellValue::HumanPiece
        } else {
            CellValue::Empty
        };
        self.board.with_cell(cell, value)
    }
}

/// Shared handle to a simulated table.
#[derive(Clone, Debug)]
pub struct SimulatedTable {
    inner: Rc<RefCell<Table>>,
}

impl SimulatedTable {
    pub fn new(params: SimulationParams) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Table {
                board: BoardSnapshot::EMPTY,
                human_to_move: false,
                needs_tidy: false,
                moves_since_cooldown: 0,
                rng: StdRng::seed_from_u64(params.seed),
                params,
            })),
        }
    }

    /// True content of the board.
    pub fn board(&self) -> BoardSnapshot {
        self.inner.borrow().board
    }

    pub fn camera(&self) -> SimulatedCamera {
        SimulatedCamera {
            table: self.clone(),
        }
    }

    pub fn arm(&self) -> SimulatedArm {
        SimulatedArm {
            table: self.clone(),
        }
    }
}

/// Camera view of a [`SimulatedTable`].
#[derive(Clone, Debug)]
pub struct SimulatedCamera {
    table: SimulatedTable,
}

impl SnapshotSource for SimulatedCamera {
    fn analyze_board(&mut self) -> Option<BoardSnapshot> {
        let mut t = self.table.inner.borrow_mut();
        if t.needs_tidy {
            t.board = BoardSnapshot::EMPTY;
            t.needs_tidy = false;
            t.human_to_move = false;
        } else if t.human_to_move && !is_final(&t.board) {
            t.human_move();
        }
        let rate = t.params.misread_rate;
        if rate > 0.0 && t.rng.random_bool(rate.min(1.0)) {
            return Some(t.misread());
        }
        Some(t.board)
    }
}

/// Arm and speaker of a [`SimulatedTable`].
#[derive(Clone, Debug)]
pub struct SimulatedArm {
    table: SimulatedTable,
}

impl RobotBody for SimulatedArm {
    fn place_piece(&mut self, grab_index: usize, cell: usize) {
        let mut t = self.table.inner.borrow_mut();
        log::debug!("arm places pawn {grab_index} on cell {cell}");
        t.board = t.board.with_cell(cell, CellValue::RobotPiece);
        t.moves_since_cooldown += 1;
        t.human_to_move = true;
    }

    fn shuffle_board(&mut self) {
        let mut t = self.table.inner.borrow_mut();
        t.board = BoardSnapshot::EMPTY;
        t.human_to_move = false;
    }

    fn cue(&mut self, cue: Cue) -> Option<BackgroundTask> {
        let mut t = self.table.inner.borrow_mut();
        match cue {
            Cue::YourTurn => t.human_to_move = true,
            Cue::Celebrate | Cue::Defeat | Cue::Draw => t.needs_tidy = true,
            Cue::Idle { .. } | Cue::MyTurn => {}
        }
        None
    }

    fn needs_cooldown(&mut self) -> bool {
        let t = self.table.inner.borrow();
        let limit = t.params.moves_before_cooldown;
        limit > 0 && t.moves_since_cooldown >= limit
    }

    fn cool_down(&mut self) {
        self.table.inner.borrow_mut().moves_since_cooldown = 0;
    }
}
