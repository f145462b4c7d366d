use std::collections::HashSet;
use tictactoe_core::{BoardSnapshot, CellValue, Player};

/// Mutable state of the game in progress.
#[derive(Clone, Debug)]
pub struct GameSession {
    last_snapshot: BoardSnapshot,
    pieces_played_by_robot: usize,
    turn_owner: Player,
    used_flavor_sounds: HashSet<String>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            last_snapshot: BoardSnapshot::EMPTY,
            pieces_played_by_robot: 0,
            turn_owner: Player::Human,
            used_flavor_sounds: HashSet::new(),
        }
    }
}

impl GameSession {
    /// Back to an empty board with no pawn played.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Last board the machine trusts.
    #[inline]
    pub fn last_snapshot(&self) -> &BoardSnapshot {
        &self.last_snapshot
    }

    #[inline]
    pub fn pieces_played_by_robot(&self) -> usize {
        self.pieces_played_by_robot
    }

    #[inline]
    pub fn turn_owner(&self) -> Player {
        self.turn_owner
    }

    pub fn used_flavor_sounds(&self) -> &HashSet<String> {
        &self.used_flavor_sounds
    }

    /// 1-based index of the pawn the robot grabs next.
    #[inline]
    pub fn next_grab_index(&self) -> usize {
        self.pieces_played_by_robot + 1
    }

    pub(crate) fn set_turn_owner(&mut self, player: Player) {
        self.turn_owner = player;
    }

    pub(crate) fn accept_board(&mut self, board: BoardSnapshot) {
        self.last_snapshot = board;
    }

    /// Record the robot's own placement without waiting for the camera.
    pub(crate) fn record_robot_move(&mut self, cell: usize) -> BoardSnapshot {
        self.last_snapshot = self.last_snapshot.with_cell(cell, CellValue::RobotPiece);
        self.pieces_played_by_robot += 1;
        self.last_snapshot
    }

    /// Mark `sound` as played; false when it was already used this game.
    pub(crate) fn use_flavor_sound(&mut self, sound: &str) -> bool {
        self.used_flavor_sounds.insert(sound.to_string())
    }
}
