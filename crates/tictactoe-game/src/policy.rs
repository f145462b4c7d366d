//! Move selection: the ranked-action contract and the robot's pick rules.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tictactoe_core::{BoardSnapshot, CellValue, Player};

use crate::machine::GameError;
use crate::rules::{get_winner, Verdict, Winner};

/// Bottom-right corner, never chosen as an opening move.
pub const AVOIDED_OPENING_CELL: usize = 8;

/// Candidate move for the robot with its estimated value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedAction {
    pub cell: usize,
    pub value: f32,
}

/// Ranks the robot's candidate moves on a board, best first.
pub trait MovePolicy {
    fn value_actions(&self, board: &BoardSnapshot) -> Vec<RankedAction>;
}

impl<T: MovePolicy + ?Sized> MovePolicy for &T {
    fn value_actions(&self, board: &BoardSnapshot) -> Vec<RankedAction> {
        (**self).value_actions(board)
    }
}

impl<T: MovePolicy + ?Sized> MovePolicy for Box<T> {
    fn value_actions(&self, board: &BoardSnapshot) -> Vec<RankedAction> {
        (**self).value_actions(board)
    }
}

/// Apply the robot's selection rules to a ranked list.
///
/// - empty board: uniform pick among the candidates other than
///   [`AVOIDED_OPENING_CELL`];
/// - a single human piece and nothing else: the top candidate, or the
///   second one when the top is [`AVOIDED_OPENING_CELL`];
/// - otherwise: the top candidate.
pub fn choose_next_action<R: Rng + ?Sized>(
    board: &BoardSnapshot,
    ranked: &[RankedAction],
    rng: &mut R,
) -> Result<RankedAction, GameError> {
    let first = *ranked.first().ok_or(GameError::NoLegalAction)?;

    if board.is_clear() {
        let candidates: Vec<&RankedAction> = ranked
            .iter()
            .filter(|a| a.cell != AVOIDED_OPENING_CELL)
            .collect();
        if candidates.is_empty() {
            return Ok(first);
        }
        return Ok(*candidates[rng.random_range(0..candidates.len())]);
    }

    let lone_human_piece = board.count(CellValue::HumanPiece) == 1 && board.piece_count() == 1;
    if lone_human_piece && first.cell == AVOIDED_OPENING_CELL {
        if let Some(second) = ranked.get(1) {
            return Ok(*second);
        }
    }
    Ok(first)
}

/// Exhaustive minimax for the robot. Faster wins and slower losses score
/// higher; ties keep cell order.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimaxPolicy;

impl MinimaxPolicy {
    /// Score of `board` for the player about to move.
    fn negamax(
        board: &BoardSnapshot,
        to_move: Player,
        memo: &mut HashMap<(BoardSnapshot, Player), i32>,
    ) -> i32 {
        if let Some(&v) = memo.get(&(*board, to_move)) {
            return v;
        }
        let empties = board.empty_cells().count() as i32;
        let score = match get_winner(board) {
            Verdict::Decided(Winner::Draw) | Verdict::Conflicting => 0,
            Verdict::Decided(w) if w == Winner::from(to_move) => 1 + empties,
            Verdict::Decided(_) => -(1 + empties),
            Verdict::Ongoing => board
                .empty_cells()
                .map(|cell| {
                    let child = board.with_cell(cell, to_move.piece());
                    -Self::negamax(&child, to_move.opponent(), memo)
                })
                .max()
                .unwrap_or(0),
        };
        memo.insert((*board, to_move), score);
        score
    }
}

impl MovePolicy for MinimaxPolicy {
    fn value_actions(&self, board: &BoardSnapshot) -> Vec<RankedAction> {
        if get_winner(board) != Verdict::Ongoing {
            return Vec::new();
        }
        let mut memo = HashMap::new();
        let mut actions: Vec<RankedAction> = board
            .empty_cells()
            .map(|cell| {
                let child = board.with_cell(cell, CellValue::RobotPiece);
                let value = -Self::negamax(&child, Player::Human, &mut memo);
                RankedAction {
                    cell,
                    value: value as f32,
                }
            })
            .collect();
        actions.sort_by(|a, b| b.value.total_cmp(&a.value));
        actions
    }
}
