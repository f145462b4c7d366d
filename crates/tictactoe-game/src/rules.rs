//! Winning triples and end-of-game verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;
use tictactoe_core::{BoardSnapshot, Player};

/// Rows, columns, then diagonals. Checked in this order.
pub const WINNING_TRIPLES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Result of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Human,
    Robot,
    Draw,
}

impl From<Player> for Winner {
    fn from(player: Player) -> Self {
        match player {
            Player::Human => Winner::Human,
            Player::Robot => Winner::Robot,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Human => f.write_str("human"),
            Winner::Robot => f.write_str("robot"),
            Winner::Draw => f.write_str("nobody"),
        }
    }
}

/// Evaluation of a board position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ongoing,
    Decided(Winner),
    /// Both players own a complete triple. Never reached in a legal game.
    Conflicting,
}

/// Scan all winning triples; a full board without a triple is a draw.
pub fn get_winner(board: &BoardSnapshot) -> Verdict {
    let mut winner: Option<Player> = None;
    for [a, b, c] in WINNING_TRIPLES {
        let owner = match board.cell(a).owner() {
            Some(p) if board.cell(b) == board.cell(a) && board.cell(c) == board.cell(a) => p,
            _ => continue,
        };
        match winner {
            None => winner = Some(owner),
            Some(p) if p != owner => return Verdict::Conflicting,
            Some(_) => {}
        }
    }
    match winner {
        Some(p) => Verdict::Decided(p.into()),
        None if board.is_full() => Verdict::Decided(Winner::Draw),
        None => Verdict::Ongoing,
    }
}

/// True once the game can no longer continue.
pub fn is_final(board: &BoardSnapshot) -> bool {
    get_winner(board) != Verdict::Ongoing
}
