//! Stateless plausibility checks on consecutive board readings.

use serde::{Deserialize, Serialize};
use tictactoe_core::{BoardSnapshot, CellValue, Player, CELL_COUNT};

/// Why a reading was flagged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Piece counts differ by more than one.
    Incoherent,
    /// The change since the last trusted board is not a single legal move.
    Cheating,
    /// Both players own a winning triple.
    ConflictingWinners,
}

/// Turns alternate, so piece counts can never differ by more than one.
pub fn incoherent_board(board: &BoardSnapshot) -> bool {
    let human = board.count(CellValue::HumanPiece);
    let robot = board.count(CellValue::RobotPiece);
    human.abs_diff(robot) > 1
}

/// Check the change from `last` to `board` against the moves allowed while
/// `turn_owner` is expected to play.
///
/// Allowed: no change, one cell going from empty to a human piece, and one
/// cell going from empty to a robot piece outside the human's turn. Any
/// other change is cheating.
pub fn cheating_detected(board: &BoardSnapshot, last: &BoardSnapshot, turn_owner: Player) -> bool {
    let changed: Vec<usize> = (0..CELL_COUNT)
        .filter(|&i| board.cell(i) != last.cell(i))
        .collect();
    match changed.as_slice() {
        [] => false,
        [i] => match (last.cell(*i), board.cell(*i)) {
            (CellValue::Empty, CellValue::HumanPiece) => false,
            (CellValue::Empty, CellValue::RobotPiece) => turn_owner == Player::Human,
            _ => true,
        },
        _ => true,
    }
}

/// The board changed and holds more human pieces than before.
pub fn has_human_played(board: &BoardSnapshot, last: &BoardSnapshot) -> bool {
    board != last && board.count(CellValue::HumanPiece) > last.count(CellValue::HumanPiece)
}

/// First anomaly found on `board`, incoherence before cheating.
pub fn detect_anomaly(
    board: &BoardSnapshot,
    last: &BoardSnapshot,
    turn_owner: Player,
) -> Option<AnomalyKind> {
    if incoherent_board(board) {
        Some(AnomalyKind::Incoherent)
    } else if cheating_detected(board, last, turn_owner) {
        Some(AnomalyKind::Cheating)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> BoardSnapshot {
        s.parse().expect("board literal")
    }

    fn all_boards() -> impl Iterator<Item = BoardSnapshot> {
        (0..3usize.pow(CELL_COUNT as u32)).map(|mut code| {
            let mut cells = [CellValue::Empty; CELL_COUNT];
            for cell in cells.iter_mut() {
                *cell = match code % 3 {
                    0 => CellValue::Empty,
                    1 => CellValue::HumanPiece,
                    _ => CellValue::RobotPiece,
                };
                code /= 3;
            }
            BoardSnapshot::from_cells(cells)
        })
    }

    #[test]
    fn incoherence_is_exactly_a_count_gap_above_one() {
        for b in all_boards() {
            let gap = b
                .count(CellValue::HumanPiece)
                .abs_diff(b.count(CellValue::RobotPiece));
            assert_eq!(incoherent_board(&b), gap >= 2, "{b}");
        }
    }

    #[test]
    fn unchanged_board_is_never_cheating() {
        for b in all_boards().step_by(7) {
            assert!(!cheating_detected(&b, &b, Player::Human));
            assert!(!cheating_detected(&b, &b, Player::Robot));
        }
    }

    #[test]
    fn single_human_move_is_legal() {
        let last = board("...|.R.|...");
        let now = board("H..|.R.|...");
        assert!(!cheating_detected(&now, &last, Player::Human));
        assert!(!cheating_detected(&now, &last, Player::Robot));
        assert!(has_human_played(&now, &last));
    }

    #[test]
    fn robot_piece_during_human_turn_is_cheating() {
        let last = board("...|.R.|H..");
        let now = board("R..|.R.|H..");
        assert!(cheating_detected(&now, &last, Player::Human));
        assert!(!cheating_detected(&now, &last, Player::Robot));
        assert!(!has_human_played(&now, &last));
    }

    #[test]
    fn multiple_or_removal_changes_are_cheating() {
        let last = board("...|.R.|...");
        assert!(cheating_detected(&board("HH.|.R.|..."), &last, Player::Human));
        assert!(cheating_detected(&board("...|...|..."), &last, Player::Robot));
        assert!(cheating_detected(&board("...|.H.|..."), &last, Player::Human));
    }

    #[test]
    fn incoherence_is_reported_first() {
        let last = BoardSnapshot::EMPTY;
        assert_eq!(
            detect_anomaly(&board("HH.|...|..."), &last, Player::Human),
            Some(AnomalyKind::Incoherent)
        );
        assert_eq!(
            detect_anomaly(&board("R..|...|..."), &last, Player::Human),
            Some(AnomalyKind::Cheating)
        );
        assert_eq!(detect_anomaly(&board("H..|...|..."), &last, Player::Human), None);
    }

    #[test]
    fn stable_board_means_no_human_move() {
        let b = board("...|.R.|...");
        assert!(!has_human_played(&b, &b));
    }
}
