use tictactoe_core::BoardSnapshot;

use crate::cosmetic::{BackgroundTask, Cue};

/// Produces board readings on demand.
pub trait SnapshotSource {
    /// Read the board now. `None` when no usable reading could be made
    /// this cycle.
    fn analyze_board(&mut self) -> Option<BoardSnapshot>;
}

impl<T: SnapshotSource + ?Sized> SnapshotSource for &mut T {
    fn analyze_board(&mut self) -> Option<BoardSnapshot> {
        (**self).analyze_board()
    }
}

impl<T: SnapshotSource + ?Sized> SnapshotSource for Box<T> {
    fn analyze_board(&mut self) -> Option<BoardSnapshot> {
        (**self).analyze_board()
    }
}

/// The robot's physical side: arm motion and expressive behaviour.
pub trait RobotBody {
    /// Pick pawn `grab_index` (1-based) and drop it on `cell` (0-8).
    fn place_piece(&mut self, grab_index: usize, cell: usize);

    /// Sweep the board clear after a confirmed anomaly.
    fn shuffle_board(&mut self);

    /// Play a behaviour cue. Long-running cues may hand back a task the
    /// machine joins before the next arm motion.
    fn cue(&mut self, cue: Cue) -> Option<BackgroundTask> {
        let _ = cue;
        None
    }

    /// Checked between games.
    fn needs_cooldown(&mut self) -> bool {
        false
    }

    /// Rest until the motors have cooled down.
    fn cool_down(&mut self) {}
}

impl<T: RobotBody + ?Sized> RobotBody for &mut T {
    fn place_piece(&mut self, grab_index: usize, cell: usize) {
        (**self).place_piece(grab_index, cell)
    }

    fn shuffle_board(&mut self) {
        (**self).shuffle_board()
    }

    fn cue(&mut self, cue: Cue) -> Option<BackgroundTask> {
        (**self).cue(cue)
    }

    fn needs_cooldown(&mut self) -> bool {
        (**self).needs_cooldown()
    }

    fn cool_down(&mut self) {
        (**self).cool_down()
    }
}

impl<T: RobotBody + ?Sized> RobotBody for Box<T> {
    fn place_piece(&mut self, grab_index: usize, cell: usize) {
        (**self).place_piece(grab_index, cell)
    }

    fn shuffle_board(&mut self) {
        (**self).shuffle_board()
    }

    fn cue(&mut self, cue: Cue) -> Option<BackgroundTask> {
        (**self).cue(cue)
    }

    fn needs_cooldown(&mut self) -> bool {
        (**self).needs_cooldown()
    }

    fn cool_down(&mut self) {
        (**self).cool_down()
    }
}
