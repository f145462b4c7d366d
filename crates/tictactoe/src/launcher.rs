//! Back-to-back games with per-game error isolation and motor cooldowns.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tictactoe_game::{
    GameOutcome, GameStateMachine, MovePolicy, RobotBody, SnapshotSource, Winner,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Tally of a launcher run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSummary {
    pub games: usize,
    pub robot_wins: usize,
    pub human_wins: usize,
    pub draws: usize,
    pub aborted: usize,
    /// Games ended by a [`GameError`](tictactoe_game::GameError).
    pub errors: usize,
    pub cooldowns: usize,
}

impl LaunchSummary {
    fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Finished(Winner::Robot) => self.robot_wins += 1,
            GameOutcome::Finished(Winner::Human) => self.human_wins += 1,
            GameOutcome::Finished(Winner::Draw) => self.draws += 1,
            GameOutcome::Aborted(_) => self.aborted += 1,
        }
    }
}

/// Play games until `limit` is reached, forever when `None`.
///
/// Each game starts from a clear board. A failing game is logged and
/// counted; the next one starts regardless. The body is offered a cooldown
/// after every game.
#[cfg_attr(feature = "tracing", instrument(level = "info", skip(machine)))]
pub fn play_games<S, P, B, R>(
    machine: &mut GameStateMachine<S, P, B, R>,
    limit: Option<usize>,
) -> LaunchSummary
where
    S: SnapshotSource,
    P: MovePolicy,
    B: RobotBody,
    R: Rng,
{
    let mut summary = LaunchSummary::default();
    while limit.is_none_or(|n| summary.games < n) {
        machine.start_new_game();
        match machine.run_game() {
            Ok(outcome) => {
                log::info!("game {} over, {outcome}", summary.games + 1);
                summary.record(outcome);
            }
            Err(e) => {
                log::error!("game {} failed: {e}", summary.games + 1);
                summary.errors += 1;
            }
        }
        summary.games += 1;

        let body = machine.body_mut();
        if body.needs_cooldown() {
            log::info!("motors need to cool down");
            body.cool_down();
            summary.cooldowns += 1;
        }
    }
    summary
}
