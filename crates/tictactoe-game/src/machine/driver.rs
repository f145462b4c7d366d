use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tictactoe_core::{BoardSnapshot, Player, CELL_COUNT};

use super::{GameError, GameOutcome, GameState, RobotBody, SnapshotSource, StepEvent};
use crate::anomaly::{detect_anomaly, has_human_played, AnomalyKind};
use crate::config::{FirstPlayer, GameConfig};
use crate::cosmetic::{BackgroundTask, Cue};
use crate::policy::{choose_next_action, MovePolicy};
use crate::rules::{get_winner, Verdict, Winner};
use crate::session::GameSession;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Single-threaded game loop over injected perception, policy and body.
///
/// Each [`step`](Self::step) performs at most one board reading (two when a
/// flagged reading is double-checked) and one state transition.
pub struct GameStateMachine<S, P, B, R = StdRng> {
    perception: S,
    policy: P,
    body: B,
    rng: R,
    config: GameConfig,
    session: GameSession,
    state: GameState,
    pending: Vec<BackgroundTask>,
}

impl<S, P, B> GameStateMachine<S, P, B, StdRng>
where
    S: SnapshotSource,
    P: MovePolicy,
    B: RobotBody,
{
    /// Machine with an entropy-seeded random source.
    pub fn new(perception: S, policy: P, body: B, config: GameConfig) -> Self {
        Self::with_rng(perception, policy, body, config, StdRng::from_os_rng())
    }
}

impl<S, P, B, R> GameStateMachine<S, P, B, R>
where
    S: SnapshotSource,
    P: MovePolicy,
    B: RobotBody,
    R: Rng,
{
    pub fn with_rng(perception: S, policy: P, body: B, config: GameConfig, rng: R) -> Self {
        Self {
            perception,
            policy,
            body,
            rng,
            config,
            session: GameSession::default(),
            state: GameState::AwaitingClearBoard,
            pending: Vec::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn perception(&self) -> &S {
        &self.perception
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Background tasks not joined yet.
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Finish background work and wait for a clear board again.
    pub fn start_new_game(&mut self) {
        self.join_pending();
        self.state = GameState::AwaitingClearBoard;
    }

    /// Advance the game by one cycle.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self), fields(state = ?self.state))
    )]
    pub fn step(&mut self) -> Result<StepEvent, GameError> {
        match self.state {
            GameState::AwaitingClearBoard => Ok(self.await_clear_board()),
            GameState::CoinFlip => Ok(self.coin_flip()),
            GameState::HumanTurn => Ok(self.human_turn()),
            GameState::RobotTurn => self.robot_turn(),
            GameState::Terminal(w) => Ok(StepEvent::Finished(GameOutcome::Finished(w))),
            GameState::Aborted(kind) => Ok(StepEvent::Finished(GameOutcome::Aborted(kind))),
        }
    }

    /// Play one game from a clear board to its outcome.
    pub fn run_game(&mut self) -> Result<GameOutcome, GameError> {
        if self.state.is_over() {
            self.start_new_game();
        }
        log::info!("game start");
        loop {
            if let StepEvent::Finished(outcome) = self.step()? {
                return Ok(outcome);
            }
        }
    }

    /// Like [`run_game`](Self::run_game) but gives up after `max_steps`
    /// cycles, returning `None`.
    pub fn run_game_within(&mut self, max_steps: usize) -> Result<Option<GameOutcome>, GameError> {
        if self.state.is_over() {
            self.start_new_game();
        }
        for _ in 0..max_steps {
            if let StepEvent::Finished(outcome) = self.step()? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    fn await_clear_board(&mut self) -> StepEvent {
        match self.perception.analyze_board() {
            Some(board) if board.is_clear() => {
                log::info!("board is clear, resetting the playground");
                self.session.reset();
                self.state = GameState::CoinFlip;
                StepEvent::GameStarted
            }
            Some(board) => {
                log::info!("waiting for board to be cleaned: {board}");
                self.idle();
                StepEvent::BoardNotClear {
                    pieces: board.piece_count(),
                }
            }
            None => {
                self.idle();
                StepEvent::NoSnapshot
            }
        }
    }

    fn coin_flip(&mut self) -> StepEvent {
        let first = match self.config.first_player {
            FirstPlayer::Human => Player::Human,
            FirstPlayer::Robot => Player::Robot,
            FirstPlayer::Random if self.rng.random_bool(0.5) => Player::Robot,
            FirstPlayer::Random => Player::Human,
        };
        log::info!("coin flip: {first} plays first");
        self.session.set_turn_owner(first);
        let (cue, state) = match first {
            Player::Robot => (Cue::MyTurn, GameState::RobotTurn),
            Player::Human => (Cue::YourTurn, GameState::HumanTurn),
        };
        self.cue(cue);
        self.state = state;
        StepEvent::FirstPlayerChosen(first)
    }

    fn human_turn(&mut self) -> StepEvent {
        let Some(board) = self.perception.analyze_board() else {
            log::warn!("invalid board detected");
            return StepEvent::NoSnapshot;
        };
        let last = *self.session.last_snapshot();

        if let Some(kind) = detect_anomaly(&board, &last, self.session.turn_owner()) {
            return self.double_check(board, kind);
        }

        let verdict = get_winner(&board);
        if verdict == Verdict::Conflicting {
            return self.abort(AnomalyKind::ConflictingWinners);
        }

        if !has_human_played(&board, &last) {
            self.idle();
            return StepEvent::Idle;
        }

        self.session.accept_board(board);
        self.session.set_turn_owner(Player::Robot);
        log::info!("human played: {board}, next player: robot");
        match verdict {
            Verdict::Decided(w) => self.finish(w),
            _ => {
                self.state = GameState::RobotTurn;
                StepEvent::HumanMoved(board)
            }
        }
    }

    fn robot_turn(&mut self) -> Result<StepEvent, GameError> {
        let last = *self.session.last_snapshot();
        let ranked = self.policy.value_actions(&last);
        let action = choose_next_action(&last, &ranked, &mut self.rng)?;
        if action.cell >= CELL_COUNT || !last.cell(action.cell).is_empty() {
            return Err(GameError::IllegalAction { cell: action.cell });
        }
        if self.session.pieces_played_by_robot() >= self.config.pawn_supply {
            return Err(GameError::OutOfPawns {
                supply: self.config.pawn_supply,
            });
        }
        log::info!(
            "selecting robot action {} (value {:.2}) on {last}",
            action.cell,
            action.value
        );

        self.join_pending();
        let grab_index = self.session.next_grab_index();
        self.body.place_piece(grab_index, action.cell);
        let board = self.session.record_robot_move(action.cell);
        self.session.set_turn_owner(Player::Human);
        log::info!(
            "robot played pawn {grab_index} on cell {}: {board}, next player: human",
            action.cell
        );

        Ok(match get_winner(&board) {
            Verdict::Decided(w) => self.finish(w),
            Verdict::Conflicting => self.abort(AnomalyKind::ConflictingWinners),
            Verdict::Ongoing => {
                self.state = GameState::HumanTurn;
                StepEvent::RobotMoved {
                    cell: action.cell,
                    board,
                }
            }
        })
    }

    /// Read the board a second time; only an identical reading confirms the
    /// anomaly.
    fn double_check(&mut self, board: BoardSnapshot, kind: AnomalyKind) -> StepEvent {
        log::warn!(
            "{kind:?} detected: last {} current {board}, double checking",
            self.session.last_snapshot()
        );
        match self.perception.analyze_board() {
            Some(again) if again == board => self.abort(kind),
            Some(again) => {
                log::info!("second reading {again} differs, treating {kind:?} as a glitch");
                StepEvent::AnomalyDismissed(kind)
            }
            None => {
                log::info!("no second reading, treating {kind:?} as a glitch");
                StepEvent::AnomalyDismissed(kind)
            }
        }
    }

    fn abort(&mut self, kind: AnomalyKind) -> StepEvent {
        log::warn!("confirmed {kind:?}, shuffling the board");
        self.join_pending();
        self.body.shuffle_board();
        self.state = GameState::Aborted(kind);
        StepEvent::Finished(GameOutcome::Aborted(kind))
    }

    fn finish(&mut self, winner: Winner) -> StepEvent {
        let cue = match winner {
            Winner::Robot => Cue::Celebrate,
            Winner::Human => Cue::Defeat,
            Winner::Draw => Cue::Draw,
        };
        self.cue(cue);
        self.join_pending();
        self.state = GameState::Terminal(winner);
        log::info!("game end, winner: {winner}");
        StepEvent::Finished(GameOutcome::Finished(winner))
    }

    /// Idle behaviour, with a flavor sound not yet used this game if any.
    fn idle(&mut self) {
        let unused: Vec<String> = self
            .config
            .flavor_sounds
            .iter()
            .filter(|s| !self.session.used_flavor_sounds().contains(*s))
            .cloned()
            .collect();
        let flavor = if unused.is_empty() {
            None
        } else {
            let pick = unused[self.rng.random_range(0..unused.len())].clone();
            self.session.use_flavor_sound(&pick);
            Some(pick)
        };
        self.cue(Cue::Idle { flavor });
    }

    fn cue(&mut self, cue: Cue) {
        log::debug!("cue {cue:?}");
        self.reap_finished();
        // one idle animation at a time
        if matches!(cue, Cue::Idle { .. }) {
            self.join_pending();
        }
        if let Some(task) = self.body.cue(cue) {
            self.pending.push(task);
        }
    }

    fn reap_finished(&mut self) {
        let (done, running): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(BackgroundTask::is_finished);
        self.pending = running;
        for task in done {
            task.join();
        }
    }

    fn join_pending(&mut self) {
        for task in self.pending.drain(..) {
            log::debug!("joining background task '{}'", task.name());
            task.join();
        }
    }
}

impl<S, P, B, R> Drop for GameStateMachine<S, P, B, R> {
    fn drop(&mut self) {
        for task in self.pending.drain(..) {
            task.join();
        }
    }
}
