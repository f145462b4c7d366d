use rand::rngs::StdRng;
use rand::SeedableRng;
use tictactoe::game::{
    FirstPlayer, GameConfig, GameStateMachine, MinimaxPolicy, MovePolicy, RankedAction,
};
use tictactoe::simulation::{SimulatedTable, SimulationParams};
use tictactoe::{play_games, BoardSnapshot, LaunchSummary};

fn config(first_player: FirstPlayer) -> GameConfig {
    GameConfig {
        first_player,
        ..GameConfig::default()
    }
}

fn simulate(params: SimulationParams, game: GameConfig, games: usize) -> LaunchSummary {
    let table = SimulatedTable::new(params.clone());
    let mut machine = GameStateMachine::with_rng(
        table.camera(),
        MinimaxPolicy,
        table.arm(),
        game,
        StdRng::seed_from_u64(params.seed),
    );
    play_games(&mut machine, Some(games))
}

#[test]
fn perfect_robot_never_loses_to_a_random_human() {
    for seed in 0..4 {
        let params = SimulationParams {
            seed,
            ..SimulationParams::default()
        };
        let summary = simulate(params, config(FirstPlayer::Random), 6);
        assert_eq!(summary.games, 6);
        assert_eq!(summary.human_wins, 0, "{summary:?}");
        assert_eq!(summary.robot_wins + summary.draws, 6);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.cooldowns, 0);
    }
}

#[test]
fn arm_cools_down_between_games() {
    // the robot places at least three pawns in every game it does not lose
    let params = SimulationParams {
        seed: 11,
        moves_before_cooldown: 3,
        ..SimulationParams::default()
    };
    let summary = simulate(params, config(FirstPlayer::Robot), 4);
    assert_eq!(summary.games, 4);
    assert_eq!(summary.cooldowns, 4);
}

#[test]
fn noisy_camera_still_completes_every_game() {
    let params = SimulationParams {
        seed: 5,
        misread_rate: 0.2,
        ..SimulationParams::default()
    };
    let summary = simulate(params, config(FirstPlayer::Random), 5);
    assert_eq!(summary.games, 5);
    assert_eq!(
        summary.robot_wins + summary.human_wins + summary.draws + summary.aborted,
        5
    );
}

struct Clueless;

impl MovePolicy for Clueless {
    fn value_actions(&self, _board: &BoardSnapshot) -> Vec<RankedAction> {
        Vec::new()
    }
}

#[test]
fn failing_games_are_counted_and_skipped() {
    let table = SimulatedTable::new(SimulationParams::default());
    let mut machine = GameStateMachine::with_rng(
        table.camera(),
        Clueless,
        table.arm(),
        config(FirstPlayer::Robot),
        StdRng::seed_from_u64(0),
    );
    let summary = play_games(&mut machine, Some(3));
    assert_eq!(summary.games, 3);
    assert_eq!(summary.errors, 3);
    assert!(table.board().is_clear());
}
