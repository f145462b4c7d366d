use serde::{Deserialize, Serialize};

/// Who opens a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstPlayer {
    /// Coin flip at the start of every game.
    #[default]
    Random,
    Human,
    Robot,
}

/// Game loop settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub first_player: FirstPlayer,
    /// Sounds the robot may play while idling, each at most once per game.
    pub flavor_sounds: Vec<String>,
    /// Pawns laid out for the robot; grab indices run from 1 to this.
    pub pawn_supply: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_player: FirstPlayer::Random,
            flavor_sounds: Vec::new(),
            pawn_supply: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: GameConfig =
            serde_json::from_str(r#"{ "flavor_sounds": ["hum"] }"#).expect("parse");
        assert_eq!(cfg.first_player, FirstPlayer::Random);
        assert_eq!(cfg.flavor_sounds, vec!["hum".to_string()]);
        assert_eq!(cfg.pawn_supply, 5);
    }
}
