/// Failures that stop the state machine. Perception problems and
/// anomalies are not errors; they surface as step events.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("move policy returned no action")]
    NoLegalAction,
    #[error("move policy chose cell {cell}, which is not free")]
    IllegalAction { cell: usize },
    #[error("all {supply} robot pawns have been played")]
    OutOfPawns { supply: usize },
}
