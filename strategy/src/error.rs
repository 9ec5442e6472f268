use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("unknown slot function name: {0}")]
    UnknownSlotFunction(String),
    #[error("unknown action function name: {0}")]
    UnknownActionFunction(String),
    #[error(transparent)]
    InvalidPoint(#[from] attacker_types::UnknownActionPoint),
    #[error("failed to read strategy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse strategy file: {0}")]
    Json(#[from] serde_json::Error),
}
