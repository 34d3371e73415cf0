use crate::engine::EngineError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BOARD_SIZE: usize = 15;
pub const DEFAULT_MAX_DEPTH: u8 = 2;
pub const DEFAULT_THINKING_TIME_MS: u64 = 2000;
/// Minimum distance from the board edge for the random opening move.
pub const DEFAULT_OPENING_MARGIN: usize = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    pub board_size: usize,
    /// Plies searched below the root before the evaluator takes over.
    pub max_depth: u8,
    pub opening_margin: usize,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            opening_margin: DEFAULT_OPENING_MARGIN,
        }
    }
}

impl MinimaxConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_depth == 0 {
            return Err(EngineError::InvalidConfiguration);
        }
        validate_board(self.board_size, self.opening_margin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    pub board_size: usize,
    /// Wall-clock budget per move. Checked between iterations only, so a
    /// slow iteration can overshoot it.
    pub thinking_time_ms: u64,
    pub opening_margin: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            thinking_time_ms: DEFAULT_THINKING_TIME_MS,
            opening_margin: DEFAULT_OPENING_MARGIN,
        }
    }
}

impl MctsConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.thinking_time_ms == 0 {
            return Err(EngineError::InvalidConfiguration);
        }
        validate_board(self.board_size, self.opening_margin)
    }
}

fn validate_board(board_size: usize, opening_margin: usize) -> Result<(), EngineError> {
    // The opening move needs a non-empty interior range.
    if board_size == 0 || 2 * opening_margin >= board_size {
        return Err(EngineError::InvalidConfiguration);
    }
    Ok(())
}
