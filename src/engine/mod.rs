use crate::logic::board::Board;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod eval;
pub mod mcts;
pub mod search;

pub use mcts::MctsEngine;
pub use search::MinimaxEngine;

/// A grid coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

/// Diagnostics returned alongside a move.
///
/// `value` is the engine's estimate of the chosen move (relative score
/// for minimax, mean win-score for MCTS). `simulations` is the number of
/// completed MCTS iterations, zero for minimax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub value: f64,
    pub simulations: u32,
    pub elapsed_ms: u64,
}

/// Recoverable error conditions. Engines never abort the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineError {
    /// The board is non-empty but offers no candidate move.
    NoLegalMoves,
    /// Board dimensions mismatch the engine's configured size.
    InvalidBoard,
    /// Non-positive thinking time, search depth, or degenerate margin.
    InvalidConfiguration,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLegalMoves => write!(f, "no legal move on a non-empty board"),
            Self::InvalidBoard => write!(f, "board size does not match engine configuration"),
            Self::InvalidConfiguration => write!(f, "invalid engine configuration"),
        }
    }
}

impl std::error::Error for EngineError {}

/// The single capability both engines expose: given a board snapshot,
/// return the next move plus diagnostics. The caller owns the board and
/// applies the move itself; engines only ever mutate private clones.
pub trait Searcher {
    fn calculate_move(&mut self, board: &Board) -> Result<(Move, SearchStats), EngineError>;
}

/// Closed set of engine implementations behind one tag, so a
/// turn-management layer can hold either without downcasting.
pub enum EnginePlayer {
    Minimax(MinimaxEngine),
    Mcts(MctsEngine),
}

impl Searcher for EnginePlayer {
    fn calculate_move(&mut self, board: &Board) -> Result<(Move, SearchStats), EngineError> {
        match self {
            Self::Minimax(engine) => engine.calculate_move(board),
            Self::Mcts(engine) => engine.calculate_move(board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{MctsConfig, MinimaxConfig};
    use crate::logic::board::Player;

    #[test]
    fn test_engine_player_delegates_to_either_engine() {
        let minimax = MinimaxConfig {
            board_size: 9,
            ..MinimaxConfig::default()
        };
        let mcts = MctsConfig {
            board_size: 9,
            thinking_time_ms: 50,
            ..MctsConfig::default()
        };
        let mut players = [
            EnginePlayer::Minimax(MinimaxEngine::with_seed(minimax, Player::O, 5).unwrap()),
            EnginePlayer::Mcts(MctsEngine::with_seed(mcts, Player::O, 5).unwrap()),
        ];

        let mut board = Board::new(9);
        board.place(4, 4, Player::X);
        for player in &mut players {
            let (mv, _) = player.calculate_move(&board).unwrap();
            assert_eq!(board.get(mv.row, mv.col), None);
        }
    }
}
