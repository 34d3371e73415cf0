use crate::engine::config::MinimaxConfig;
use crate::engine::eval::{board_score, relative_score, WINNING_SCORE};
use crate::engine::{EngineError, Move, SearchStats, Searcher};
use crate::logic::board::{Board, Player};
use crate::logic::rules::{candidate_moves, random_opening_move};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

/// Depth-bounded minimax with alpha-beta pruning.
///
/// Stateless between calls apart from its configuration; every search
/// works on a private clone of the caller's board.
pub struct MinimaxEngine {
    config: MinimaxConfig,
    bot: Player,
    rng: StdRng,
}

impl MinimaxEngine {
    pub fn new(config: MinimaxConfig, bot: Player) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            bot,
            rng: StdRng::from_entropy(),
        })
    }

    /// Same as [`new`](Self::new) but with a fixed opening-move seed, for
    /// reproducible games.
    pub fn with_seed(config: MinimaxConfig, bot: Player, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            bot,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub const fn bot(&self) -> Player {
        self.bot
    }

    /// First candidate move, in generation order, that completes a five
    /// for `side`. Restores the board before returning.
    fn winning_move(&self, board: &mut Board, side: Player) -> Option<Move> {
        for mv in candidate_moves(board) {
            board.place(mv.row, mv.col, side);
            let score = board_score(board, side, true);
            board.clear_cell(mv.row, mv.col);
            if score >= WINNING_SCORE {
                return Some(mv);
            }
        }
        None
    }

    /// Recursive alpha-beta search. `maximizing` means the bot is to
    /// move. The cutoff is fail-hard: when a child's value crosses the
    /// opposite bound, that child's value is returned as-is rather than
    /// the running best, which keeps the pruned and unpruned searches in
    /// exact agreement on the reported value.
    fn search(
        &self,
        board: &mut Board,
        depth: u8,
        maximizing: bool,
        mut alpha: f64,
        mut beta: f64,
    ) -> (Option<Move>, f64) {
        if depth == self.config.max_depth {
            return (None, relative_score(board, self.bot, maximizing));
        }

        let mover = if maximizing {
            self.bot
        } else {
            self.bot.opposite()
        };
        if let Some(mv) = self.winning_move(board, mover) {
            return (Some(mv), relative_score(board, self.bot, maximizing));
        }

        let moves = candidate_moves(board);
        if moves.is_empty() {
            return (None, relative_score(board, self.bot, maximizing));
        }

        if maximizing {
            let mut best_move = None;
            let mut best_value = -1.0;
            for mv in moves {
                board.place(mv.row, mv.col, mover);
                let (_, value) = self.search(board, depth + 1, false, alpha, beta);
                board.clear_cell(mv.row, mv.col);

                if value > alpha {
                    alpha = value;
                }
                if value >= beta {
                    return (Some(mv), value);
                }
                if value > best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
            }
            (best_move, best_value)
        } else {
            let mut best_move = None;
            let mut best_value = WINNING_SCORE;
            for mv in moves {
                board.place(mv.row, mv.col, mover);
                let (_, value) = self.search(board, depth + 1, true, alpha, beta);
                board.clear_cell(mv.row, mv.col);

                if value < beta {
                    beta = value;
                }
                if value <= alpha {
                    return (Some(mv), value);
                }
                if value < best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
            }
            (best_move, best_value)
        }
    }
}

impl Searcher for MinimaxEngine {
    fn calculate_move(&mut self, board: &Board) -> Result<(Move, SearchStats), EngineError> {
        if board.size() != self.config.board_size {
            return Err(EngineError::InvalidBoard);
        }
        let start = Instant::now();

        if board.is_empty() {
            let mv = random_opening_move(board, self.config.opening_margin, &mut self.rng);
            debug!("minimax {:?} opens at ({}, {})", self.bot, mv.row, mv.col);
            return Ok((
                mv,
                SearchStats {
                    value: 0.0,
                    simulations: 0,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                },
            ));
        }

        let mut scratch = board.clone();

        if let Some(mv) = self.winning_move(&mut scratch, self.bot) {
            debug!("minimax {:?} wins at ({}, {})", self.bot, mv.row, mv.col);
            return Ok((
                mv,
                SearchStats {
                    value: relative_score(board, self.bot, true),
                    simulations: 0,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                },
            ));
        }

        if candidate_moves(board).is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        // Relative scores are non-negative, so -1 acts as an unbounded
        // alpha; values at or above WINNING_SCORE only occur in won
        // positions, which the shortcut above already intercepts.
        let (mv, value) = self.search(&mut scratch, 0, true, -1.0, WINNING_SCORE);
        let mv = mv.ok_or(EngineError::NoLegalMoves)?;
        debug!(
            "minimax {:?} plays ({}, {}) value {:.3}",
            self.bot, mv.row, mv.col, value
        );
        Ok((
            mv,
            SearchStats {
                value,
                simulations: 0,
                elapsed_ms: start.elapsed().as_millis() as u64,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(size: usize, depth: u8) -> MinimaxEngine {
        let config = MinimaxConfig {
            board_size: size,
            max_depth: depth,
            ..MinimaxConfig::default()
        };
        MinimaxEngine::with_seed(config, Player::O, 1).unwrap()
    }

    #[test]
    fn test_rejects_mismatched_board() {
        let mut engine = engine(9, 2);
        let board = Board::new(11);
        assert_eq!(
            engine.calculate_move(&board),
            Err(EngineError::InvalidBoard)
        );
    }

    #[test]
    fn test_opening_move_is_interior() {
        let mut engine = engine(9, 2);
        let board = Board::new(9);
        let (mv, stats) = engine.calculate_move(&board).unwrap();
        assert!((1..8).contains(&mv.row));
        assert!((1..8).contains(&mv.col));
        assert_eq!(stats.simulations, 0);
    }

    #[test]
    fn test_completes_own_five() {
        let mut engine = engine(9, 1);
        let mut board = Board::new(9);
        for c in 1..5 {
            board.place(4, c, Player::O);
        }
        board.place(5, 5, Player::X);
        let (mv, _) = engine.calculate_move(&board).unwrap();
        // Either end completes the five; generation order picks (4, 0).
        assert_eq!(mv, Move { row: 4, col: 0 });
    }

    #[test]
    fn test_blocks_opponent_open_four() {
        let mut engine = engine(9, 2);
        let board = Board::from_rows(&[
            ".........", //
            ".........",
            ".........",
            ".........",
            "OXXXX....",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let (mv, _) = engine.calculate_move(&board).unwrap();
        assert_eq!(mv, Move { row: 4, col: 5 });
    }

    #[test]
    fn test_full_board_has_no_legal_moves() {
        let mut engine = engine(5, 2);
        let mut board = Board::new(5);
        for r in 0..5 {
            for c in 0..5 {
                let player = if (r * 5 + c) / 2 % 2 == 0 {
                    Player::X
                } else {
                    Player::O
                };
                board.place(r, c, player);
            }
        }
        assert_eq!(
            engine.calculate_move(&board),
            Err(EngineError::NoLegalMoves)
        );
    }
}
