use gomoku_core::engine::config::MinimaxConfig;
use gomoku_core::engine::eval::{board_score, relative_score, WINNING_SCORE};
use gomoku_core::engine::search::MinimaxEngine;
use gomoku_core::engine::{Move, Searcher};
use gomoku_core::logic::board::{Board, Player};
use gomoku_core::logic::rules::candidate_moves;

fn engine(size: usize, depth: u8, bot: Player) -> MinimaxEngine {
    let config = MinimaxConfig {
        board_size: size,
        max_depth: depth,
        ..MinimaxConfig::default()
    };
    MinimaxEngine::with_seed(config, bot, 7).expect("valid config")
}

/// Plain minimax without pruning, mirroring the engine's shortcuts, used
/// to cross-check the alpha-beta values on quiet positions.
fn plain_search(board: &mut Board, bot: Player, depth: u8, max_depth: u8, maximizing: bool) -> f64 {
    if depth == max_depth {
        return relative_score(board, bot, maximizing);
    }

    let mover = if maximizing { bot } else { bot.opposite() };
    for mv in candidate_moves(board) {
        board.place(mv.row, mv.col, mover);
        let score = board_score(board, mover, true);
        board.clear_cell(mv.row, mv.col);
        if score >= WINNING_SCORE {
            return relative_score(board, bot, maximizing);
        }
    }

    let moves = candidate_moves(board);
    if moves.is_empty() {
        return relative_score(board, bot, maximizing);
    }

    let mut best = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    for mv in moves {
        board.place(mv.row, mv.col, mover);
        let value = plain_search(board, bot, depth + 1, max_depth, !maximizing);
        board.clear_cell(mv.row, mv.col);
        best = if maximizing {
            best.max(value)
        } else {
            best.min(value)
        };
    }
    best
}

#[test]
fn test_completes_five_at_any_depth() {
    let mut board = Board::new(5);
    for c in 0..4 {
        board.place(0, c, Player::X);
    }
    board.place(2, 2, Player::O);

    for depth in 1..=3 {
        let mut engine = engine(5, depth, Player::X);
        let (mv, _) = engine.calculate_move(&board).expect("move found");
        assert_eq!(mv, Move { row: 0, col: 4 }, "depth {depth}");
    }
}

#[test]
fn test_prefers_own_win_over_blocking() {
    // Both sides have a four; the side to move must finish its own.
    let board = Board::from_rows(&[
        ".........", //
        ".OOOO....",
        ".........",
        ".XXXX....",
        ".........",
        ".........",
        ".........",
        ".........",
        ".........",
    ]);
    let mut engine = engine(9, 2, Player::O);
    let (mv, stats) = engine.calculate_move(&board).expect("move found");
    let mut after = board;
    after.place(mv.row, mv.col, Player::O);
    assert!(board_score(&after, Player::O, true) >= WINNING_SCORE);
    assert!(stats.value >= 1.0);
}

#[test]
fn test_blocks_half_open_four() {
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
    let mut engine = engine(9, 2, Player::O);
    let (mv, _) = engine.calculate_move(&board).expect("move found");
    assert_eq!(mv, Move { row: 4, col: 5 });
}

#[test]
fn test_blocks_vertical_four() {
    let board = Board::from_rows(&[
        "..O......", //
        "..X......",
        "..X......",
        "..X......",
        "..X......",
        ".........",
        ".........",
        ".........",
        ".........",
    ]);
    let mut engine = engine(9, 2, Player::O);
    let (mv, _) = engine.calculate_move(&board).expect("move found");
    assert_eq!(mv, Move { row: 5, col: 2 });
}

#[test]
fn test_repeated_calls_agree() {
    // The engine keeps no state between searches.
    let board = Board::from_rows(&[
        ".........", //
        ".........",
        "..XO.....",
        "..OX.....",
        "....X....",
        ".........",
        ".........",
        ".........",
        ".........",
    ]);
    let mut engine = engine(9, 2, Player::O);
    let first = engine.calculate_move(&board).expect("move found");
    let second = engine.calculate_move(&board).expect("move found");
    assert_eq!(first.0, second.0);
    assert_eq!(first.1.value, second.1.value);
}

#[test]
fn test_pruned_value_matches_plain_minimax() {
    // Quiet midgame positions, no win in sight within the horizon.
    let positions = [
        Board::from_rows(&[
            "......", //
            ".X....",
            "..O...",
            "..XO..",
            "......",
            "......",
        ]),
        Board::from_rows(&[
            "......", //
            "......",
            ".XO...",
            ".OX...",
            "..X...",
            "......",
        ]),
    ];

    for board in positions {
        let mut engine = engine(6, 2, Player::X);
        let (_, stats) = engine.calculate_move(&board).expect("move found");
        let mut scratch = board.clone();
        let expected = plain_search(&mut scratch, Player::X, 0, 2, true);
        assert!(
            (stats.value - expected).abs() < 1e-9,
            "pruned {} vs plain {}",
            stats.value,
            expected
        );
        // The search must leave the caller's board untouched.
        assert_eq!(scratch, board);
    }
}

#[test]
fn test_search_value_is_relative_score_at_horizon() {
    // Depth 1, bot to move: the reported value is the best reachable
    // relative score one stone ahead.
    let board = Board::from_rows(&[
        ".....", //
        ".X...",
        ".....",
        ".....",
        ".....",
    ]);
    let mut engine = engine(5, 1, Player::X);
    let (mv, stats) = engine.calculate_move(&board).expect("move found");

    let mut best = f64::NEG_INFINITY;
    for candidate in candidate_moves(&board) {
        let mut scratch = board.clone();
        scratch.place(candidate.row, candidate.col, Player::X);
        best = best.max(relative_score(&scratch, Player::X, false));
    }
    let mut after = board;
    after.place(mv.row, mv.col, Player::X);
    assert!((stats.value - best).abs() < 1e-9);
    assert!((relative_score(&after, Player::X, false) - best).abs() < 1e-9);
}
