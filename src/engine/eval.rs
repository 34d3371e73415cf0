use crate::logic::board::{Board, Player};

/// Score of a completed five-in-a-row. Kept deliberately huge so that
/// tactical scores never drown positional ones.
pub const WINNING_SCORE: f64 = 1e10;

/// Value of one maximal run. `blocked` counts ends occupied by the
/// opponent or off-board (0..=2). `is_turn` is true when the run's owner
/// is the side to move.
fn run_score(length: usize, blocked: u8, is_turn: bool) -> f64 {
    if length == 0 {
        return 0.0;
    }
    if blocked == 2 && length < 5 {
        // Dead run: cannot ever reach five.
        return 0.0;
    }
    match length {
        5 => WINNING_SCORE,
        4 => {
            if is_turn {
                WINNING_SCORE / 10.0
            } else if blocked == 0 {
                WINNING_SCORE / 100.0
            } else {
                200.0
            }
        }
        3 => {
            if blocked == 0 {
                if is_turn {
                    WINNING_SCORE / 1000.0
                } else {
                    200.0
                }
            } else if is_turn {
                10.0
            } else {
                5.0
            }
        }
        2 => {
            if blocked == 0 {
                if is_turn {
                    7.0
                } else {
                    5.0
                }
            } else {
                3.0
            }
        }
        1 => 1.0,
        // Six or more is still a finished game.
        _ => WINNING_SCORE * 10.0,
    }
}

/// Scans one line of cells, summing the score of every maximal run of
/// `side`'s marks. The line's two ends count as blocked.
fn scan_line(
    board: &Board,
    side: Player,
    is_turn: bool,
    cells: impl Iterator<Item = (usize, usize)>,
) -> f64 {
    let mut score = 0.0;
    let mut run = 0usize;
    let mut left_blocked = true;
    for (row, col) in cells {
        match board.get(row, col) {
            Some(p) if p == side => run += 1,
            Some(_) => {
                score += run_score(run, u8::from(left_blocked) + 1, is_turn);
                run = 0;
                left_blocked = true;
            }
            None => {
                score += run_score(run, u8::from(left_blocked), is_turn);
                run = 0;
                left_blocked = false;
            }
        }
    }
    score + run_score(run, u8::from(left_blocked) + 1, is_turn)
}

/// Sums run scores for `side` over every row, column and both diagonal
/// families. `is_turn`: whether `side` is the one to move.
#[must_use]
pub fn board_score(board: &Board, side: Player, is_turn: bool) -> f64 {
    let n = board.size();
    let mut score = 0.0;

    for row in 0..n {
        score += scan_line(board, side, is_turn, (0..n).map(move |col| (row, col)));
    }
    for col in 0..n {
        score += scan_line(board, side, is_turn, (0..n).map(move |row| (row, col)));
    }
    // ↘ diagonals, indexed by row - col.
    for d in 0..(2 * n - 1) {
        let start_row = (d + 1).saturating_sub(n);
        let start_col = n.saturating_sub(d + 1);
        let len = n - start_row.max(start_col);
        score += scan_line(
            board,
            side,
            is_turn,
            (0..len).map(move |i| (start_row + i, start_col + i)),
        );
    }
    // ↙ diagonals, indexed by row + col.
    for d in 0..(2 * n - 1) {
        let start_row = (d + 1).saturating_sub(n);
        let len = (d + 1).min(n) - start_row;
        score += scan_line(
            board,
            side,
            is_turn,
            (0..len).map(move |i| (start_row + i, d - (start_row + i))),
        );
    }
    score
}

/// Score of `bot`'s position relative to the opponent's, as used by the
/// minimax search. Strictly positive; the opponent score is clamped to 1
/// to keep the ratio defined on lopsided boards.
#[must_use]
pub fn relative_score(board: &Board, bot: Player, bot_to_move: bool) -> f64 {
    let own = board_score(board, bot, bot_to_move);
    let opp = board_score(board, bot.opposite(), !bot_to_move);
    own / opp.max(1.0)
}
