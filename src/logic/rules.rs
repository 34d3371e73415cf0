use crate::engine::Move;
use crate::logic::board::{Board, Player};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Consecutive marks required to win.
pub const WIN_LENGTH: usize = 5;

/// Directions walked when looking for a winning run. Only the four
/// "forward" directions are needed because every run is found from its
/// first cell under the row-major scan.
const RUN_DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 1), (1, 0), (1, -1)];

/// Derived state of a board position. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Draw,
    Win(Player),
}

impl GameStatus {
    #[must_use]
    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Win(p) => Some(p),
            _ => None,
        }
    }
}

/// Scans the board in row-major order; the first run of five or more
/// equal marks (checked along →, ↘, ↓, ↙ in that order) decides the
/// winner. With no winner the position is in progress while any empty
/// cell remains, otherwise drawn.
#[must_use]
pub fn check_status(board: &Board) -> GameStatus {
    let size = board.size();
    let mut has_empty = false;
    for row in 0..size {
        for col in 0..size {
            let Some(player) = board.get(row, col) else {
                has_empty = true;
                continue;
            };
            for (dr, dc) in RUN_DIRECTIONS {
                let mut run = 0usize;
                let mut r = row as isize;
                let mut c = col as isize;
                while board.in_bounds(r, c) && board.get(r as usize, c as usize) == Some(player) {
                    run += 1;
                    r += dr;
                    c += dc;
                }
                if run >= WIN_LENGTH {
                    return GameStatus::Win(player);
                }
            }
        }
    }
    if has_empty {
        GameStatus::InProgress
    } else {
        GameStatus::Draw
    }
}

/// Empty cells adjacent (8-neighborhood) to at least one mark, in
/// row-major order. This order is the tie-break order for every
/// "first best" selection in both engines. Empty board: empty list,
/// callers open with [`random_opening_move`].
#[must_use]
pub fn candidate_moves(board: &Board) -> Vec<Move> {
    let size = board.size();
    let mut moves = Vec::new();
    for row in 0..size {
        for col in 0..size {
            if board.get(row, col).is_some() {
                continue;
            }
            if has_occupied_neighbor(board, row, col) {
                moves.push(Move { row, col });
            }
        }
    }
    moves
}

/// True when any of the up to eight neighboring cells holds a mark.
#[must_use]
pub fn has_occupied_neighbor(board: &Board, row: usize, col: usize) -> bool {
    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let r = row as isize + dr;
            let c = col as isize + dc;
            if board.in_bounds(r, c) && board.get(r as usize, c as usize).is_some() {
                return true;
            }
        }
    }
    false
}

/// Uniformly random cell at least `margin` away from every edge. Used
/// for the opening move, where [`candidate_moves`] has nothing to offer.
/// Callers must validate `2 * margin < size` beforehand.
pub fn random_opening_move<R: Rng>(board: &Board, margin: usize, rng: &mut R) -> Move {
    let size = board.size();
    Move {
        row: rng.gen_range(margin..size - margin),
        col: rng.gen_range(margin..size - margin),
    }
}
