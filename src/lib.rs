//! Move-deciding core for five-in-a-row (gomoku) on an N×N grid.
//!
//! Two engines share the board rules in [`logic`]: a depth-limited
//! alpha-beta search with a run-based heuristic evaluator, and a
//! wall-clock-bounded Monte Carlo Tree Search with a UCB1 tree policy
//! biased by a local heuristic. Rendering, input capture and turn
//! management live outside this crate; callers hand in a board snapshot
//! and get back a coordinate plus diagnostics.

pub mod engine;
pub mod logic;
