use crate::engine::config::MctsConfig;
use crate::engine::{EngineError, Move, SearchStats, Searcher};
use crate::logic::board::{Board, Player};
use crate::logic::rules::{candidate_moves, check_status, random_opening_move, GameStatus};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// UCB1 exploration coefficient.
const EXPLORATION: f64 = 2.0;
/// Reward credited to a node's owner when a rollout ends in their win.
const WIN_REWARD: f64 = 10.0;
/// Sentinel assigned to a node whose child hands the opponent an
/// immediate win, pushing selection away from that branch.
const BLOCKED_SCORE: f64 = -(u32::MAX as f64);

pub type NodeId = usize;

/// One position in the search tree. `player` is the side that made the
/// move leading into this node; its board is the parent's board with
/// exactly that one mark added.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub board: Board,
    pub mv: Option<Move>,
    pub player: Player,
    pub visits: u32,
    pub win_score: f64,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena of search nodes addressed by stable indices. Parent links are
/// plain indices, never owning, so the parent/child cycle needs no
/// reference counting. Re-rooting rebuilds the arena and drops every
/// node outside the kept subtree.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    root: NodeId,
}

impl SearchTree {
    #[must_use]
    pub fn new(board: Board, player: Player) -> Self {
        Self {
            nodes: vec![SearchNode {
                board,
                mv: None,
                player,
                visits: 0,
                win_score: 0.0,
                parent: None,
                children: Vec::new(),
            }],
            root: 0,
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id]
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sum of visit counts over the whole tree.
    #[must_use]
    pub fn total_visits(&self) -> u64 {
        self.nodes.iter().map(|n| u64::from(n.visits)).sum()
    }

    fn add_child(&mut self, parent: NodeId, board: Board, mv: Move, player: Player) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(SearchNode {
            board,
            mv: Some(mv),
            player,
            visits: 0,
            win_score: 0.0,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Makes `new_root` the root, keeping only its subtree. Node order
    /// within each child list is preserved, so tie-breaks stay stable
    /// across turns.
    fn rebase(&mut self, new_root: NodeId) {
        let mut order = vec![new_root];
        let mut i = 0;
        while i < order.len() {
            let id = order[i];
            order.extend_from_slice(&self.nodes[id].children);
            i += 1;
        }

        let mut remap = vec![usize::MAX; self.nodes.len()];
        for (new_id, &old_id) in order.iter().enumerate() {
            remap[old_id] = new_id;
        }

        let mut old_nodes: Vec<Option<SearchNode>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for &old_id in &order {
            let mut node = old_nodes[old_id]
                .take()
                .expect("subtree nodes are visited once");
            node.parent = node.parent.map(|p| remap[p]);
            node.children = node.children.iter().map(|&c| remap[c]).collect();
            nodes.push(node);
        }
        nodes[0].parent = None;
        self.nodes = nodes;
        self.root = 0;
    }
}

/// Local heuristic for the move that produced a node: the four lines
/// through the move point are walked outward while cells match the
/// mover's mark. Open runs score length squared, half-blocked runs a
/// quarter of that, dead runs nothing. A run that already reaches five
/// scores fully regardless of blocking.
#[must_use]
pub fn move_heuristic(board: &Board, mv: Move, player: Player) -> f64 {
    let mut total = 0.0;
    for (dr, dc) in [(0isize, 1isize), (1, 0), (1, 1), (1, -1)] {
        let mut length = 1usize;
        let mut blocked = 0u8;
        for sign in [1isize, -1] {
            let mut r = mv.row as isize + dr * sign;
            let mut c = mv.col as isize + dc * sign;
            while board.in_bounds(r, c) && board.get(r as usize, c as usize) == Some(player) {
                length += 1;
                r += dr * sign;
                c += dc * sign;
            }
            if !board.in_bounds(r, c) || board.get(r as usize, c as usize).is_some() {
                blocked += 1;
            }
        }
        let squared = (length * length) as f64;
        total += if length >= 5 {
            squared
        } else {
            match blocked {
                0 => squared,
                1 => squared / 4.0,
                _ => 0.0,
            }
        };
    }
    total
}

/// Tree-policy value of a child during selection. Unvisited children are
/// valued by the heuristic alone instead of the usual infinite priority,
/// so promising unexplored moves beat weak ones.
fn uct_value(parent_visits: u32, child: &SearchNode) -> f64 {
    let heuristic = match child.mv {
        Some(mv) => move_heuristic(&child.board, mv, child.player),
        None => 0.0,
    };
    if child.visits == 0 {
        return heuristic;
    }
    let visits = f64::from(child.visits);
    child.win_score / visits
        + EXPLORATION * (f64::from(parent_visits).ln() / visits).sqrt()
        + heuristic / (visits + 1.0)
}

/// Wall-clock-bounded Monte Carlo Tree Search.
///
/// Owns a private sequential tree that survives across turns: when the
/// next board matches a child of the previous root, that subtree is
/// reused instead of starting cold. Not shareable across concurrent
/// searches.
pub struct MctsEngine {
    config: MctsConfig,
    bot: Player,
    tree: Option<SearchTree>,
    rng: StdRng,
}

impl MctsEngine {
    pub fn new(config: MctsConfig, bot: Player) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            bot,
            tree: None,
            rng: StdRng::from_entropy(),
        })
    }

    /// Same as [`new`](Self::new) but seeded, for reproducible searches:
    /// all tie-breaks follow child-creation order, so the seed pins down
    /// the whole run.
    pub fn with_seed(config: MctsConfig, bot: Player, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            bot,
            tree: None,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub const fn bot(&self) -> Player {
        self.bot
    }

    /// Read-only view of the retained search tree, for diagnostics and
    /// tests.
    #[must_use]
    pub fn tree(&self) -> Option<&SearchTree> {
        self.tree.as_ref()
    }

    /// Visit count of the current root, if a tree is retained.
    #[must_use]
    pub fn root_visits(&self) -> Option<u32> {
        self.tree.as_ref().map(|t| t.node(t.root()).visits)
    }

    /// Descends from the root, at each level taking the first child with
    /// the maximal tree-policy value, until a leaf is reached.
    fn select(tree: &SearchTree) -> NodeId {
        let mut id = tree.root();
        while !tree.children(id).is_empty() {
            let parent_visits = tree.node(id).visits;
            let mut best = id;
            let mut best_value = f64::NEG_INFINITY;
            for &child in tree.children(id) {
                let value = uct_value(parent_visits, tree.node(child));
                if value > best_value {
                    best_value = value;
                    best = child;
                }
            }
            id = best;
        }
        id
    }

    /// Creates one child per candidate move of `id`'s board, each owning
    /// a clone of that board with the opponent's mark applied.
    fn expand(tree: &mut SearchTree, id: NodeId) {
        let mover = tree.node(id).player.opposite();
        for mv in candidate_moves(&tree.node(id).board) {
            let mut board = tree.node(id).board.clone();
            board.place(mv.row, mv.col, mover);
            tree.add_child(id, board, mv, mover);
        }
    }

    /// Plays uniformly-random moves from `id`'s position until the game
    /// ends. A position where the bot's opponent has already won is not
    /// played out: the parent gets the blocking sentinel and the loss is
    /// reported as-is.
    fn simulate(&mut self, tree: &mut SearchTree, id: NodeId) -> GameStatus {
        let mut board = tree.node(id).board.clone();
        let mut player = tree.node(id).player;

        let mut status = check_status(&board);
        if status == GameStatus::Win(self.bot.opposite()) {
            if let Some(parent) = tree.node(id).parent {
                tree.node_mut(parent).win_score = BLOCKED_SCORE;
            }
            return status;
        }

        while status == GameStatus::InProgress {
            player = player.opposite();
            let moves = candidate_moves(&board);
            let Some(mv) = moves.choose(&mut self.rng) else {
                break;
            };
            board.place(mv.row, mv.col, player);
            status = check_status(&board);
        }
        status
    }

    /// Walks from `id` up to the root inclusive, counting the visit and
    /// rewarding every ancestor whose mover matches the winner.
    fn backpropagate(tree: &mut SearchTree, id: NodeId, status: GameStatus) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = tree.node_mut(node_id);
            node.visits += 1;
            if status == GameStatus::Win(node.player) {
                node.win_score += WIN_REWARD;
            }
            current = node.parent;
        }
    }

    /// Reuses the retained tree when the given board matches the current
    /// root or one of its children; otherwise starts a fresh root. A
    /// fresh root records the opponent as the player who just moved, so
    /// its children are the bot's own moves.
    fn reroot(&mut self, board: &Board) -> SearchTree {
        if let Some(mut tree) = self.tree.take() {
            if tree.node(tree.root()).board == *board {
                return tree;
            }
            let matching = tree
                .children(tree.root())
                .iter()
                .copied()
                .find(|&c| tree.node(c).board == *board);
            if let Some(child) = matching {
                tree.rebase(child);
                return tree;
            }
        }
        SearchTree::new(board.clone(), self.bot.opposite())
    }
}

impl Searcher for MctsEngine {
    fn calculate_move(&mut self, board: &Board) -> Result<(Move, SearchStats), EngineError> {
        if board.size() != self.config.board_size {
            return Err(EngineError::InvalidBoard);
        }
        let start = Instant::now();

        if board.is_empty() {
            let mv = random_opening_move(board, self.config.opening_margin, &mut self.rng);
            debug!("mcts {:?} opens at ({}, {})", self.bot, mv.row, mv.col);
            return Ok((
                mv,
                SearchStats {
                    value: 0.0,
                    simulations: 0,
                    elapsed_ms: start.elapsed().as_millis() as u64,
                },
            ));
        }

        if candidate_moves(board).is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        let mut tree = self.reroot(board);
        let budget = Duration::from_millis(self.config.thinking_time_ms);
        let mut simulations = 0u32;

        // The deadline is only checked between iterations; one slow
        // iteration may overshoot it.
        while start.elapsed() <= budget {
            let leaf = Self::select(&tree);
            if check_status(&tree.node(leaf).board) == GameStatus::InProgress {
                Self::expand(&mut tree, leaf);
            }
            let target = tree
                .children(leaf)
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(leaf);
            let status = self.simulate(&mut tree, target);
            Self::backpropagate(&mut tree, target, status);
            simulations += 1;
        }

        let mut best: Option<(NodeId, f64)> = None;
        for &child in tree.children(tree.root()) {
            let node = tree.node(child);
            let value = if node.visits == 0 {
                f64::NEG_INFINITY
            } else {
                node.win_score / f64::from(node.visits)
            };
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((child, value));
            }
        }
        let (child, value) = best.ok_or(EngineError::NoLegalMoves)?;
        let mv = tree.node(child).mv.ok_or(EngineError::NoLegalMoves)?;

        tree.rebase(child);
        self.tree = Some(tree);

        debug!(
            "mcts {:?} plays ({}, {}) value {:.3} after {} simulations",
            self.bot, mv.row, mv.col, value, simulations
        );
        Ok((
            mv,
            SearchStats {
                value,
                simulations,
                elapsed_ms: start.elapsed().as_millis() as u64,
            },
        ))
    }
}
