//! Iterative-deepening negamax with alpha-beta pruning, move ordering, a
//! transposition table, and cooperative cancellation.
//!
//! Board and Hands are value types (see [`shogi_core::apply_move`]), so
//! unlike a mutate/undo chess engine this search never reverts a move —
//! every recursive call simply receives the already-applied child state.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use shogi_core::{apply_move, in_check, position_hash, Board, Color, Hands, Move};
use tracing::debug;

use crate::control::SearchControl;
use crate::eval::evaluate as default_evaluate;
use crate::heuristics::KillerTable;
use crate::ordering::order_moves;
use crate::tt::{score_from_tt, score_to_tt, Bound, TranspositionTable, TtEntry};

/// Score representing an unreachable bound — wider than any real
/// evaluation or mate score.
pub const INF: i32 = 30_000;

/// Base score for checkmate. A mate found at ply `p` scores
/// `MATE_SCORE - p`, so closer mates score higher (for the winner).
pub const MATE_SCORE: i32 = 29_000;

/// Scores at or beyond this magnitude indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 28_000;

fn default_generate_moves(board: &Board, hands: &Hands, side: Color) -> Vec<Move> {
    shogi_core::generate_legal_moves(board, hands, side)
}

/// Tunable dependencies and limits for one [`Searcher::search`] call.
///
/// `evaluate` and `generate_moves` default to the crate's own evaluator
/// and legal-move generator; tests may substitute stubs to exercise the
/// search machinery in isolation.
pub struct SearchOptions<'a> {
    pub max_depth: u32,
    pub time_limit: Duration,
    pub evaluate: &'a dyn Fn(&Board, &Hands, Color) -> i32,
    pub generate_moves: &'a dyn Fn(&Board, &Hands, Color) -> Vec<Move>,
}

impl<'a> SearchOptions<'a> {
    pub fn new(max_depth: u32, time_limit: Duration) -> Self {
        SearchOptions {
            max_depth,
            time_limit,
            evaluate: &default_evaluate,
            generate_moves: &default_generate_moves,
        }
    }
}

/// Result of a completed (or best-effort) [`Searcher::search`] call.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// `None` only when `root_moves` was empty (a terminal position).
    pub best_move: Option<Move>,
    /// Centipawn score from `side`'s point of view.
    pub score: i32,
    /// Depth of the last fully completed iteration (0 if none completed).
    pub depth: u32,
    /// Principal variation from the last fully completed iteration.
    pub pv: Vec<Move>,
    pub nodes: u64,
    pub time: Duration,
}

/// Deepest ply the PV table tracks, matching [`crate::heuristics::MAX_PLY`].
const MAX_PLY: usize = crate::heuristics::MAX_PLY;

/// Per-ply principal variation lines. `lines[ply]` holds the best
/// continuation found so far starting at `ply`, updated whenever a move
/// at that ply improves alpha to an exact score.
struct PvTable {
    lines: Vec<Vec<Move>>,
}

impl PvTable {
    fn new() -> Self {
        PvTable { lines: vec![Vec::new(); MAX_PLY] }
    }

    fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        let mut line = vec![mv];
        if ply + 1 < MAX_PLY {
            line.extend(self.lines[ply + 1].iter().copied());
        }
        self.lines[ply] = line;
    }

    fn move_at(&self, ply: usize) -> Option<Move> {
        self.lines.get(ply).and_then(|l| l.first().copied())
    }

    fn root_pv(&self) -> Vec<Move> {
        self.lines[0].clone()
    }
}

/// State threaded through every recursive [`negamax`] call within one
/// top-level search, persisting across iterative-deepening iterations so
/// killer and PV information carries forward (cleared only at
/// [`Searcher::search`]'s entry).
struct SearchContext<'a> {
    nodes: u64,
    tt: &'a mut TranspositionTable,
    killers: KillerTable,
    pv: PvTable,
    control: &'a SearchControl,
    evaluate: &'a dyn Fn(&Board, &Hands, Color) -> i32,
    generate_moves: &'a dyn Fn(&Board, &Hands, Color) -> Vec<Move>,
}

/// Iterative-deepening searcher owning its transposition table.
///
/// The table persists across calls (so a fresh `Searcher` doesn't have to
/// reallocate it every move), but [`Searcher::search`] clears it at entry —
/// it is never reused between top-level searches.
pub struct Searcher {
    tt: TranspositionTable,
}

impl Searcher {
    pub fn new() -> Self {
        Searcher { tt: TranspositionTable::default() }
    }

    pub fn with_tt_capacity(capacity: usize) -> Self {
        Searcher { tt: TranspositionTable::new(capacity) }
    }

    /// Run iterative deepening from depth 1 to `options.max_depth`,
    /// searching only moves in `root_moves` (the caller's already-filtered
    /// legal move list). `stop` is a shared flag the caller (or another
    /// thread) may set to request cancellation; it is checked at every
    /// node and at every depth boundary.
    ///
    /// Returns the best move and score from the last fully completed
    /// iteration. If no iteration completes before time runs out or
    /// `stop` fires, returns a shallow best-effort result built from a
    /// single static evaluation of each root move.
    pub fn search(
        &mut self,
        board: &Board,
        hands: &Hands,
        side: Color,
        root_moves: &[Move],
        options: &SearchOptions,
        stop: Arc<AtomicBool>,
    ) -> SearchResult {
        let start = Instant::now();
        self.tt.clear();

        if root_moves.is_empty() {
            return SearchResult { best_move: None, score: 0, depth: 0, pv: Vec::new(), nodes: 0, time: start.elapsed() };
        }

        let control = SearchControl::new(stop, options.time_limit);
        let mut ctx = SearchContext {
            nodes: 0,
            tt: &mut self.tt,
            killers: KillerTable::new(),
            pv: PvTable::new(),
            control: &control,
            evaluate: options.evaluate,
            generate_moves: options.generate_moves,
        };

        // Best-effort fallback if not even depth 1 completes.
        let mut completed_move = root_moves[0];
        let mut completed_score = (options.evaluate)(board, hands, side);
        let mut completed_depth = 0u32;
        let mut completed_pv = vec![completed_move];

        'iterating: for depth in 1..=options.max_depth {
            if control.should_stop_iterating() {
                break;
            }

            let mut moves = root_moves.to_vec();
            let pv_move = ctx.pv.move_at(0);
            order_moves(&mut moves, board, hands, side, 0, pv_move, &ctx.killers);

            let mut iter_best_move = moves[0];
            let mut iter_best_score = -INF;

            for mv in &moves {
                let (child_board, child_hands, opponent) =
                    apply_move(*board, *hands, side, *mv).expect("root move is legal by construction");

                let score = -negamax(&child_board, &child_hands, opponent, -INF, -iter_best_score, depth.saturating_sub(1), 1, &mut ctx);

                if control.should_stop(ctx.nodes) {
                    break 'iterating;
                }

                if score > iter_best_score {
                    iter_best_score = score;
                    iter_best_move = *mv;
                    ctx.pv.update(0, *mv);
                }
            }

            completed_move = iter_best_move;
            completed_score = iter_best_score;
            completed_depth = depth;
            completed_pv = ctx.pv.root_pv();
            debug!(depth, score = completed_score, nodes = ctx.nodes, "iteration complete");
        }

        SearchResult {
            best_move: Some(completed_move),
            score: completed_score,
            depth: completed_depth,
            pv: completed_pv,
            nodes: ctx.nodes,
            time: start.elapsed(),
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new()
    }
}

/// Negamax with alpha-beta pruning. Returns the score from `side`'s POV.
fn negamax(
    board: &Board,
    hands: &Hands,
    side: Color,
    mut alpha: i32,
    beta: i32,
    depth: u32,
    ply: usize,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.nodes += 1;

    if ctx.control.should_stop(ctx.nodes) {
        return 0;
    }

    let key = position_hash(board, hands);
    let tt_entry = ctx.tt.probe(key).copied();
    if let Some(entry) = tt_entry {
        if entry.depth >= depth {
            let score = score_from_tt(entry.score, ply as u32);
            let cutoff = match entry.bound {
                Bound::Exact => true,
                Bound::LowerBound => score >= beta,
                Bound::UpperBound => score <= alpha,
            };
            if cutoff {
                return score;
            }
        }
    }
    let tt_move = tt_entry.and_then(|e| e.best_move);

    if depth == 0 {
        return (ctx.evaluate)(board, hands, side);
    }

    let mut moves = (ctx.generate_moves)(board, hands, side);
    if moves.is_empty() {
        return if in_check(board, side) { -(MATE_SCORE - ply as i32) } else { 0 };
    }

    let pv_move = ctx.pv.move_at(ply).or(tt_move);
    order_moves(&mut moves, board, hands, side, ply, pv_move, &ctx.killers);

    let original_alpha = alpha;
    let mut best_score = -INF;
    let mut best_move = moves[0];

    for mv in moves {
        let (child_board, child_hands, opponent) =
            apply_move(*board, *hands, side, mv).expect("generated move is legal by construction");

        let score = -negamax(&child_board, &child_hands, opponent, -beta, -alpha, depth - 1, ply + 1, ctx);

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
            ctx.pv.update(ply, mv);
        }
        if alpha >= beta {
            if !mv.is_capture() {
                ctx.killers.store(ply, mv);
            }
            break;
        }
    }

    let bound = if best_score <= original_alpha {
        Bound::UpperBound
    } else if best_score >= beta {
        Bound::LowerBound
    } else {
        Bound::Exact
    };
    ctx.tt.store(
        key,
        TtEntry { score: score_to_tt(best_score, ply as u32), depth, bound, best_move: Some(best_move) },
    );

    best_score
}
