//! The embedder-facing engine facade tying together move generation,
//! search, evaluation, and the opening book.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use shogi_book::{BookEntry, BookError, OpeningBook};
use shogi_core::{generate_legal_moves, position_key, Board, Color, Hands, Move};
use shogi_engine::{evaluate, SearchOptions, Searcher};

use crate::config::{Difficulty, EngineConfig, BEGINNER_RANDOM_MOVE_CHANCE};
use crate::error::EngineError;

/// Snapshot of the engine's most recent position assessment, returned by
/// [`Engine::evaluate_position`] and cached for [`Engine::get_last_evaluation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEvaluation {
    /// Centipawn score from the evaluated side's point of view.
    pub score: i32,
    /// The move a search recommended, if this snapshot came from one.
    pub best_move: Option<Move>,
    /// Depth reached (0 for a bare static evaluation).
    pub depth: u32,
    pub nodes: u64,
}

/// Ties together [`shogi_core`]'s rules, [`shogi_engine`]'s search, and
/// [`shogi_book`]'s opening book behind a single difficulty-driven API.
pub struct Engine {
    difficulty: Difficulty,
    config: EngineConfig,
    searcher: Searcher,
    book: Option<OpeningBook>,
    stop_flag: Arc<AtomicBool>,
    last_evaluation: Option<PositionEvaluation>,
    rng: StdRng,
}

impl Engine {
    /// A new engine at `difficulty`, seeded from the OS entropy source.
    pub fn new(difficulty: Difficulty) -> Self {
        Engine::with_rng(difficulty, StdRng::from_entropy())
    }

    /// A new engine at `difficulty` with a fixed RNG seed, so beginner-move
    /// noise, root shuffling, and book draws are reproducible in tests.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Engine::with_rng(difficulty, StdRng::seed_from_u64(seed))
    }

    fn with_rng(difficulty: Difficulty, rng: StdRng) -> Self {
        Engine {
            difficulty,
            config: difficulty.config(),
            searcher: Searcher::new(),
            book: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            last_evaluation: None,
            rng,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.config = difficulty.config();
    }

    pub fn get_config(&self) -> EngineConfig {
        self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Replace the engine's opening book with entries drawn from `source`.
    /// Each item may itself be an ingestion failure (e.g. a malformed
    /// container record); the first error aborts the whole load and the
    /// engine keeps whichever book (if any) it had before — callers should
    /// treat a returned error as "continue running without a book".
    pub fn load_opening_book(
        &mut self,
        source: impl IntoIterator<Item = Result<(String, BookEntry), BookError>>,
        max_depth: Option<u32>,
    ) -> Result<usize, EngineError> {
        let mut book = OpeningBook::new();
        let mut loaded = 0;
        for item in source {
            let (key, entry) = item?;
            if let Some(max_depth) = max_depth {
                if entry.depth.is_some_and(|d| d > max_depth) {
                    continue;
                }
            }
            if book.add_entry(key, entry).is_ok() {
                loaded += 1;
            }
        }
        info!(loaded, "opening book loaded");
        self.book = Some(book);
        Ok(loaded)
    }

    /// The best move for `side` to play in `board`/`hands`.
    ///
    /// Consults the opening book first when enabled; otherwise runs a full
    /// search (with beginner-level noise substituted in, at
    /// [`Difficulty::Beginner`]). `history` is accepted for forward
    /// compatibility but unused — this engine does not detect repetition.
    pub fn calculate_best_move(
        &mut self,
        board: &Board,
        hands: &Hands,
        side: Color,
        _history: &[Move],
    ) -> Result<Move, EngineError> {
        let mut root_moves = generate_legal_moves(board, hands, side);
        if root_moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        if self.config.use_opening_book {
            if let Some(entry) = self.book_move(board, hands, side) {
                return Ok(entry);
            }
        }

        if self.difficulty.is_noisy() {
            root_moves.shuffle(&mut self.rng);
            if self.rng.gen_bool(BEGINNER_RANDOM_MOVE_CHANCE) {
                let idx = self.rng.gen_range(0..root_moves.len());
                debug!("beginner noise: playing a random legal move");
                return Ok(root_moves[idx]);
            }
        }

        self.search_best_move(board, hands, side, &root_moves)
    }

    fn book_move(&mut self, board: &Board, hands: &Hands, side: Color) -> Option<Move> {
        let book = self.book.as_ref()?;
        let key = position_key(&board.with_side_to_move(side), hands);
        let entry = book.find_move_randomized(&key, &mut self.rng)?;
        debug!(mv = %entry.mv, "opening book move selected");
        Some(entry.mv)
    }

    fn search_best_move(
        &mut self,
        board: &Board,
        hands: &Hands,
        side: Color,
        root_moves: &[Move],
    ) -> Result<Move, EngineError> {
        self.stop_flag = Arc::new(AtomicBool::new(false));
        let options = SearchOptions::new(self.config.search_depth, Duration::from_millis(self.config.time_limit_ms));
        let result = self.searcher.search(board, hands, side, root_moves, &options, Arc::clone(&self.stop_flag));

        self.last_evaluation = Some(PositionEvaluation {
            score: result.score,
            best_move: result.best_move,
            depth: result.depth,
            nodes: result.nodes,
        });

        result.best_move.ok_or(EngineError::SearchAborted)
    }

    /// Static evaluation of `board`/`hands` from `side`'s point of view,
    /// without running a search.
    pub fn evaluate_position(&self, board: &Board, hands: &Hands, side: Color) -> PositionEvaluation {
        PositionEvaluation { score: evaluate(board, hands, side), best_move: None, depth: 0, nodes: 0 }
    }

    pub fn generate_all_legal_moves(&self, board: &Board, hands: &Hands, side: Color) -> Vec<Move> {
        generate_legal_moves(board, hands, side)
    }

    /// Request cancellation of any search in flight. Idempotent; safe to
    /// call from another thread.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    pub fn get_last_evaluation(&self) -> Option<PositionEvaluation> {
        self.last_evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_presets_wire_through_get_config() {
        let engine = Engine::with_seed(Difficulty::Expert, 1);
        assert_eq!(engine.get_config(), Difficulty::Expert.config());
    }

    #[test]
    fn calculate_best_move_returns_legal_move_at_starting_position() {
        let mut engine = Engine::with_seed(Difficulty::Intermediate, 42);
        let board = Board::starting_position();
        let hands = Hands::new();
        let mv = engine.calculate_best_move(&board, &hands, Color::Sente, &[]).unwrap();
        let legal = generate_legal_moves(&board, &hands, Color::Sente);
        assert!(legal.contains(&mv));
    }

    #[test]
    fn terminal_position_reports_no_legal_moves() {
        // Gote's jewel is boxed in by its own pieces with no Sente piece on
        // the board at all, so Sente to move (misplaced on purpose) has
        // nothing to do: an empty board with no pieces for the side to move.
        let board = Board::empty();
        let hands = Hands::new();
        let mut engine = Engine::with_seed(Difficulty::Beginner, 1);
        let err = engine.calculate_best_move(&board, &hands, Color::Sente, &[]).unwrap_err();
        assert_eq!(err, EngineError::NoLegalMoves);
    }

    #[test]
    fn beginner_noise_occasionally_deviates_from_the_principled_choice() {
        let board = Board::starting_position();
        let hands = Hands::new();
        let mut deterministic_engine = Engine::with_seed(Difficulty::Advanced, 7);
        let principled = deterministic_engine.calculate_best_move(&board, &hands, Color::Sente, &[]).unwrap();

        let mut saw_deviation = false;
        for seed in 0..50u64 {
            let mut beginner = Engine::with_seed(Difficulty::Beginner, seed);
            let mv = beginner.calculate_best_move(&board, &hands, Color::Sente, &[]).unwrap();
            if mv != principled {
                saw_deviation = true;
                break;
            }
        }
        assert!(saw_deviation, "beginner noise never produced a different move across 50 seeds");
    }

    #[test]
    fn evaluate_position_matches_static_evaluator() {
        let engine = Engine::with_seed(Difficulty::Advanced, 1);
        let board = Board::starting_position();
        let hands = Hands::new();
        let assessment = engine.evaluate_position(&board, &hands, Color::Sente);
        assert_eq!(assessment.score, evaluate(&board, &hands, Color::Sente));
        assert_eq!(assessment.depth, 0);
    }

    #[test]
    fn opening_book_move_is_preferred_when_enabled() {
        let mut engine = Engine::with_seed(Difficulty::Intermediate, 3);
        let board = Board::starting_position();
        let hands = Hands::new();
        let key = position_key(&board, &hands);
        let legal = generate_legal_moves(&board, &hands, Color::Sente);
        let book_move = legal[0];
        engine
            .load_opening_book(std::iter::once(Ok((key, BookEntry::new(book_move, 100)))), None)
            .unwrap();
        let mv = engine.calculate_best_move(&board, &hands, Color::Sente, &[]).unwrap();
        assert_eq!(mv, book_move);
    }

    #[test]
    fn failed_book_load_leaves_engine_without_a_book() {
        let mut engine = Engine::with_seed(Difficulty::Intermediate, 3);
        let result = engine.load_opening_book(
            std::iter::once(Err::<(String, BookEntry), BookError>(BookError::InvalidWeight { weight: 0 })),
            None,
        );
        assert!(result.is_err());
        assert!(engine.book.is_none());
    }

    #[test]
    fn get_last_evaluation_populated_after_search() {
        let mut engine = Engine::with_seed(Difficulty::Advanced, 5);
        assert!(engine.get_last_evaluation().is_none());
        let board = Board::starting_position();
        let hands = Hands::new();
        engine.calculate_best_move(&board, &hands, Color::Sente, &[]).unwrap();
        assert!(engine.get_last_evaluation().is_some());
    }

    #[test]
    fn stop_is_callable_without_an_active_search() {
        let engine = Engine::with_seed(Difficulty::Advanced, 1);
        engine.stop();
    }

    #[test]
    fn generate_all_legal_moves_matches_core_generator() {
        let engine = Engine::with_seed(Difficulty::Advanced, 1);
        let board = Board::starting_position();
        let hands = Hands::new();
        let via_engine = engine.generate_all_legal_moves(&board, &hands, Color::Sente);
        let via_core = generate_legal_moves(&board, &hands, Color::Sente);
        assert_eq!(via_engine.len(), via_core.len());
    }

    #[test]
    fn set_config_overrides_difficulty_preset() {
        let mut engine = Engine::with_seed(Difficulty::Beginner, 1);
        let custom = EngineConfig { search_depth: 3, time_limit_ms: 500, use_opening_book: true };
        engine.set_config(custom);
        assert_eq!(engine.get_config(), custom);
    }
}
