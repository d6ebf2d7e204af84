//! Errors surfaced by the [`crate::Engine`] facade.

use shogi_book::BookError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The position is terminal — the side to move has no legal move.
    #[error("no legal moves available; treat as loss or draw per the current rules")]
    NoLegalMoves,
    /// The search was cancelled or timed out before any iteration completed.
    #[error("search aborted before any iteration completed")]
    SearchAborted,
    /// Opening book ingestion failed; the engine continues without a book.
    #[error("opening book failed to load: {0}")]
    BookLoadFailed(#[from] BookError),
}
