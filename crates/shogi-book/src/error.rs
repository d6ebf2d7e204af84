//! Errors raised while inserting into or loading an [`crate::OpeningBook`].

/// Errors from [`crate::OpeningBook::add_entry`] and
/// [`crate::OpeningBook::load_entries`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    /// An entry's weight was zero; weights must be positive.
    #[error("book entry weight must be positive, got {weight}")]
    InvalidWeight { weight: u32 },
    /// Inserting the entry would exceed the book's memory budget.
    #[error("book memory budget of {budget_bytes} bytes exceeded (would need {needed_bytes})")]
    MemoryBudgetExceeded { budget_bytes: usize, needed_bytes: usize },
}
