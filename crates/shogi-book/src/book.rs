//! Position-keyed weighted opening book.

use std::collections::HashMap;

use rand::Rng;
use tracing::{debug, trace};

use crate::entry::BookEntry;
use crate::error::BookError;

/// Maps a position key (see [`shogi_core::position_key`]) to an ordered
/// list of weighted candidate moves.
///
/// Read-mostly: [`Self::load_entries`] is the only mutator meant to run
/// concurrently with nothing else — callers must not overlap it with
/// [`Self::find_moves`]/[`Self::find_move_randomized`] on the same instance.
pub struct OpeningBook {
    positions: HashMap<String, Vec<BookEntry>>,
    memory_budget_bytes: Option<usize>,
}

impl OpeningBook {
    pub fn new() -> Self {
        OpeningBook { positions: HashMap::new(), memory_budget_bytes: None }
    }

    /// A book that refuses insertions once [`Self::estimated_bytes`] would
    /// exceed `budget_bytes`.
    pub fn with_memory_budget(budget_bytes: usize) -> Self {
        OpeningBook { positions: HashMap::new(), memory_budget_bytes: Some(budget_bytes) }
    }

    /// Insert `entry` under `position_key`. Entries for the same key with
    /// the same move replace the prior entry (refreshing its weight or
    /// metadata); entries for a new move are appended, so colliding
    /// position keys accumulate the union of distinct moves.
    pub fn add_entry(&mut self, position_key: String, entry: BookEntry) -> Result<(), BookError> {
        if entry.weight == 0 {
            return Err(BookError::InvalidWeight { weight: entry.weight });
        }

        if let Some(budget) = self.memory_budget_bytes {
            let needed = self.estimated_bytes() + Self::entry_size(&entry);
            if needed > budget {
                return Err(BookError::MemoryBudgetExceeded { budget_bytes: budget, needed_bytes: needed });
            }
        }

        let bucket = self.positions.entry(position_key.clone()).or_default();
        match bucket.iter_mut().find(|e| e.mv == entry.mv) {
            Some(existing) => *existing = entry,
            None => bucket.push(entry),
        }
        trace!(position = %position_key, moves = bucket.len(), "book entry stored");
        Ok(())
    }

    /// Candidate entries for `position_key` sorted by descending weight, or
    /// an empty vec if the position isn't in the book.
    pub fn find_moves(&self, position_key: &str) -> Vec<&BookEntry> {
        let mut moves: Vec<&BookEntry> = self.positions.get(position_key).into_iter().flatten().collect();
        moves.sort_by(|a, b| b.weight.cmp(&a.weight));
        moves
    }

    /// Weighted-random pick among `position_key`'s candidates: draw
    /// `r ∈ [0, Σweights)` and return the first entry whose cumulative
    /// weight exceeds `r`. `None` if the position isn't in the book.
    pub fn find_move_randomized(&self, position_key: &str, rng: &mut impl Rng) -> Option<&BookEntry> {
        let bucket = self.positions.get(position_key)?;
        let total_weight: u32 = bucket.iter().map(|e| e.weight).sum();
        if total_weight == 0 {
            return None;
        }
        let draw = rng.gen_range(0..total_weight);
        let mut cumulative = 0u32;
        for entry in bucket {
            cumulative += entry.weight;
            if draw < cumulative {
                return Some(entry);
            }
        }
        bucket.last()
    }

    /// Bulk-load `(position_key, entry)` pairs, optionally dropping any
    /// entry whose `depth` exceeds `max_depth`. Returns the number of
    /// entries actually stored; entries rejected for a zero weight or a
    /// blown memory budget are silently skipped rather than aborting the
    /// whole batch.
    pub fn load_entries(
        &mut self,
        entries: impl IntoIterator<Item = (String, BookEntry)>,
        max_depth: Option<u32>,
    ) -> usize {
        let mut loaded = 0;
        for (position_key, entry) in entries {
            if let Some(max_depth) = max_depth {
                if entry.depth.is_some_and(|d| d > max_depth) {
                    continue;
                }
            }
            if self.add_entry(position_key, entry).is_ok() {
                loaded += 1;
            }
        }
        debug!(loaded, "opening book bulk load complete");
        loaded
    }

    /// Approximate total heap footprint of all stored entries, in bytes.
    pub fn estimated_bytes(&self) -> usize {
        self.positions
            .iter()
            .map(|(key, entries)| key.len() + entries.iter().map(Self::entry_size).sum::<usize>())
            .sum()
    }

    fn entry_size(entry: &BookEntry) -> usize {
        std::mem::size_of::<BookEntry>() + entry.heap_bytes()
    }

    /// Number of distinct position keys stored.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        OpeningBook::new()
    }
}
