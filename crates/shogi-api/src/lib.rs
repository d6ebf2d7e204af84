//! Embedder-facing engine API: difficulty presets, configuration, and the
//! `Engine` facade tying together move generation, search, evaluation, and
//! the opening book.

mod config;
mod engine;
mod error;

pub use config::{Difficulty, EngineConfig};
pub use engine::{Engine, PositionEvaluation};
pub use error::EngineError;
