//! Core shogi types: board representation, move generation, and game rules.

mod board;
mod color;
mod error;
mod hands;
mod make_move;
mod mate;
mod movegen;
mod piece;
mod piece_kind;
mod position_key;
mod rules;
mod shogi_move;
mod square;
mod zobrist;

pub use board::Board;
pub use color::Color;
pub use error::MoveError;
pub use hands::Hands;
pub use make_move::{apply_move, revert_move};
pub use mate::{has_any_legal_reply, in_check, is_checkmate, search_mate, MateSearchResult};
pub use movegen::{generate_board_moves, generate_drop_moves, generate_legal_moves, pseudo_legal_destinations};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position_key::position_key;
pub use shogi_move::Move;
pub use square::Square;
pub use zobrist::position_hash;
