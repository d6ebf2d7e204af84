//! Zobrist-style hashing for position keys (transposition table lookups).
//!
//! Keys are generated at compile time by repeatedly advancing a single
//! xorshift64 generator, the same technique a bitboard chess engine uses
//! for its piece-square tables — just sized for an 81-square mailbox board
//! and per-count hand slots instead of castling/en-passant state.

use crate::board::Board;
use crate::color::Color;
use crate::hands::Hands;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Upper bound on how many of a single piece type a hand could ever hold.
/// Oversized uniformly (18, the pawn count) rather than tracked per kind —
/// the unused slots cost a few hundred spare keys at compile time only.
const MAX_HAND_COUNT: usize = 18;

const SEED: u64 = 0x53_68_6f_67_69_21_21_21; // "Shogi!!!"

/// Xorshift64 PRNG. Returns `(value, next_state)`.
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Zobrist key for each (piece raw byte, square) pair, indexed by
/// `[piece.raw() as usize][square.index()]`. Piece raw bytes only use the
/// low 6 bits, so 64 rows cover every value.
static PIECE_SQUARE: [[u64; Square::COUNT]; 64] = {
    let mut table = [[0u64; Square::COUNT]; 64];
    let mut state = SEED;
    let mut raw = 0;
    while raw < 64 {
        let mut sq = 0;
        while sq < Square::COUNT {
            let (val, next) = xorshift64(state);
            table[raw][sq] = val;
            state = next;
            sq += 1;
        }
        raw += 1;
    }
    table
};

const PIECE_SQUARE_KEYS: usize = 64 * Square::COUNT;

/// Zobrist key XORed once per side per droppable kind per held count,
/// indexed by `[side.index()][drop_index][count]`.
static HAND_KEY: [[[u64; MAX_HAND_COUNT + 1]; 7]; 2] = {
    let mut table = [[[0u64; MAX_HAND_COUNT + 1]; 7]; 2];
    let mut state = SEED;
    let mut i = 0;
    while i < PIECE_SQUARE_KEYS {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let mut side = 0;
    while side < 2 {
        let mut kind = 0;
        while kind < 7 {
            let mut count = 0;
            while count <= MAX_HAND_COUNT {
                let (val, next) = xorshift64(state);
                table[side][kind][count] = val;
                state = next;
                count += 1;
            }
            kind += 1;
        }
        side += 1;
    }
    table
};

const HAND_KEYS: usize = 2 * 7 * (MAX_HAND_COUNT + 1);

/// Zobrist key XORed when Gote is the side to move.
static SIDE_TO_MOVE: u64 = {
    let mut state = SEED;
    let mut i = 0;
    while i < PIECE_SQUARE_KEYS + HAND_KEYS {
        let (_, next) = xorshift64(state);
        state = next;
        i += 1;
    }
    let (val, _) = xorshift64(state);
    val
};

const fn drop_index(kind: PieceKind) -> Option<usize> {
    match kind {
        PieceKind::Pawn => Some(0),
        PieceKind::Lance => Some(1),
        PieceKind::Knight => Some(2),
        PieceKind::Silver => Some(3),
        PieceKind::Gold => Some(4),
        PieceKind::Bishop => Some(5),
        PieceKind::Rook => Some(6),
        PieceKind::King | PieceKind::Jewel => None,
    }
}

/// Compute the Zobrist hash for a board, its hands, and the side to move.
///
/// Always a full recomputation — board and hands are treated as immutable
/// value types throughout the search (see [`crate::apply_move`]), so there
/// is no mutable state to update incrementally.
pub fn position_hash(board: &Board, hands: &Hands) -> u64 {
    let mut hash = 0u64;

    for (sq, piece) in board.occupied() {
        hash ^= PIECE_SQUARE[piece.raw() as usize][sq.index()];
    }

    for &side in &Color::ALL {
        for kind in PieceKind::DROPPABLE {
            let count = hands.count(side, kind) as usize;
            if count > 0 {
                let idx = drop_index(kind).expect("droppable kind always maps to a hand slot");
                hash ^= HAND_KEY[side.index()][idx][count.min(MAX_HAND_COUNT)];
            }
        }
    }

    if board.side_to_move() == Color::Gote {
        hash ^= SIDE_TO_MOVE;
    }

    hash
}
