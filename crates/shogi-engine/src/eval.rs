//! Static position evaluation (centipawns, from a requested side's POV).

use shogi_core::{Board, Color, Hands, PieceKind, Square};

/// Base piece values in centipawns.
const fn base_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Lance => 430,
        PieceKind::Knight => 450,
        PieceKind::Silver => 640,
        PieceKind::Gold => 690,
        PieceKind::Bishop => 890,
        PieceKind::Rook => 1040,
        PieceKind::King | PieceKind::Jewel => 0,
    }
}

/// Promoted piece values. Promotion always gains value.
const fn promoted_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 600,
        PieceKind::Lance => 630,
        PieceKind::Knight => 650,
        PieceKind::Silver => 670,
        PieceKind::Bishop => 1150,
        PieceKind::Rook => 1300,
        PieceKind::Gold | PieceKind::King | PieceKind::Jewel => base_value(kind),
    }
}

/// Value of a piece, taking promotion into account.
pub fn piece_value(kind: PieceKind, promoted: bool) -> i32 {
    if promoted {
        promoted_value(kind)
    } else {
        base_value(kind)
    }
}

/// A piece sitting in hand is worth slightly less than one on the board —
/// dropping it costs the side a tempo it would not spend moving an
/// existing piece.
const HAND_DISCOUNT_NUM: i32 = 9;
const HAND_DISCOUNT_DEN: i32 = 10;

const PAWN_ADVANCE_BONUS: i32 = 15;
const CENTRALITY_WEIGHT: i32 = 2;
const KING_SAFETY_PENALTY: i32 = 25;

fn board_center() -> Square {
    Square::new(5, 5).expect("(5,5) is a valid square")
}

/// Sign of `s`'s contribution to a score requested from `side`'s POV: `+1`
/// if `s == side`, `-1` otherwise. Every term below is built as a sum over
/// both sides of `sign(s, side) * contribution(s)`, which guarantees
/// `evaluate(.., side) == -evaluate(.., side.flip())` by construction —
/// flipping `side` flips every sign.
fn sign(s: Color, side: Color) -> i32 {
    if s == side {
        1
    } else {
        -1
    }
}

fn material_score(board: &Board, side: Color) -> i32 {
    board
        .occupied()
        .map(|(_, piece)| sign(piece.color(), side) * piece_value(piece.kind(), piece.is_promoted()))
        .sum()
}

fn hand_score(hands: &Hands, side: Color) -> i32 {
    Color::ALL
        .iter()
        .flat_map(|&s| {
            PieceKind::DROPPABLE.iter().map(move |&kind| {
                let count = hands.count(s, kind) as i32;
                sign(s, side) * count * piece_value(kind, false) * HAND_DISCOUNT_NUM / HAND_DISCOUNT_DEN
            })
        })
        .sum()
}

fn positional_score(board: &Board, side: Color) -> i32 {
    let center = board_center();
    board
        .occupied()
        .map(|(sq, piece)| {
            let s = sign(piece.color(), side);
            let mut term = 0;
            if piece.kind() == PieceKind::Pawn && !piece.is_promoted() && sq.in_promotion_zone(piece.color()) {
                term += PAWN_ADVANCE_BONUS;
            }
            if matches!(piece.kind(), PieceKind::Silver | PieceKind::Gold) {
                term += CENTRALITY_WEIGHT * (8 - sq.manhattan(center) as i32);
            }
            s * term
        })
        .sum()
}

fn king_safety_score(board: &Board, side: Color) -> i32 {
    Color::ALL
        .iter()
        .map(|&s| {
            let Some(king_sq) = board.royal_square(s) else { return 0 };
            let shielded = (1..=9).any(|row| {
                Square::new(row, king_sq.col())
                    .and_then(|sq| board.piece_on(sq))
                    .is_some_and(|p| p.color() == s && p.kind() == PieceKind::Pawn)
            });
            if shielded {
                0
            } else {
                -sign(s, side) * KING_SAFETY_PENALTY
            }
        })
        .sum()
}

/// Static evaluation of a position from `side`'s point of view, in
/// centipawns. Positive favours `side`.
pub fn evaluate(board: &Board, hands: &Hands, side: Color) -> i32 {
    material_score(board, side) + hand_score(hands, side) + positional_score(board, side) + king_safety_score(board, side)
}
