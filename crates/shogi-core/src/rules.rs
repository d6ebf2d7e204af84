//! Small shared rule predicates used by both move application and move
//! generation — kept in one place so the two never drift apart.

use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Would a piece of `kind` placed on `to` for `side` have no legal move
/// ever again? True for a pawn/lance on the far rank, or a knight on
/// either of the far two ranks.
pub fn is_immobile(kind: PieceKind, side: Color, to: Square) -> bool {
    let far_rank = match side {
        Color::Sente => 1,
        Color::Gote => 9,
    };
    match kind {
        PieceKind::Pawn | PieceKind::Lance => to.row() == far_rank,
        PieceKind::Knight => match side {
            Color::Sente => to.row() <= 2,
            Color::Gote => to.row() >= 8,
        },
        _ => false,
    }
}

/// Is promotion forced for a piece of `kind` arriving on `to`? Forced for a
/// pawn/lance entering the last rank, or a knight entering the last two
/// ranks — exactly the squares from which the piece could never move again.
pub fn is_forced_promotion(kind: PieceKind, side: Color, to: Square) -> bool {
    matches!(kind, PieceKind::Pawn | PieceKind::Lance | PieceKind::Knight) && is_immobile(kind, side, to)
}
