//! Move generation: pseudo-legal board moves, hand drops, and the fully
//! filtered legal move list.

pub mod vectors;

use crate::board::Board;
use crate::color::Color;
use crate::hands::Hands;
use crate::make_move::{apply_move, apply_move_raw};
use crate::mate::in_check;
use crate::piece_kind::PieceKind;
use crate::rules::is_immobile;
use crate::shogi_move::Move;
use crate::square::Square;
use vectors::motion_vectors;

/// Pseudo-legal destinations for the piece on `from` (which must be
/// present), ignoring whether the move leaves the mover in check.
pub fn pseudo_legal_destinations(board: &Board, from: Square) -> Vec<Square> {
    let piece = match board.piece_on(from) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let (vectors, len) = motion_vectors(piece);
    let mut dests = Vec::new();

    for vec in &vectors[..len] {
        let mut cur = from;
        loop {
            let Some(next) = cur.offset(vec.dr, vec.dc) else { break };
            match board.piece_on(next) {
                None => {
                    dests.push(next);
                }
                Some(occupant) => {
                    if occupant.color() != piece.color() {
                        dests.push(next);
                    }
                    break;
                }
            }
            if !vec.slide {
                break;
            }
            cur = next;
        }
    }

    dests
}

/// Whether `side`'s piece on `from` attacks `target` — used by [`in_check`],
/// without allocating a destination list.
pub(crate) fn attacks(board: &Board, from: Square, target: Square) -> bool {
    let piece = match board.piece_on(from) {
        Some(p) => p,
        None => return false,
    };
    let (vectors, len) = motion_vectors(piece);
    for vec in &vectors[..len] {
        let mut cur = from;
        loop {
            let Some(next) = cur.offset(vec.dr, vec.dc) else { break };
            if next == target {
                return true;
            }
            if board.piece_on(next).is_some() {
                break;
            }
            if !vec.slide {
                break;
            }
            cur = next;
        }
    }
    false
}

/// All pseudo-legal board moves for `side`, including both promotion and
/// non-promotion variants where promotion is optional.
pub fn generate_board_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut moves = Vec::new();

    for (from, piece) in board.pieces_of(side) {
        for to in pseudo_legal_destinations(board, from) {
            let captured = board.piece_on(to);
            let crosses_zone = from.in_promotion_zone(side) || to.in_promotion_zone(side);
            let can_promote = piece.kind().is_promotable() && !piece.is_promoted() && crosses_zone;
            let forced = !piece.is_promoted() && crate::rules::is_forced_promotion(piece.kind(), side, to);

            if can_promote {
                moves.push(Move::Board { from, to, piece, promote: true, captured });
            }
            if !forced {
                moves.push(Move::Board { from, to, piece, promote: false, captured });
            }
        }
    }

    moves
}

/// Drop moves for `side`, filtered by nifu and immobile-piece-drop but not
/// yet by uchifuzume. Used internally by [`is_checkmate_ignoring_pawn_drop`]
/// to terminate the drop-pawn-mate/checkmate mutual dependency in one step:
/// evaluating whether a pawn drop delivers checkmate must not itself ask
/// whether the opponent's own pawn drops would be checkmate.
pub(crate) fn generate_drop_moves_unfiltered(board: &Board, hands: &Hands, side: Color) -> Vec<Move> {
    let mut moves = Vec::new();

    for kind in hands.nonzero_kinds(side) {
        let pawn_files: Vec<u8> = if kind == PieceKind::Pawn {
            (1..=9)
                .filter(|&file| {
                    (1..=9).any(|row| {
                        let sq = Square::new(row, file).unwrap();
                        board.piece_on(sq).is_some_and(|p| p.color() == side && p.kind() == PieceKind::Pawn && !p.is_promoted())
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        for to in Square::all() {
            if board.piece_on(to).is_some() {
                continue;
            }
            if kind == PieceKind::Pawn && pawn_files.contains(&to.col()) {
                continue;
            }
            if is_immobile(kind, side, to) {
                continue;
            }
            moves.push(Move::Drop { to, piece_type: kind });
        }
    }

    moves
}

/// Full drop move list for `side`: nifu, immobile-piece-drop, and
/// uchifuzume (drop-pawn-mate) all excluded.
pub fn generate_drop_moves(board: &Board, hands: &Hands, side: Color) -> Vec<Move> {
    generate_drop_moves_unfiltered(board, hands, side)
        .into_iter()
        .filter(|&mv| {
            let Move::Drop { to, piece_type } = mv else { unreachable!() };
            if piece_type != PieceKind::Pawn {
                return true;
            }
            let (next_board, next_hands, opponent) = apply_move_raw(*board, *hands, side, mv)
                .expect("drop candidate is well-formed");
            !crate::mate::is_checkmate_ignoring_pawn_drop(&next_board, &next_hands, opponent)
        })
        .collect()
}

/// Every legal move for `side`: all pseudo-legal board moves and filtered
/// drops, with any move that leaves `side`'s own royal in check discarded.
pub fn generate_legal_moves(board: &Board, hands: &Hands, side: Color) -> Vec<Move> {
    let mut candidates = generate_board_moves(board, side);
    candidates.extend(generate_drop_moves(board, hands, side));

    candidates
        .into_iter()
        .filter(|&mv| {
            let Ok((next_board, _, _)) = apply_move_raw(*board, *hands, side, mv) else { return false };
            !in_check(&next_board, side)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn starting_position_has_thirty_board_moves() {
        let board = Board::starting_position();
        let moves = generate_board_moves(&board, Color::Sente);
        // 9 pawns x1 + 2 lances x1 + 2 knights x0 (blocked) + 2 silvers x2 + 2 golds x2 + bishop/rook blocked
        assert!(moves.len() >= 9);
    }

    #[test]
    fn pawn_cannot_slide() {
        let board = Board::starting_position();
        let dests = pseudo_legal_destinations(&board, sq(7, 1));
        assert_eq!(dests, vec![sq(6, 1)]);
    }

    #[test]
    fn lance_slides_until_blocked_by_own_pawn() {
        let board = Board::starting_position();
        let dests = pseudo_legal_destinations(&board, sq(9, 1));
        assert!(dests.is_empty());
    }

    #[test]
    fn promoted_pawn_moving_to_last_rank_is_not_treated_as_forced() {
        let board = Board::empty().set(
            sq(2, 5),
            Some(Piece::promoted(PieceKind::Pawn, Color::Sente).unwrap()),
        );
        let moves = generate_board_moves(&board, Color::Sente);
        let onto_last_rank: Vec<_> = moves.iter().filter(|mv| mv.to() == sq(1, 5)).collect();
        assert_eq!(onto_last_rank.len(), 1);
        assert!(!onto_last_rank[0].is_promotion());
    }

    #[test]
    fn drop_excludes_nifu_file() {
        let board = Board::starting_position();
        let hands = Hands::new().add(Color::Sente, PieceKind::Pawn);
        let drops = generate_drop_moves(&board, &hands, Color::Sente);
        assert!(drops.iter().all(|mv| mv.to().col() != 1));
    }

    #[test]
    fn drop_excludes_immobile_last_rank() {
        let board = Board::empty();
        let hands = Hands::new().add(Color::Sente, PieceKind::Pawn);
        let drops = generate_drop_moves(&board, &hands, Color::Sente);
        assert!(drops.iter().all(|mv| mv.to().row() != 1));
    }

    #[test]
    fn knight_drop_excludes_last_two_ranks() {
        let board = Board::empty();
        let hands = Hands::new().add(Color::Sente, PieceKind::Knight);
        let drops = generate_drop_moves(&board, &hands, Color::Sente);
        assert!(drops.iter().all(|mv| mv.to().row() >= 3));
    }

    #[test]
    fn legal_moves_never_leave_mover_in_check() {
        // Sente king boxed in except for one square, pinned rook cannot move
        // away without exposing check; verify every returned move is safe.
        let board = Board::empty()
            .set(sq(9, 5), Some(Piece::new(PieceKind::King, Color::Sente)))
            .set(sq(1, 5), Some(Piece::new(PieceKind::Rook, Color::Gote)))
            .set(sq(5, 5), Some(Piece::new(PieceKind::Silver, Color::Sente)));
        let hands = Hands::new();
        for mv in generate_legal_moves(&board, &hands, Color::Sente) {
            let (next, _, _) = apply_move(board, hands, Color::Sente, mv).unwrap();
            assert!(!in_check(&next, Color::Sente));
        }
    }

    #[test]
    fn bare_king_has_no_legal_moves_when_checkmated() {
        // Classic corner mate: Gote king on (1,1), Sente gold on (2,2) and
        // rook delivering check along the first row.
        let board = Board::empty()
            .set(sq(1, 1), Some(Piece::new(PieceKind::Jewel, Color::Gote)))
            .set(sq(2, 2), Some(Piece::new(PieceKind::Gold, Color::Sente)))
            .set(sq(3, 3), Some(Piece::new(PieceKind::Silver, Color::Sente)))
            .set(sq(1, 9), Some(Piece::new(PieceKind::Rook, Color::Sente)));
        let hands = Hands::new();
        assert!(in_check(&board, Color::Gote));
        assert!(generate_legal_moves(&board, &hands, Color::Gote).is_empty());
    }
}
