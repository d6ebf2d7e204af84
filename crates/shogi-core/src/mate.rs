//! Check detection, checkmate detection, and a bounded forced-mate search.

use std::time::Instant;

use crate::board::Board;
use crate::color::Color;
use crate::hands::Hands;
use crate::make_move::apply_move_raw;
use crate::movegen::{attacks, generate_board_moves, generate_drop_moves, generate_drop_moves_unfiltered};
use crate::shogi_move::Move;

/// Whether `side`'s royal piece is currently attacked. A side with no
/// royal on the board (only reachable via hand-built positions) is treated
/// as already mated for search purposes, per §4.4.
pub fn in_check(board: &Board, side: Color) -> bool {
    let Some(royal) = board.royal_square(side) else { return true };
    board.pieces_of(side.flip()).any(|(from, _)| attacks(board, from, royal))
}

/// Whether `side` has at least one legal reply available, using the fully
/// filtered (uchifuzume included) drop list.
pub fn has_any_legal_reply(board: &Board, hands: &Hands, side: Color) -> bool {
    has_any_reply_with(board, hands, side, generate_drop_moves(board, hands, side))
}

/// Same test with drops filtered only by nifu and immobile-piece-drop.
///
/// Used while judging whether a pawn drop itself delivers checkmate, so
/// that judgement does not recurse into asking whether the replying side's
/// own pawn drops would themselves be checkmate — breaking the cycle
/// between drop generation and checkmate detection in a single step.
fn has_any_reply_ignoring_pawn_drop(board: &Board, hands: &Hands, side: Color) -> bool {
    has_any_reply_with(board, hands, side, generate_drop_moves_unfiltered(board, hands, side))
}

fn has_any_reply_with(board: &Board, hands: &Hands, side: Color, drops: Vec<Move>) -> bool {
    let mut candidates = generate_board_moves(board, side);
    candidates.extend(drops);
    candidates.into_iter().any(|mv| {
        apply_move_raw(*board, *hands, side, mv)
            .map(|(next, _, _)| !in_check(&next, side))
            .unwrap_or(false)
    })
}

/// Whether `side` is checkmated: in check, with no legal reply.
pub fn is_checkmate(board: &Board, hands: &Hands, side: Color) -> bool {
    in_check(board, side) && !has_any_legal_reply(board, hands, side)
}

/// Checkmate test used while evaluating a hypothetical pawn drop.
pub(crate) fn is_checkmate_ignoring_pawn_drop(board: &Board, hands: &Hands, side: Color) -> bool {
    in_check(board, side) && !has_any_reply_ignoring_pawn_drop(board, hands, side)
}

/// Result of a bounded forced-mate search.
#[derive(Debug, Clone)]
pub struct MateSearchResult {
    /// Whether a forced mate was found within the depth bound.
    pub is_mate: bool,
    /// The winning line, attacker move first, if `is_mate` is true.
    pub principal_line: Vec<Move>,
    pub nodes_searched: u64,
    pub elapsed_ms: u64,
}

/// Search for a forced mate against `side` delivered by `side`'s opponent,
/// to at most `max_plies` (an odd number of attacker+defender half-moves;
/// even values are rounded down to the preceding odd value).
///
/// This is an AND/OR search: the attacker's node succeeds if any checking
/// move leads to a defender node that succeeds; the defender's node
/// succeeds (for the attacker) only if every legal reply leads to a
/// further attacker success, or if no reply exists at all (checkmate).
pub fn search_mate(board: &Board, hands: &Hands, side: Color, max_plies: u32) -> MateSearchResult {
    let started = Instant::now();
    let mut nodes = 0u64;
    let attacker = side.flip();
    let line = or_search(board, hands, attacker, max_plies, &mut nodes);
    MateSearchResult {
        is_mate: line.is_some(),
        principal_line: line.unwrap_or_default(),
        nodes_searched: nodes,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

/// The attacker's node: succeeds if some checking move forces mate.
fn or_search(board: &Board, hands: &Hands, attacker: Color, plies_left: u32, nodes: &mut u64) -> Option<Vec<Move>> {
    if plies_left == 0 {
        return None;
    }
    *nodes += 1;

    let defender = attacker.flip();
    let mut candidates = generate_board_moves(board, attacker);
    candidates.extend(generate_drop_moves(board, hands, attacker));

    for mv in candidates {
        let Ok((next_board, next_hands, _)) = apply_move_raw(*board, *hands, attacker, mv) else { continue };
        if in_check(&next_board, attacker) {
            continue; // illegal: leaves own side in check
        }
        if !in_check(&next_board, defender) {
            continue; // only checking moves can be part of a mating line
        }
        if let Some(mut continuation) = and_search(&next_board, &next_hands, defender, plies_left - 1, nodes) {
            continuation.insert(0, mv);
            return Some(continuation);
        }
    }

    None
}

/// The defender's node: succeeds (for the attacker) only if every reply
/// still loses, or if there is no reply at all.
fn and_search(board: &Board, hands: &Hands, defender: Color, plies_left: u32, nodes: &mut u64) -> Option<Vec<Move>> {
    *nodes += 1;

    let attacker = defender.flip();
    let mut candidates = generate_board_moves(board, defender);
    candidates.extend(generate_drop_moves(board, hands, defender));

    let legal: Vec<Move> = candidates
        .into_iter()
        .filter(|&mv| {
            apply_move_raw(*board, *hands, defender, mv)
                .map(|(next, _, _)| !in_check(&next, defender))
                .unwrap_or(false)
        })
        .collect();

    if legal.is_empty() {
        return Some(Vec::new()); // checkmate: no continuation needed
    }
    if plies_left == 0 {
        return None;
    }

    let mut line = None;
    for mv in legal {
        let Ok((next_board, next_hands, _)) = apply_move_raw(*board, *hands, defender, mv) else { continue };
        match or_search(&next_board, &next_hands, attacker, plies_left - 1, nodes) {
            Some(mut continuation) => {
                let mut full = vec![mv];
                full.append(&mut continuation);
                line = Some(full);
            }
            None => return None, // defender escapes via this reply
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn starting_position_no_check() {
        let board = Board::starting_position();
        assert!(!in_check(&board, Color::Sente));
        assert!(!in_check(&board, Color::Gote));
    }

    #[test]
    fn rook_on_same_file_gives_check() {
        let board = Board::empty()
            .set(sq(9, 5), Some(Piece::new(PieceKind::King, Color::Sente)))
            .set(sq(1, 5), Some(Piece::new(PieceKind::Rook, Color::Gote)));
        assert!(in_check(&board, Color::Sente));
    }

    #[test]
    fn side_with_no_royal_is_treated_as_in_check() {
        // Only reachable via a hand-built position; §4.4 treats a missing
        // royal as already mated rather than never-in-check.
        let board = Board::empty().set(sq(1, 1), Some(Piece::new(PieceKind::Rook, Color::Gote)));
        let hands = Hands::new();
        assert!(in_check(&board, Color::Sente));
        assert!(is_checkmate(&board, &hands, Color::Sente));
    }

    #[test]
    fn corner_mate_detected() {
        let board = Board::empty()
            .set(sq(1, 1), Some(Piece::new(PieceKind::Jewel, Color::Gote)))
            .set(sq(2, 2), Some(Piece::new(PieceKind::Gold, Color::Sente)))
            .set(sq(3, 3), Some(Piece::new(PieceKind::Silver, Color::Sente)))
            .set(sq(1, 9), Some(Piece::new(PieceKind::Rook, Color::Sente)));
        let hands = Hands::new();
        assert!(is_checkmate(&board, &hands, Color::Gote));
    }

    #[test]
    fn check_with_escape_is_not_mate() {
        let board = Board::empty()
            .set(sq(5, 5), Some(Piece::new(PieceKind::King, Color::Sente)))
            .set(sq(1, 5), Some(Piece::new(PieceKind::Rook, Color::Gote)));
        let hands = Hands::new();
        assert!(in_check(&board, Color::Sente));
        assert!(!is_checkmate(&board, &hands, Color::Sente));
    }

    #[test]
    fn mate_in_one_found_by_search() {
        // Gote king cornered at (1,1), not currently in check. A Sente gold
        // drop at (2,2) checks the king; two knights and a silver cover the
        // only escape squares and defend the dropped gold.
        let board = Board::empty()
            .set(sq(1, 1), Some(Piece::new(PieceKind::Jewel, Color::Gote)))
            .set(sq(3, 3), Some(Piece::new(PieceKind::Knight, Color::Sente)))
            .set(sq(4, 2), Some(Piece::new(PieceKind::Knight, Color::Sente)))
            .set(sq(3, 1), Some(Piece::new(PieceKind::Silver, Color::Sente)));
        let hands = Hands::new().add(Color::Sente, PieceKind::Gold);
        assert!(!in_check(&board, Color::Gote));
        let result = search_mate(&board, &hands, Color::Gote, 1);
        assert!(result.is_mate);
        assert_eq!(result.principal_line.len(), 1);
    }

    #[test]
    fn no_mate_reports_false() {
        let board = Board::starting_position();
        let hands = Hands::new();
        let result = search_mate(&board, &hands, Color::Gote, 1);
        assert!(!result.is_mate);
        assert!(result.principal_line.is_empty());
    }
}
