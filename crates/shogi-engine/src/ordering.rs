//! Move ordering heuristic: scores candidate moves so the strongest
//! alpha-beta cutoffs are found first.
//!
//! Larger score sorts earlier. Bands are fixed so ties resolve the same way
//! regardless of which component produced them: PV move, then killers, then
//! MVV-LVA captures, then checks, then promotions, then centrality.

use shogi_core::{apply_move, in_check, Board, Color, Hands, Move, Square};

use crate::eval::piece_value;
use crate::heuristics::KillerTable;

const PV_BONUS: i32 = 10_000;
const KILLER_BASE: i32 = 8_000;
const KILLER_STEP: i32 = 100;
const CAPTURE_BASE: i32 = 5_000;
const CHECK_BONUS: i32 = 2_000;
const PROMOTION_BONUS: i32 = 1_000;
const CENTRALITY_WEIGHT: i32 = 10;

fn board_center() -> Square {
    Square::new(5, 5).expect("(5,5) is a valid square")
}

/// Score `mv` for ordering at `ply`, given the side to move and the
/// current best-known line.
pub fn score_move(
    board: &Board,
    hands: &Hands,
    side: Color,
    mv: Move,
    ply: usize,
    pv_move: Option<Move>,
    killers: &KillerTable,
) -> i32 {
    let mut score = 0;

    if pv_move == Some(mv) {
        score += PV_BONUS;
    }

    let killer_slots = killers.at(ply);
    for (idx, slot) in killer_slots.iter().enumerate() {
        if *slot == Some(mv) {
            score += KILLER_BASE - KILLER_STEP * idx as i32;
        }
    }

    if let Move::Board { piece, captured: Some(captured), .. } = mv {
        let victim_value = piece_value(captured.kind(), captured.is_promoted());
        let attacker_value = piece_value(piece.kind(), piece.is_promoted());
        score += CAPTURE_BASE + victim_value - attacker_value / 10;
    }

    if gives_check(board, hands, side, mv) {
        score += CHECK_BONUS;
    }

    if mv.is_promotion() {
        score += PROMOTION_BONUS;
    }

    score += CENTRALITY_WEIGHT * (8 - mv.to().manhattan(board_center()) as i32);

    score
}

fn gives_check(board: &Board, hands: &Hands, side: Color, mv: Move) -> bool {
    apply_move(*board, *hands, side, mv)
        .map(|(next_board, _, opponent)| in_check(&next_board, opponent))
        .unwrap_or(false)
}

/// Sort `moves` by descending ordering score (stable — ties keep their
/// relative generation order, which is itself deterministic).
pub fn order_moves(
    moves: &mut [Move],
    board: &Board,
    hands: &Hands,
    side: Color,
    ply: usize,
    pv_move: Option<Move>,
    killers: &KillerTable,
) {
    moves.sort_by_key(|&mv| std::cmp::Reverse(score_move(board, hands, side, mv, ply, pv_move, killers)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use shogi_core::{generate_legal_moves, Piece, PieceKind};

    #[test]
    fn pv_move_scores_highest() {
        let board = Board::starting_position();
        let hands = Hands::new();
        let killers = KillerTable::new();
        let moves = generate_legal_moves(&board, &hands, Color::Sente);
        let pv = moves[5];
        let pv_score = score_move(&board, &hands, Color::Sente, pv, 0, Some(pv), &killers);
        for &mv in &moves {
            if mv != pv {
                let other = score_move(&board, &hands, Color::Sente, mv, 0, Some(pv), &killers);
                assert!(pv_score > other);
            }
        }
    }

    #[test]
    fn capture_outranks_quiet_move() {
        let board = Board::empty()
            .set(Square::new(5, 5).unwrap(), Some(Piece::new(PieceKind::Silver, Color::Sente)))
            .set(Square::new(4, 5).unwrap(), Some(Piece::new(PieceKind::Pawn, Color::Gote)))
            .set(Square::new(9, 9).unwrap(), Some(Piece::new(PieceKind::King, Color::Sente)))
            .set(Square::new(1, 1).unwrap(), Some(Piece::new(PieceKind::Jewel, Color::Gote)));
        let hands = Hands::new();
        let killers = KillerTable::new();
        let moves = generate_legal_moves(&board, &hands, Color::Sente);
        let capture = moves.iter().copied().find(|m| m.is_capture()).unwrap();
        let quiet = moves.iter().copied().find(|m| !m.is_capture()).unwrap();
        let capture_score = score_move(&board, &hands, Color::Sente, capture, 0, None, &killers);
        let quiet_score = score_move(&board, &hands, Color::Sente, quiet, 0, None, &killers);
        assert!(capture_score > quiet_score);
    }

    #[test]
    fn killer_outranks_non_killer_quiet() {
        let board = Board::starting_position();
        let hands = Hands::new();
        let mut killers = KillerTable::new();
        let moves = generate_legal_moves(&board, &hands, Color::Sente);
        let killer_move = moves[0];
        let other_move = moves[1];
        killers.store(3, killer_move);
        let killer_score = score_move(&board, &hands, Color::Sente, killer_move, 3, None, &killers);
        let other_score = score_move(&board, &hands, Color::Sente, other_move, 3, None, &killers);
        assert!(killer_score > other_score);
    }

    #[test]
    fn order_moves_sorts_descending() {
        let board = Board::starting_position();
        let hands = Hands::new();
        let killers = KillerTable::new();
        let mut moves = generate_legal_moves(&board, &hands, Color::Sente);
        order_moves(&mut moves, &board, &hands, Color::Sente, 0, None, &killers);
        let scores: Vec<_> = moves
            .iter()
            .map(|&mv| score_move(&board, &hands, Color::Sente, mv, 0, None, &killers))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}
