//! Applying and reverting a move against a board and pair of hands.
//!
//! Both directions take everything by value and return everything by value,
//! following the same copy-on-write convention as [`crate::Board::set`] and
//! [`crate::Hands::add`]. `apply_move` is fallible because a move built by
//! hand (rather than produced by the generator) may be ill-formed; moves
//! coming out of [`crate::movegen`] never fail here.

use crate::board::Board;
use crate::color::Color;
use crate::error::MoveError;
use crate::hands::Hands;
use crate::mate::is_checkmate_ignoring_pawn_drop;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::rules::{is_forced_promotion, is_immobile};
use crate::shogi_move::Move;

/// Apply `mv` for `side` against `board`/`hands`, enforcing every rule in
/// §4.3 including drop-pawn-mate (uchifuzume).
///
/// Returns the resulting board, hands, and the side to move next (always
/// `side`'s opponent). Does not check whether the move leaves `side` in
/// check — that filtering lives in [`crate::movegen::generate_legal_moves`].
pub fn apply_move(board: Board, hands: Hands, side: Color, mv: Move) -> Result<(Board, Hands, Color), MoveError> {
    apply_move_impl(board, hands, side, mv, true)
}

/// Same as [`apply_move`] but never rejects a pawn drop for uchifuzume.
///
/// Used only by [`crate::movegen`] and [`crate::mate`] while they are
/// themselves in the middle of deciding whether a pawn drop delivers
/// checkmate: that judgement already calls this function to place the
/// piece before asking the checkmate detector, so letting the full
/// `apply_move` recurse into the same judgement here would either panic
/// on `.expect` or needlessly re-walk the board. External callers — and
/// every other internal caller, whose moves are legal by construction —
/// should keep using [`apply_move`].
pub(crate) fn apply_move_raw(board: Board, hands: Hands, side: Color, mv: Move) -> Result<(Board, Hands, Color), MoveError> {
    apply_move_impl(board, hands, side, mv, false)
}

fn apply_move_impl(
    board: Board,
    hands: Hands,
    side: Color,
    mv: Move,
    check_drop_pawn_mate: bool,
) -> Result<(Board, Hands, Color), MoveError> {
    match mv {
        Move::Board { from, to, piece, promote, captured } => {
            let occupant = board.piece_on(from).ok_or(MoveError::NoPieceAtSource { square: from })?;
            if occupant.color() != side {
                return Err(MoveError::WrongOwner { square: from });
            }
            if let Some(existing) = board.piece_on(to) {
                if existing.color() == side {
                    return Err(MoveError::CaptureOwnPiece { square: to });
                }
            }

            let forced = !piece.is_promoted() && is_forced_promotion(piece.kind(), side, to);
            let arriving = if promote || forced {
                piece.promote().unwrap_or(piece)
            } else {
                piece
            };

            let board = board.set(from, None).set(to, Some(arriving)).with_side_to_move(side.flip());
            let hands = match captured {
                Some(taken) => hands.add(side, taken.unpromote().kind()),
                None => hands,
            };

            Ok((board, hands, side.flip()))
        }
        Move::Drop { to, piece_type } => {
            if board.piece_on(to).is_some() {
                return Err(MoveError::SquareOccupied { square: to });
            }
            if piece_type == PieceKind::Pawn
                && board
                    .pieces_of(side)
                    .any(|(sq, p)| sq.col() == to.col() && p.kind() == PieceKind::Pawn && !p.is_promoted())
            {
                return Err(MoveError::TwoPawnsInFile { file: to.col() });
            }
            if is_immobile(piece_type, side, to) {
                return Err(MoveError::ImmobilePieceDrop { square: to });
            }

            let hands = hands.remove(side, piece_type)?;
            let board = board.set(to, Some(Piece::new(piece_type, side))).with_side_to_move(side.flip());

            if check_drop_pawn_mate
                && piece_type == PieceKind::Pawn
                && is_checkmate_ignoring_pawn_drop(&board, &hands, side.flip())
            {
                return Err(MoveError::DropPawnMate { square: to });
            }

            Ok((board, hands, side.flip()))
        }
    }
}

/// Undo `mv`, which must have just been applied by `side` to produce
/// `board`/`hands`. Returns the board and hands as they were beforehand.
///
/// This is the exact inverse of [`apply_move`]: `revert_move(side,
/// apply_move(board, hands, side, mv)?.0.1, mv) == (board, hands)` for any
/// well-formed `mv`.
pub fn revert_move(board: Board, hands: Hands, side: Color, mv: Move) -> (Board, Hands) {
    match mv {
        Move::Board { from, to, piece, captured, .. } => {
            let board = board.set(from, Some(piece)).set(to, captured).with_side_to_move(side);
            let hands = match captured {
                Some(taken) => hands.remove(side, taken.unpromote().kind()).expect("reverting a capture restores a held piece"),
                None => hands,
            };
            (board, hands)
        }
        Move::Drop { to, piece_type } => {
            let board = board.set(to, None).with_side_to_move(side);
            let hands = hands.add(side, piece_type);
            (board, hands)
        }
    }
}
