//! Canonical string position key, used by the opening book.
//!
//! The transposition table uses the faster [`crate::zobrist::position_hash`]
//! instead; either is acceptable per the two keys' shared contract: equal
//! positions must produce equal keys. This one stays a self-describing
//! string because opening book entries are meant to be inspectable.

use std::fmt::Write as _;

use crate::board::Board;
use crate::color::Color;
use crate::hands::Hands;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Build the canonical position key: board rows (Gote's back rank first)
/// with blank-run counts, a side-to-move marker, and hand counts. The move
/// counter is deliberately excluded so two positions reached by different
/// move orders share a key.
pub fn position_key(board: &Board, hands: &Hands) -> String {
    let mut key = String::with_capacity(96);

    for row in 1..=9u8 {
        if row > 1 {
            key.push('/');
        }
        let mut blank_run = 0u8;
        for col in 1..=9u8 {
            let sq = Square::new(row, col).unwrap();
            match board.piece_on(sq) {
                None => blank_run += 1,
                Some(piece) => {
                    if blank_run > 0 {
                        write!(key, "{blank_run}").unwrap();
                        blank_run = 0;
                    }
                    if piece.is_promoted() {
                        key.push('+');
                    }
                    let label = piece.kind().label();
                    if piece.color() == Color::Gote {
                        key.push_str(&label.to_ascii_lowercase());
                    } else {
                        key.push_str(label);
                    }
                }
            }
        }
        if blank_run > 0 {
            write!(key, "{blank_run}").unwrap();
        }
    }

    key.push(' ');
    key.push(match board.side_to_move() {
        Color::Sente => 's',
        Color::Gote => 'g',
    });

    for &side in &Color::ALL {
        key.push(' ');
        key.push(match side {
            Color::Sente => 'S',
            Color::Gote => 'G',
        });
        key.push(':');
        for kind in PieceKind::DROPPABLE {
            let count = hands.count(side, kind);
            if count > 0 {
                write!(key, "{count}{}", kind.label()).unwrap();
            }
        }
    }

    key
}
