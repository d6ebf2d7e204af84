//! The 9x9 shogi board: a total mapping from [`Square`] to an occupant.

use std::fmt;

use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// A 9x9 shogi board.
///
/// A value type — [`Board::set`] returns a new board rather than mutating
/// in place. During hypothetical-move evaluation a board may briefly hold
/// zero royal pieces for a side; [`Board::royal_square`] reflects that by
/// returning `None` rather than panicking.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; Square::COUNT],
    side_to_move: Color,
}

impl Board {
    /// An empty board with Sente to move.
    pub const fn empty() -> Board {
        Board {
            squares: [None; Square::COUNT],
            side_to_move: Color::Sente,
        }
    }

    /// The standard shogi starting position, Sente to move.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();

        let back_rank = [
            PieceKind::Lance,
            PieceKind::Knight,
            PieceKind::Silver,
            PieceKind::Gold,
            PieceKind::King, // overwritten to Jewel for Gote below
            PieceKind::Gold,
            PieceKind::Silver,
            PieceKind::Knight,
            PieceKind::Lance,
        ];

        for (i, &kind) in back_rank.iter().enumerate() {
            let col = i as u8 + 1;
            let gote_kind = if kind == PieceKind::King { PieceKind::Jewel } else { kind };
            board = board.set(
                Square::new(1, col).unwrap(),
                Some(Piece::new(gote_kind, Color::Gote)),
            );
            board = board.set(
                Square::new(9, col).unwrap(),
                Some(Piece::new(kind, Color::Sente)),
            );
        }

        board = board.set(Square::new(2, 2).unwrap(), Some(Piece::new(PieceKind::Bishop, Color::Gote)));
        board = board.set(Square::new(2, 8).unwrap(), Some(Piece::new(PieceKind::Rook, Color::Gote)));
        board = board.set(Square::new(8, 2).unwrap(), Some(Piece::new(PieceKind::Rook, Color::Sente)));
        board = board.set(Square::new(8, 8).unwrap(), Some(Piece::new(PieceKind::Bishop, Color::Sente)));

        for col in 1..=9 {
            board = board.set(Square::new(3, col).unwrap(), Some(Piece::new(PieceKind::Pawn, Color::Gote)));
            board = board.set(Square::new(7, col).unwrap(), Some(Piece::new(PieceKind::Pawn, Color::Sente)));
        }

        board
    }

    /// The piece occupying `square`, if any.
    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Return a new board with `square` set to `piece` (or emptied if `None`).
    #[must_use]
    pub fn set(mut self, square: Square, piece: Option<Piece>) -> Board {
        self.squares[square.index()] = piece;
        self
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Return a new board with the side to move flipped to `side`.
    #[must_use]
    pub fn with_side_to_move(mut self, side: Color) -> Board {
        self.side_to_move = side;
        self
    }

    /// Locate `side`'s royal piece (King or Jewel), if present.
    ///
    /// Returns `None` rather than panicking when no royal exists — callers
    /// evaluating hypothetical positions must tolerate this.
    pub fn royal_square(&self, side: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.piece_on(sq)
                .is_some_and(|p| p.color() == side && p.is_royal())
        })
    }

    /// Iterate all occupied squares together with their piece.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_on(sq).map(|p| (sq, p)))
    }

    /// Iterate squares occupied by `side`'s pieces.
    pub fn pieces_of(&self, side: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied().filter(move |(_, p)| p.color() == side)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "board ({} to move):", self.side_to_move)?;
        for row in 1..=9u8 {
            write!(f, "  ")?;
            for col in 1..=9u8 {
                let sq = Square::new(row, col).unwrap();
                match self.piece_on(sq) {
                    Some(p) => write!(f, "{p:?} ")?,
                    None => write!(f, " .  ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
