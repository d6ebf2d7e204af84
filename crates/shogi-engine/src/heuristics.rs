//! Killer move table: per-ply quiet moves that caused a beta cutoff.

use shogi_core::Move;

/// Deepest ply the table tracks; deeper plies simply aren't recorded.
pub const MAX_PLY: usize = 128;

/// Two killer slots per ply, most-recent-first, duplicates removed.
pub struct KillerTable {
    slots: [[Option<Move>; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        KillerTable { slots: [[None; 2]; MAX_PLY] }
    }

    /// Record `mv` as a killer at `ply`. A no-op past [`MAX_PLY`] or if `mv`
    /// is already the front killer at this ply.
    pub fn store(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.slots.get_mut(ply) else { return };
        if slot[0] == Some(mv) {
            return;
        }
        slot[1] = slot[0];
        slot[0] = Some(mv);
    }

    /// The killer moves at `ply`, front slot first.
    pub fn at(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None; 2])
    }

    /// Whether `mv` occupies either killer slot at `ply`.
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.at(ply).contains(&Some(mv))
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        KillerTable::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shogi_core::{PieceKind, Square};

    fn mv(col: u8) -> Move {
        Move::Drop { to: Square::new(5, col).unwrap(), piece_type: PieceKind::Gold }
    }

    #[test]
    fn store_and_check() {
        let mut kt = KillerTable::new();
        kt.store(3, mv(1));
        assert!(kt.is_killer(3, mv(1)));
        assert!(!kt.is_killer(3, mv(2)));
    }

    #[test]
    fn second_store_shifts_first_to_back() {
        let mut kt = KillerTable::new();
        kt.store(0, mv(1));
        kt.store(0, mv(2));
        assert_eq!(kt.at(0), [Some(mv(2)), Some(mv(1))]);
    }

    #[test]
    fn storing_same_move_again_is_a_no_op() {
        let mut kt = KillerTable::new();
        kt.store(0, mv(1));
        kt.store(0, mv(2));
        kt.store(0, mv(2));
        assert_eq!(kt.at(0), [Some(mv(2)), Some(mv(1))]);
    }

    #[test]
    fn plies_are_independent() {
        let mut kt = KillerTable::new();
        kt.store(1, mv(1));
        assert!(!kt.is_killer(2, mv(1)));
    }

    #[test]
    fn out_of_range_ply_is_ignored() {
        let mut kt = KillerTable::new();
        kt.store(MAX_PLY + 10, mv(1));
        assert_eq!(kt.at(MAX_PLY + 10), [None, None]);
    }
}
