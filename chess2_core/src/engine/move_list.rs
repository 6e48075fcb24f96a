use crate::engine::Move;
use std::ops::Index;

// A queen, two jumpers and a hybrid in the open stay well under this.
const MAX_MOVES: usize = 256;

/// A candidate move and its ordering score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

pub struct MoveList {
    pub moves: [ScoredMove; MAX_MOVES],
    pub count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self {
            moves: [ScoredMove::default(); MAX_MOVES],
            count: 0,
        }
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mv: Move, score: i32) {
        if let Some(slot) = self.moves.get_mut(self.count) {
            *slot = ScoredMove { mv, score };
            self.count += 1;
        } else {
            debug_assert!(false, "MoveList overflow! Max moves: {}", MAX_MOVES);
        }
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn first(&self) -> Option<&ScoredMove> {
        self.iter().next()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredMove> {
        self.moves.get(0..self.count).unwrap_or(&[]).iter()
    }

    /// Stable: equal scores keep their insertion order.
    pub fn sort_by_score_desc(&mut self) {
        if let Some(slice) = self.moves.get_mut(0..self.count) {
            slice.sort_by(|a, b| b.score.cmp(&a.score));
        }
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a ScoredMove;
    type IntoIter = std::slice::Iter<'a, ScoredMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Index<usize> for MoveList {
    type Output = ScoredMove;

    fn index(&self, index: usize) -> &Self::Output {
        self.moves.get(index).unwrap_or(&self.moves[0]) // Fallback to 0th element (dummy) instead of panic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::Square;

    fn mv(col: u8) -> Move {
        Move::new(Square::new(6, col).unwrap(), Square::new(5, col).unwrap())
    }

    #[test]
    fn test_sort_is_stable_and_descending() {
        let mut list = MoveList::new();
        list.push(mv(0), 0);
        list.push(mv(1), 500);
        list.push(mv(2), 0);
        list.push(mv(3), 500);
        list.sort_by_score_desc();

        let order: Vec<u8> = list.iter().map(|s| s.mv.from.col()).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
        assert_eq!(list.len(), 4);
        assert_eq!(list[0].score, 500);
    }

    #[test]
    fn test_empty_list() {
        let list = MoveList::new();
        assert!(list.is_empty());
        assert!(list.first().is_none());
    }
}
