use crate::grid::Coord;

/// Cells that already received a merge during the current move.
///
/// Stored as a boolean grid parallel to the board so lookups stay O(1).
#[derive(Debug, Clone, Default)]
pub struct MergeSet {
    size: usize,
    merged: Vec<bool>,
}

impl MergeSet {
    pub fn new(size: usize) -> Self {
        MergeSet {
            size,
            merged: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.merged[coord.row * self.size + coord.col]
    }

    pub fn insert(&mut self, coord: Coord) {
        self.merged[coord.row * self.size + coord.col] = true;
    }

    pub fn clear(&mut self) {
        self.merged.fill(false);
    }

    pub fn is_empty(&self) -> bool {
        !self.merged.iter().any(|&m| m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_clear() {
        let mut set = MergeSet::new(3);
        assert!(set.is_empty());

        set.insert(Coord::new(2, 1));
        assert!(set.contains(Coord::new(2, 1)));
        assert!(!set.contains(Coord::new(1, 2)));
        assert!(!set.is_empty());

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.size(), 3);
    }
}
