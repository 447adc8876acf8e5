use std::fmt;

use crate::Tile;

/// Errors raised when building a [`Grid`](crate::Grid) from caller-supplied rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Fewer rows than the smallest playable board
    TooSmall { size: usize },
    /// A row whose length differs from the number of rows
    NotSquare { row: usize, len: usize, size: usize },
    /// A non-zero cell that is not a power of two ≥ 2
    InvalidTile { row: usize, col: usize, value: Tile },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::TooSmall { size } => {
                write!(f, "grid size {} is below the minimum of {}", size, crate::MIN_BOARD_SIZE)
            }
            GridError::NotSquare { row, len, size } => write!(
                f,
                "row {} has {} cells but the grid has {} rows",
                row, len, size
            ),
            GridError::InvalidTile { row, col, value } => write!(
                f,
                "cell ({}, {}) holds {}, which is not a power of two",
                row, col, value
            ),
        }
    }
}

impl std::error::Error for GridError {}
