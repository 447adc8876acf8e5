//! Square grid of tiles and coordinate arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::direction::{Axis, Direction};
use crate::error::GridError;
use crate::{Tile, FREE_SPACE, MAX_TILE, MIN_BOARD_SIZE};

/// A cell address. Both components are in `[0, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// Component along `axis`.
    pub fn along(self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row,
            Axis::Col => self.col,
        }
    }

    /// The neighbouring cell one step in `dir`, or `None` if it falls off a
    /// `size`×`size` grid.
    pub fn step(self, dir: Direction, size: usize) -> Option<Coord> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < size && col < size).then_some(Coord { row, col })
    }
}

/// Returns true for 0 or a power of two in `2..=MAX_TILE`.
pub fn is_valid_tile(value: Tile) -> bool {
    value == FREE_SPACE || (value >= 2 && value <= MAX_TILE && value.is_power_of_two())
}

/// Whether two tiles may combine. `MAX_TILE` has no representable double.
pub fn can_merge(a: Tile, b: Tile) -> bool {
    a == b && a != FREE_SPACE && a < MAX_TILE
}

/// An N×N board stored in row-major order.
///
/// Free cells hold 0, tiles hold their value (2, 4, 8, ...). Serialized as a
/// list of rows; deserializing goes through the same checks as [`Grid::from_rows`].
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Tile>>", into = "Vec<Vec<Tile>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// An all-free grid. A size of 0 gives the placeholder grid an engine
    /// holds before its first `start`.
    pub fn empty(size: usize) -> Self {
        Grid {
            size,
            cells: vec![FREE_SPACE; size * size],
        }
    }

    /// Build a grid from explicit rows, validating shape and tile values.
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();
        if size < MIN_BOARD_SIZE {
            return Err(GridError::TooSmall { size });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
                cells.push(value);
            }
        }

        Ok(Grid { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, coord: Coord) -> Option<Tile> {
        self.contains(coord).then(|| self.cells[self.offset(coord)])
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.size && coord.col < self.size
    }

    pub fn is_free(&self, coord: Coord) -> bool {
        self[coord] == FREE_SPACE
    }

    /// Row-major view of the cells.
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        // chunks(0) panics, and the placeholder grid has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord { row, col }))
    }

    /// Free cells in row-major order.
    pub fn free_coords(&self) -> Vec<Coord> {
        self.coords().filter(|&c| self.is_free(c)).collect()
    }

    /// Occupied cells in row-major order.
    pub fn occupied_coords(&self) -> Vec<Coord> {
        self.coords().filter(|&c| !self.is_free(c)).collect()
    }

    pub fn free_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == FREE_SPACE).count()
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(FREE_SPACE)
    }

    /// Whether any in-bounds 4-neighbour of `coord` holds the same, mergeable value.
    pub fn has_same_neighbor(&self, coord: Coord) -> bool {
        let value = self[coord];
        Direction::all()
            .into_iter()
            .filter_map(|dir| coord.step(dir, self.size))
            .any(|neighbor| can_merge(self[neighbor], value))
    }

    /// False exactly when every cell is occupied and no two 4-neighbours can merge.
    pub fn is_continuing(&self) -> bool {
        self.coords()
            .any(|c| self.is_free(c) || self.has_same_neighbor(c))
    }

    fn offset(&self, coord: Coord) -> usize {
        coord.row * self.size + coord.col
    }
}

impl TryFrom<Vec<Vec<Tile>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, GridError> {
        Grid::from_rows(&rows)
    }
}

impl From<Grid> for Vec<Vec<Tile>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

impl Index<Coord> for Grid {
    type Output = Tile;

    fn index(&self, coord: Coord) -> &Tile {
        assert!(self.contains(coord), "{:?} out of range for size {}", coord, self.size);
        &self.cells[self.offset(coord)]
    }
}

impl IndexMut<Coord> for Grid {
    fn index_mut(&mut self, coord: Coord) -> &mut Tile {
        assert!(self.contains(coord), "{:?} out of range for size {}", coord, self.size);
        let offset = self.offset(coord);
        &mut self.cells[offset]
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {{ size: {} }}", self.size)?;
        for row in self.rows() {
            for &val in row {
                if val == FREE_SPACE {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = format!("+{}", "------+".repeat(self.size));
        writeln!(f, "{}", border)?;
        for row in self.rows() {
            write!(f, "|")?;
            for &val in row {
                if val == FREE_SPACE {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{}", border)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid<const N: usize>(rows: [[Tile; N]; N]) -> Grid {
        Grid::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_empty_grid() {
        let g = Grid::empty(4);
        assert_eq!(g.size(), 4);
        assert_eq!(g.cells().len(), 16);
        assert_eq!(g.free_count(), 16);
        assert!(g.occupied_coords().is_empty());
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert_eq!(
            Grid::from_rows(&[[2u32]]),
            Err(GridError::TooSmall { size: 1 })
        );
        let ragged: Vec<Vec<Tile>> = vec![vec![0, 2], vec![0]];
        assert_eq!(
            Grid::from_rows(&ragged),
            Err(GridError::NotSquare { row: 1, len: 1, size: 2 })
        );
    }

    #[test]
    fn test_from_rows_rejects_non_powers_of_two() {
        assert_eq!(
            Grid::from_rows(&[[0u32, 2], [6, 0]]),
            Err(GridError::InvalidTile { row: 1, col: 0, value: 6 })
        );
        assert_eq!(
            Grid::from_rows(&[[1u32, 2], [0, 0]]),
            Err(GridError::InvalidTile { row: 0, col: 0, value: 1 })
        );
    }

    #[test]
    fn test_largest_tile_is_valid_but_never_merges() {
        assert!(is_valid_tile(MAX_TILE));
        assert!(!can_merge(MAX_TILE, MAX_TILE));
        assert!(can_merge(MAX_TILE / 2, MAX_TILE / 2));
        assert!(!can_merge(FREE_SPACE, FREE_SPACE));

        // A pair of maximal tiles is not a live move
        let g = grid([[MAX_TILE, MAX_TILE], [4, 8]]);
        assert!(!g.is_continuing());
    }

    #[test]
    fn test_serde_roundtrips_as_rows() {
        let g = grid([[2, 0], [0, 4]]);
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, "[[2,0],[0,4]]");
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), g);
    }

    #[test]
    fn test_deserialize_rejects_malformed_grids() {
        // Field-level layout is not accepted
        assert!(serde_json::from_str::<Grid>(r#"{"size":3,"cells":[6,0]}"#).is_err());
        // Ragged, too small and non-power-of-two payloads go through from_rows
        assert!(serde_json::from_str::<Grid>("[[2,0],[0]]").is_err());
        assert!(serde_json::from_str::<Grid>("[[2]]").is_err());
        let err = serde_json::from_str::<Grid>("[[6,0],[0,0]]").unwrap_err();
        assert!(err.to_string().contains("not a power of two"));
    }

    #[test]
    fn test_coord_step_bounds() {
        let corner = Coord::new(0, 0);
        assert_eq!(corner.step(Direction::Up, 4), None);
        assert_eq!(corner.step(Direction::Left, 4), None);
        assert_eq!(corner.step(Direction::Down, 4), Some(Coord::new(1, 0)));
        assert_eq!(corner.step(Direction::Right, 4), Some(Coord::new(0, 1)));

        let far = Coord::new(3, 3);
        assert_eq!(far.step(Direction::Down, 4), None);
        assert_eq!(far.step(Direction::Right, 4), None);
    }

    #[test]
    fn test_free_and_occupied_coords_row_major() {
        let g = grid([[0, 2, 0], [4, 0, 0], [0, 0, 8]]);
        assert_eq!(
            g.occupied_coords(),
            vec![Coord::new(0, 1), Coord::new(1, 0), Coord::new(2, 2)]
        );
        assert_eq!(g.free_coords().len(), 6);
        assert_eq!(g.max_tile(), 8);
    }

    #[test]
    fn test_full_grid_without_pairs_is_terminal() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!g.is_continuing());
    }

    #[test]
    fn test_single_free_cell_keeps_game_alive() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(g.is_continuing());
    }

    #[test]
    fn test_single_pair_keeps_game_alive() {
        let horizontal = grid([[2, 2, 8], [4, 8, 16], [8, 16, 32]]);
        assert!(horizontal.is_continuing());
        let vertical = grid([[2, 4, 8], [2, 8, 16], [8, 16, 32]]);
        assert!(vertical.is_continuing());
        // Diagonal equality does not count.
        let diagonal = grid([[2, 4], [8, 2]]);
        assert!(!diagonal.is_continuing());
    }

    #[test]
    fn test_display_blanks_free_cells() {
        let g = grid([[2, 0], [0, 2048]]);
        let display = g.to_string();
        assert!(display.starts_with("+------+------+"));
        assert!(display.contains("|  2   |      |"));
        assert!(display.contains(" 2048 |"));
    }

    #[test]
    fn test_to_rows() {
        let rows = [[2, 0], [0, 4]];
        assert_eq!(grid(rows).to_rows(), vec![vec![2, 0], vec![0, 4]]);
    }
}
