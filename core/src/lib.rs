//! # Sliding-Tile Merge Puzzle Engine
//!
//! The board-state core of 2048: an N×N grid of power-of-two tiles that slide
//! and merge toward one edge per directional input. Rendering and input
//! capture are left to front ends, which only see a [`Grid`] snapshot and a
//! continuation flag.
//!
//! ## Example
//!
//! ```rust
//! use tile_slide_core::{BoardEngine, Direction, BOARD_SIZE};
//!
//! let mut engine = BoardEngine::new(42);  // Seeded for reproducible games
//! engine.start(BOARD_SIZE);
//! let result = engine.event(Direction::Left);
//! println!("{}continue: {}", result.grid, result.continuation);
//! ```

pub mod direction;
pub mod engine;
pub mod error;
pub mod grid;
pub mod merge_set;

pub use direction::{Axis, Direction, ParseDirectionError, SortConfig};
pub use engine::{apply_move, BoardEngine, EngineConfig, GameResult, SpawnPolicy};
pub use error::GridError;
pub use grid::{can_merge, is_valid_tile, Coord, Grid};
pub use merge_set::MergeSet;

/// Value held by a grid cell: 0 when free, otherwise a power of two.
pub type Tile = u32;

/// Value of a free cell.
pub const FREE_SPACE: Tile = 0;

/// Tiles placed by [`BoardEngine::start`].
pub const INITIAL_NUMBERS_COUNT: usize = 2;

/// Classic board size used by the front ends.
pub const BOARD_SIZE: usize = 4;

/// Largest tile a cell can hold; it never merges further.
pub const MAX_TILE: Tile = 1 << 31;

/// Smaller boards admit no moves.
pub const MIN_BOARD_SIZE: usize = 2;
