//! The board-state engine: applies moves, spawns tiles and detects game over.

use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::direction::{Direction, SortConfig};
use crate::grid::{can_merge, Coord, Grid};
use crate::merge_set::MergeSet;
use crate::{Tile, FREE_SPACE, INITIAL_NUMBERS_COUNT, MIN_BOARD_SIZE};

/// When a new tile appears after an `event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnPolicy {
    /// Only after a move that slid or merged at least one tile.
    #[default]
    OnChange,
    /// After every event, as long as a free cell exists.
    Always,
}

/// Tunables for a [`BoardEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub spawn_policy: SpawnPolicy,
    /// Probability that a spawned tile is a 4 rather than a 2.
    pub four_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            spawn_policy: SpawnPolicy::OnChange,
            four_probability: 0.5,
        }
    }
}

/// Result of applying one directional event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// Snapshot of the grid after the move and any spawn.
    pub grid: Grid,
    /// False once no free cell and no equal 4-neighbours remain.
    pub continuation: bool,
    /// Whether the grid differs from the one before the event.
    pub changed: bool,
}

/// Owns one game's grid and advances it one input at a time.
///
/// ```rust
/// use tile_slide_core::{BoardEngine, Direction};
///
/// let mut engine = BoardEngine::new(42);
/// let grid = engine.start(4);
/// assert_eq!(grid.occupied_coords().len(), 2);
///
/// let result = engine.event(Direction::Left);
/// assert!(result.continuation);
/// ```
#[derive(Debug, Clone)]
pub struct BoardEngine {
    grid: Grid,
    merged: MergeSet,
    rng: SmallRng,
    config: EngineConfig,
}

impl BoardEngine {
    /// Create an engine with the default configuration. Call [`start`](Self::start)
    /// before sending events.
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, EngineConfig::default())
    }

    pub fn with_config(seed: u64, config: EngineConfig) -> Self {
        assert!(
            (0.0..=1.0).contains(&config.four_probability),
            "four_probability must be within [0, 1], got {}",
            config.four_probability
        );
        BoardEngine {
            grid: Grid::empty(0),
            merged: MergeSet::new(0),
            rng: SmallRng::seed_from_u64(seed),
            config,
        }
    }

    /// Begin a new game on a `size`×`size` grid with two random tiles.
    ///
    /// Panics if `size` is below [`MIN_BOARD_SIZE`].
    pub fn start(&mut self, size: usize) -> &Grid {
        assert!(
            size >= MIN_BOARD_SIZE,
            "board size must be at least {}, got {}",
            MIN_BOARD_SIZE,
            size
        );
        self.grid = Grid::empty(size);
        self.merged = MergeSet::new(size);
        for _ in 0..INITIAL_NUMBERS_COUNT {
            self.spawn_tile();
        }
        debug!("started {}x{} game: {:?}", size, size, self.grid.occupied_coords());
        &self.grid
    }

    /// Replace the current grid, e.g. to resume a position.
    pub fn set_grid(&mut self, grid: Grid) {
        self.merged = MergeSet::new(grid.size());
        self.grid = grid;
    }

    /// Apply one move, then spawn a tile according to the spawn policy.
    pub fn event(&mut self, direction: Direction) -> GameResult {
        let moved = apply_move(&mut self.grid, &mut self.merged, direction);

        let should_spawn = match self.config.spawn_policy {
            SpawnPolicy::OnChange => moved,
            SpawnPolicy::Always => true,
        };
        let spawned = should_spawn && self.spawn_tile().is_some();
        trace!("event {}: moved={} spawned={}", direction, moved, spawned);

        let continuation = self.grid.is_continuing();
        if !continuation {
            debug!("no moves left, max tile {}", self.grid.max_tile());
        }

        GameResult {
            grid: self.grid.clone(),
            continuation,
            changed: moved || spawned,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn is_continuing(&self) -> bool {
        self.grid.is_continuing()
    }

    /// Whether a move in `direction` would slide or merge any tile.
    pub fn can_move(&self, direction: Direction) -> bool {
        let mut probe = self.grid.clone();
        let mut merged = MergeSet::new(probe.size());
        apply_move(&mut probe, &mut merged, direction)
    }

    /// Directions that would change the grid, in Up, Down, Left, Right order.
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::all()
            .into_iter()
            .filter(|&dir| self.can_move(dir))
            .collect()
    }

    pub fn max_tile(&self) -> Tile {
        self.grid.max_tile()
    }

    pub fn free_count(&self) -> usize {
        self.grid.free_count()
    }

    /// Place a 2 or 4 on a uniformly random free cell.
    /// Returns the chosen cell, or `None` when the grid is full.
    fn spawn_tile(&mut self) -> Option<Coord> {
        let free = self.grid.free_coords();
        if free.is_empty() {
            return None;
        }

        let coord = free[self.rng.gen_range(0..free.len())];
        let value = if self.rng.gen_bool(self.config.four_probability) {
            4
        } else {
            2
        };
        self.grid[coord] = value;
        trace!("spawned {} at {:?}", value, coord);
        Some(coord)
    }
}

/// Slide and merge every tile of `grid` toward `direction`.
///
/// Tiles nearest the leading edge are processed first, and each cell takes at
/// most one merge. `merged` must match the grid size; it is empty on return.
/// Returns whether any tile moved or merged.
pub fn apply_move(grid: &mut Grid, merged: &mut MergeSet, direction: Direction) -> bool {
    debug_assert_eq!(merged.size(), grid.size());
    merged.clear();

    let SortConfig { axis, sign } = direction.sort_config();
    let mut coords = grid.occupied_coords();
    coords.sort_by_key(|c| c.along(axis) as i64 * sign);

    let mut changed = false;
    for coord in coords {
        changed |= slide(grid, merged, coord, direction);
    }

    merged.clear();
    changed
}

/// Advance one tile until it reaches the edge, is blocked or merges.
fn slide(grid: &mut Grid, merged: &mut MergeSet, start: Coord, direction: Direction) -> bool {
    let size = grid.size();
    let mut from = start;
    let mut changed = false;

    if grid.is_free(from) {
        return false;
    }

    while let Some(to) = from.step(direction, size) {
        if grid.is_free(to) {
            grid[to] = grid[from];
            grid[from] = FREE_SPACE;
            from = to;
            changed = true;
            continue;
        }

        if can_merge(grid[to], grid[from]) && !merged.contains(from) && !merged.contains(to) {
            grid[to] *= 2;
            grid[from] = FREE_SPACE;
            merged.insert(to);
            changed = true;
        }
        break;
    }

    changed
}
