//! # Sliding-Tile WebAssembly Bindings
//!
//! JavaScript-friendly bindings to the board engine using wasm-bindgen. The
//! page owns rendering and key handling; it calls `start` once and `event`
//! for every recognized arrow key.

use serde::Serialize;
use tile_slide_core::{BoardEngine, Direction, GameResult, Grid, Tile, MIN_BOARD_SIZE};
use wasm_bindgen::prelude::*;

/// Result of an event, serialized for JavaScript.
#[derive(Debug, Serialize)]
pub struct JsGameResult {
    /// Row-major cells, `size * size` elements.
    pub board: Vec<Tile>,
    pub size: usize,
    /// False once no move can change the board.
    pub continuation: bool,
    /// Whether the board changed.
    pub changed: bool,
}

impl From<GameResult> for JsGameResult {
    fn from(result: GameResult) -> Self {
        JsGameResult {
            size: result.grid.size(),
            board: result.grid.cells().to_vec(),
            continuation: result.continuation,
            changed: result.changed,
        }
    }
}

/// WebAssembly wrapper around one game.
#[wasm_bindgen]
pub struct WasmEngine {
    engine: BoardEngine,
}

#[wasm_bindgen]
impl WasmEngine {
    /// Create an engine with the given seed. Call `start` before `event`.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WasmEngine {
        WasmEngine {
            engine: BoardEngine::new(seed),
        }
    }

    /// Start a new game and return its row-major board.
    ///
    /// Sizes below the minimum are raised to it rather than trapping.
    pub fn start(&mut self, size: usize) -> Vec<Tile> {
        self.engine.start(size.max(MIN_BOARD_SIZE)).cells().to_vec()
    }

    /// Resume from a position given as an array of rows.
    ///
    /// Throws if the rows are ragged, too few, or hold a non-power-of-two.
    #[wasm_bindgen(js_name = setBoard)]
    pub fn set_board(&mut self, rows: JsValue) -> Result<(), JsValue> {
        let grid: Grid = serde_wasm_bindgen::from_value(rows)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.engine.set_grid(grid);
        Ok(())
    }

    /// Apply a move in the given direction.
    ///
    /// Direction values:
    /// - 0 = Up
    /// - 1 = Down
    /// - 2 = Left
    /// - 3 = Right
    ///
    /// Returns an object `{ board, size, continuation, changed }`.
    pub fn event(&mut self, direction: u8) -> JsValue {
        let result = match Direction::from_u8(direction) {
            Some(dir) => self.engine.event(dir),
            // Unknown codes are ignored, like unmapped keys
            None => GameResult {
                grid: self.engine.grid().clone(),
                continuation: self.engine.is_continuing(),
                changed: false,
            },
        };
        to_js(&JsGameResult::from(result))
    }

    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> Vec<Tile> {
        self.engine.grid().cells().to_vec()
    }

    #[wasm_bindgen(js_name = getSize)]
    pub fn get_size(&self) -> usize {
        self.engine.size()
    }

    #[wasm_bindgen(js_name = isContinuing)]
    pub fn is_continuing(&self) -> bool {
        self.engine.is_continuing()
    }

    #[wasm_bindgen(js_name = getMaxTile)]
    pub fn get_max_tile(&self) -> Tile {
        self.engine.max_tile()
    }
}

fn to_js(result: &JsGameResult) -> JsValue {
    serde_wasm_bindgen::to_value(result).unwrap_or(JsValue::NULL)
}
