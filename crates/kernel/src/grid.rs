use serde::{Deserialize, Serialize};
use tileworld_common::TileRect;

use crate::tile::Tile;

/// Fixed-size grid of tiles, row-major.
///
/// Every in-bounds cell always holds a tile; removal writes [`Tile::EMPTY`].
/// Reads outside the grid see empty tiles and writes outside it are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// An all-empty grid. Negative dimensions are treated as zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Tile::EMPTY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bounds(&self) -> TileRect {
        TileRect::new(0, 0, self.width, self.height)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Tile at `(x, y)`, or [`Tile::EMPTY`] outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(Tile::EMPTY, |i| self.cells[i])
    }

    /// Overwrite `(x, y)`. No-op outside the grid.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = tile;
        }
    }

    /// Replace a non-empty cell with empty and return the old tile.
    /// `None` for empty cells and outside the grid.
    pub fn take(&mut self, x: i32, y: i32) -> Option<Tile> {
        let i = self.index(x, y)?;
        if self.cells[i].is_empty() {
            return None;
        }
        Some(std::mem::replace(&mut self.cells[i], Tile::EMPTY))
    }

    /// Cells of `rect` clipped to the grid, column-major (x outer, y inner).
    pub fn iter_window(&self, rect: TileRect) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        rect.clamp_to(self.width, self.height)
            .iter()
            .map(move |(x, y)| (x, y, self.get(x, y)))
    }

    /// Row of the topmost solid tile in column `x`, if any.
    pub fn surface(&self, x: i32) -> Option<i32> {
        (0..self.height).find(|&y| self.get(x, y).is_solid())
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_solid()).count()
    }
}
