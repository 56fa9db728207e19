//! Fixed-capacity 2D tile storage
//!
//! The backing array is sized for the largest allowed map, so resizing never
//! reallocates or moves tiles. Index of `(x, y)` is `(y << shift) + x`.

use crate::core::error::{EngineError, Result};
use crate::grid::direction::{PrimaryDirection, Rect, TilePos, PRIMARY_DIRECTIONS};

/// Notification produced by a successful resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridResize {
    pub old_size: (i16, i16),
    pub new_size: (i16, i16),
}

/// Power-of-two capacity grid
#[derive(Debug, Clone)]
pub struct Grid<T> {
    shift: u32,
    width: i16,
    height: i16,
    tiles: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Create an empty (0x0) grid able to grow to `1 << shift` per side
    pub fn new(shift: u32) -> Self {
        Self::filled(shift, T::default())
    }
}

impl<T: Clone> Grid<T> {
    /// Like `new`, with every slot of the backing array set to `tile`
    pub fn filled(shift: u32, tile: T) -> Self {
        let side = 1usize << shift;
        Self {
            shift,
            width: 0,
            height: 0,
            tiles: vec![tile; side * side],
        }
    }

    /// Overwrite every tile of the current area with `tile`
    pub fn fill(&mut self, tile: T) {
        let area = self.bounds();
        self.fill_area(tile, area);
    }

    /// Overwrite every tile in `area` (clipped to the max bounds)
    pub fn fill_area(&mut self, tile: T, area: Rect) {
        self.for_each_tile_in_area_mut(area, |_, slot| *slot = tile.clone());
    }

    /// Overwrite the entire backing array, including tiles outside the current size
    pub fn fill_max_area(&mut self, tile: T) {
        let area = self.max_bounds();
        self.fill_area(tile, area);
    }
}

impl<T> Grid<T> {
    pub fn max_size(&self) -> i16 {
        1 << self.shift
    }

    pub fn max_bounds(&self) -> Rect {
        Rect::with_size(self.max_size(), self.max_size())
    }

    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.width, self.height)
    }

    pub fn is_valid_size(&self, width: i32, height: i32) -> bool {
        let max = i32::from(self.max_size());
        width > 0 && height > 0 && width <= max && height <= max
    }

    /// Change the playable area; tile contents are left untouched
    pub fn resize(&mut self, width: i32, height: i32) -> Result<GridResize> {
        if !self.is_valid_size(width, height) {
            return Err(EngineError::InvalidMapSize {
                width,
                height,
                max: i32::from(self.max_size()),
            });
        }

        let old_size = (self.width, self.height);
        self.width = width as i16;
        self.height = height as i16;

        Ok(GridResize {
            old_size,
            new_size: (self.width, self.height),
        })
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    pub fn size(&self) -> (i16, i16) {
        (self.width, self.height)
    }

    /// Has a positive size within the max bounds
    pub fn is_valid(&self) -> bool {
        self.is_valid_size(i32::from(self.width), i32::from(self.height))
    }

    /// Inside the current playable area
    pub fn is_valid_pos(&self, pos: TilePos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Backing-array index for any position inside the max bounds
    pub fn tile_index(&self, pos: TilePos) -> Option<usize> {
        if self.max_bounds().contains(pos) {
            Some(((pos.y as usize) << self.shift) + pos.x as usize)
        } else {
            None
        }
    }

    /// Total number of slots in the backing array
    pub fn capacity(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn get(&self, pos: TilePos) -> Option<&T> {
        if self.is_valid_pos(pos) {
            self.tile_index(pos).map(|i| &self.tiles[i])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, pos: TilePos) -> Option<&mut T> {
        if self.is_valid_pos(pos) {
            let index = self.tile_index(pos)?;
            Some(&mut self.tiles[index])
        } else {
            None
        }
    }

    /// Replace the tile at `pos`; returns false if out of bounds
    pub fn set(&mut self, pos: TilePos, tile: T) -> bool {
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    pub fn cursor(&self, pos: TilePos) -> TileCursor<'_, T> {
        TileCursor { grid: self, pos }
    }

    pub fn cursor_mut(&mut self, pos: TilePos) -> TileCursorMut<'_, T> {
        TileCursorMut { grid: self, pos }
    }

    /// Row-major positions of the current playable area
    pub fn positions(&self) -> impl Iterator<Item = TilePos> {
        self.bounds().positions()
    }

    pub fn for_each_tile<F: FnMut(TileCursor<'_, T>)>(&self, f: F) {
        self.for_each_tile_in_area(self.bounds(), f);
    }

    /// Visit every position of `area` clipped to the max bounds
    ///
    /// Cursors outside the current size are handed out too (`is_valid()` is
    /// false for them); this is what initialization over the max area uses.
    pub fn for_each_tile_in_area<F: FnMut(TileCursor<'_, T>)>(&self, area: Rect, mut f: F) {
        for pos in area.intersect(&self.max_bounds()).positions() {
            f(self.cursor(pos));
        }
    }

    pub fn for_each_tile_in_area_mut<F: FnMut(TilePos, &mut T)>(&mut self, area: Rect, mut f: F) {
        for pos in area.intersect(&self.max_bounds()).positions() {
            if let Some(index) = self.tile_index(pos) {
                f(pos, &mut self.tiles[index]);
            }
        }
    }
}

/// Read-only iterator bound to one grid position
#[derive(Debug)]
pub struct TileCursor<'a, T> {
    grid: &'a Grid<T>,
    pos: TilePos,
}

impl<'a, T> Clone for TileCursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for TileCursor<'a, T> {}

impl<'a, T> TileCursor<'a, T> {
    pub fn pos(&self) -> TilePos {
        self.pos
    }

    pub fn is_valid(&self) -> bool {
        self.grid.is_valid_pos(self.pos)
    }

    pub fn index(&self) -> Option<usize> {
        self.grid.tile_index(self.pos)
    }

    pub fn get(&self) -> Option<&'a T> {
        self.grid.get(self.pos)
    }

    pub fn adjacent(&self, direction: PrimaryDirection) -> TileCursor<'a, T> {
        TileCursor {
            grid: self.grid,
            pos: self.pos.offset(direction),
        }
    }

    /// Valid neighbors in all eight directions
    pub fn adjacent_tiles(&self) -> impl Iterator<Item = TileCursor<'a, T>> + 'a
    where
        T: 'a,
    {
        let here = *self;
        PRIMARY_DIRECTIONS
            .into_iter()
            .map(move |d| here.adjacent(d))
            .filter(|c| c.is_valid())
    }
}

/// Mutable iterator bound to one grid position; `step` moves it in place
#[derive(Debug)]
pub struct TileCursorMut<'a, T> {
    grid: &'a mut Grid<T>,
    pos: TilePos,
}

impl<'a, T> TileCursorMut<'a, T> {
    pub fn pos(&self) -> TilePos {
        self.pos
    }

    pub fn is_valid(&self) -> bool {
        self.grid.is_valid_pos(self.pos)
    }

    pub fn get(&self) -> Option<&T> {
        self.grid.get(self.pos)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.grid.get_mut(self.pos)
    }

    pub fn step(&mut self, direction: PrimaryDirection) {
        self.pos = self.pos.offset(direction);
    }
}
