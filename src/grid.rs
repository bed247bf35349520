use crate::error::{BackupError, Result};
use std::fmt;

/// Tile address on the tile server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// Inclusive rectangle of tiles between two corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl GridBounds {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Reject corners where the first is not the top-left one
    pub fn validate(&self) -> Result<()> {
        if self.x1 > self.x2 || self.y1 > self.y2 {
            return Err(BackupError::InvalidGrid {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
            });
        }
        Ok(())
    }

    /// Tiles per row; zero when the corners are reversed
    pub fn cols(&self) -> u32 {
        span(self.x1, self.x2)
    }

    /// Tiles per column; zero when the corners are reversed
    pub fn rows(&self) -> u32 {
        span(self.y1, self.y2)
    }

    pub fn len(&self) -> usize {
        self.cols() as usize * self.rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (row, col) of the tile at `index` in the planned sequence
    pub fn placement(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.len() {
            return None;
        }
        let cols = self.cols() as usize;
        Some(((index / cols) as u32, (index % cols) as u32))
    }
}

/// Inclusive count of `lo..=hi`, zero if `lo > hi`
fn span(lo: u32, hi: u32) -> u32 {
    hi.checked_sub(lo)
        .and_then(|d| d.checked_add(1))
        .unwrap_or(0)
}

/// Enumerate the tiles of `bounds` row by row, x varying fastest
pub fn plan_tiles(bounds: &GridBounds) -> Result<Vec<TileCoord>> {
    bounds.validate()?;

    let tiles = (bounds.y1..=bounds.y2)
        .flat_map(|y| (bounds.x1..=bounds.x2).map(move |x| TileCoord { x, y }))
        .collect();

    Ok(tiles)
}
