use serde::Serialize;

use crate::grid::{Tile, TileId};
use crate::session::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileSnapshot {
    pub id: TileId,
    /// Kind code (0-based index into the theme)
    pub kind: u8,
    pub matched: bool,
    pub falling: bool,
}

impl From<&Tile> for TileSnapshot {
    fn from(value: &Tile) -> Self {
        Self {
            id: value.id,
            kind: value.kind.code(),
            matched: value.is_matched,
            falling: value.is_falling,
        }
    }
}

/// Read-only view of a session for renderers and JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    pub size: u8,
    /// Row-major cells, `size * size` entries
    pub cells: Vec<Option<TileSnapshot>>,
    pub phase: Phase,
    pub score: u32,
    pub combo: u32,
    pub moves: u32,
}

impl Default for GridSnapshot {
    fn default() -> Self {
        Self {
            size: 0,
            cells: Vec::new(),
            phase: Phase::Idle,
            score: 0,
            combo: 0,
            moves: 0,
        }
    }
}

impl GridSnapshot {
    /// Reset every field, keeping the cell buffer's allocation
    pub fn clear(&mut self) {
        self.size = 0;
        self.cells.clear();
        self.phase = Phase::Idle;
        self.score = 0;
        self.combo = 0;
        self.moves = 0;
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Cells of one row, or an empty slice past the last row
    pub fn row(&self, row: usize) -> &[Option<TileSnapshot>] {
        let n = self.size as usize;
        self.cells.get(row * n..(row + 1) * n).unwrap_or(&[])
    }
}
