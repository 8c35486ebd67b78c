//! Grid module - owns the tile grid and all structural mutation
//!
//! The grid is an NxN array of cells where each cell is empty or holds a
//! [`Tile`]. Uses a flat row-major vector (`row * size + col`) for cache
//! locality. Coordinates are `(row, col)` with row 0 at the top.
//!
//! This module knows nothing about matching beyond "two cells adjacent" and
//! "two tiles of equal kind". It creates grids, swaps cells, removes cells,
//! applies gravity and refills.

use std::fmt;

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::matching::Match;
use crate::rng::TileSource;
use crate::types::{Position, Theme, TileKind, MAX_GRID_SIZE, MAX_THEME_KINDS};

/// Tile identity, unique within one grid lineage
pub type TileId = u32;

/// A single tile.
///
/// `id` and `kind` never change for the tile's lifetime; `position` follows
/// the tile through swaps and falls. The two flags are transient and advisory
/// to the rendering layer; the engine only reads `is_matched` back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub position: Position,
    pub is_matched: bool,
    pub is_falling: bool,
}

/// A grid cell
pub type Cell = Option<Tile>;

/// Errors from parsing board text with [`Grid::from_rows`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("board text has no rows")]
    Empty,

    #[error("board side {size} exceeds the maximum of {max}", max = MAX_GRID_SIZE)]
    TooLarge { size: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell `{ch}` at row {row}, col {col}")]
    UnknownCell { row: usize, col: usize, ch: char },
}

/// The game grid - `size` x `size` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: u8,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
    next_id: TileId,
}

impl Grid {
    /// Create a new empty grid. `size` is clamped to `MAX_GRID_SIZE`.
    pub fn new(size: u8) -> Self {
        let size = size.min(MAX_GRID_SIZE);
        Self {
            size,
            cells: vec![None; size as usize * size as usize],
            next_id: 1,
        }
    }

    /// Create a full grid containing no run of three.
    ///
    /// Cells are filled row-major. Each kind is drawn from the theme minus the
    /// kind shared by the two cells to the left (if they match) and minus the
    /// kind shared by the two cells above (if they match).
    pub fn generate<S: TileSource + ?Sized>(size: u8, theme: &Theme, source: &mut S) -> Self {
        let mut grid = Self::new(size);
        grid.fill_without_runs(theme, source);
        grid
    }

    /// Replace every tile with a freshly generated run-free layout.
    ///
    /// Tile ids keep counting from where this grid left off.
    pub fn regenerate<S: TileSource + ?Sized>(&mut self, theme: &Theme, source: &mut S) {
        for cell in &mut self.cells {
            *cell = None;
        }
        self.fill_without_runs(theme, source);
    }

    fn fill_without_runs<S: TileSource + ?Sized>(&mut self, theme: &Theme, source: &mut S) {
        let n = self.size as i8;
        for row in 0..n {
            for col in 0..n {
                let left = self.pair_kind(Position::new(row, col - 1), Position::new(row, col - 2));
                let above = self.pair_kind(Position::new(row - 1, col), Position::new(row - 2, col));

                let candidates: ArrayVec<TileKind, MAX_THEME_KINDS> = theme
                    .kinds()
                    .iter()
                    .copied()
                    .filter(|&kind| Some(kind) != left && Some(kind) != above)
                    .take(MAX_THEME_KINDS)
                    .collect();

                let kind = draw_kind(source, &candidates, theme);
                self.place_new(Position::new(row, col), kind, false);
            }
        }
    }

    /// Kind shared by two cells, if both are filled with the same kind
    fn pair_kind(&self, a: Position, b: Position) -> Option<TileKind> {
        let ka = self.tile_at(a)?.kind;
        let kb = self.tile_at(b)?.kind;
        (ka == kb).then_some(ka)
    }

    fn place_new(&mut self, pos: Position, kind: TileKind, is_falling: bool) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        self.cells[idx] = Some(Tile {
            id: self.next_id,
            kind,
            position: pos,
            is_matched: false,
            is_falling,
        });
        self.next_id = self.next_id.wrapping_add(1);
        true
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.is_valid_position(pos) {
            return None;
        }
        Some(pos.row as usize * self.size as usize + pos.col as usize)
    }

    /// Side length of the grid
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Check if a position lies inside the grid
    pub fn is_valid_position(&self, pos: Position) -> bool {
        let n = self.size as i8;
        pos.row >= 0 && pos.row < n && pos.col >= 0 && pos.col < n
    }

    /// Tile at `pos`, or `None` if the cell is empty or out of bounds
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).and_then(|idx| self.cells[idx].as_ref())
    }

    /// Kind of the tile at `pos`, if any
    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.tile_at(pos).map(|tile| tile.kind)
    }

    /// True iff the positions differ by exactly one row or one column
    pub fn are_adjacent(a: Position, b: Position) -> bool {
        a.is_adjacent(b)
    }

    /// Exchange the tiles at two positions, updating their `position` fields.
    ///
    /// No adjacency check; callers validate first. Returns false (and leaves the
    /// grid untouched) if either position is out of bounds.
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        if let Some(tile) = self.cells[ia].as_mut() {
            tile.position = a;
        }
        if let Some(tile) = self.cells[ib].as_mut() {
            tile.position = b;
        }
        true
    }

    /// A copy of this grid with the tiles at `a` and `b` exchanged
    pub fn swapped(&self, a: Position, b: Position) -> Grid {
        let mut copy = self.clone();
        copy.swap(a, b);
        copy
    }

    /// Flag the tiles at the listed positions as matched. Returns the number of
    /// tiles newly flagged; empty and out-of-bounds positions are ignored.
    pub fn mark_positions<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = Position>,
    {
        let mut marked = 0;
        for pos in positions {
            if let Some(idx) = self.index(pos) {
                if let Some(tile) = self.cells[idx].as_mut() {
                    if !tile.is_matched {
                        tile.is_matched = true;
                        marked += 1;
                    }
                }
            }
        }
        marked
    }

    /// Flag every tile covered by `matches` as matched
    pub fn mark_matched(&mut self, matches: &[Match]) -> usize {
        self.mark_positions(matches.iter().flat_map(Match::positions))
    }

    /// Empty every listed cell. Returns the number of tiles removed; repeated
    /// and out-of-bounds positions are ignored.
    pub fn remove_positions<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = Position>,
    {
        let mut removed = 0;
        for pos in positions {
            if let Some(idx) = self.index(pos) {
                if self.cells[idx].take().is_some() {
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Empty every cell referenced by any match
    pub fn remove_matched(&mut self, matches: &[Match]) -> usize {
        self.remove_positions(matches.iter().flat_map(Match::positions))
    }

    /// Compact each column downward, preserving order, leaving empties on top.
    ///
    /// Scans each column from the bottom row upward while tracking the lowest
    /// unfilled row. Moved tiles get their position updated and `is_falling`
    /// set. Returns the number of tiles moved.
    pub fn apply_gravity(&mut self) -> usize {
        let n = self.size as i8;
        let mut moved = 0;

        for col in 0..n {
            let mut write_row = n - 1;
            for read_row in (0..n).rev() {
                let Some(src) = self.index(Position::new(read_row, col)) else {
                    continue;
                };
                let Some(mut tile) = self.cells[src] else {
                    continue;
                };

                if read_row != write_row {
                    let target = Position::new(write_row, col);
                    if let Some(dst) = self.index(target) {
                        tile.position = target;
                        tile.is_falling = true;
                        self.cells[dst] = Some(tile);
                        self.cells[src] = None;
                        moved += 1;
                    }
                }
                write_row -= 1;
            }
        }

        moved
    }

    /// Put a new random tile (no run avoidance) into every empty cell.
    ///
    /// Cells are filled row-major, top row first. New tiles have `is_falling`
    /// set. Returns the number of tiles created.
    pub fn fill_empty<S: TileSource + ?Sized>(&mut self, theme: &Theme, source: &mut S) -> usize {
        let n = self.size as i8;
        let mut filled = 0;
        for row in 0..n {
            for col in 0..n {
                let pos = Position::new(row, col);
                if self.tile_at(pos).is_none() {
                    let kind = draw_kind(source, theme.kinds(), theme);
                    if self.place_new(pos, kind, true) {
                        filled += 1;
                    }
                }
            }
        }
        filled
    }

    /// Number of empty cells
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Clear the transient `is_matched` / `is_falling` flags on every tile
    pub fn clear_flags(&mut self) {
        for tile in self.cells.iter_mut().flatten() {
            tile.is_matched = false;
            tile.is_falling = false;
        }
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    /// Id the next created tile will receive
    pub fn next_tile_id(&self) -> TileId {
        self.next_id
    }

    /// Build a grid from board text: one string per row, one letter per kind
    /// (`A` = kind 0), `.` for an empty cell. Whitespace is ignored.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GridParseError> {
        if rows.is_empty() {
            return Err(GridParseError::Empty);
        }
        if rows.len() > MAX_GRID_SIZE as usize {
            return Err(GridParseError::TooLarge { size: rows.len() });
        }

        let size = rows.len();
        let mut grid = Self::new(size as u8);
        for (row, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if chars.len() != size {
                return Err(GridParseError::RaggedRow {
                    row,
                    expected: size,
                    found: chars.len(),
                });
            }
            for (col, &ch) in chars.iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let kind =
                    TileKind::from_char(ch).ok_or(GridParseError::UnknownCell { row, col, ch })?;
                grid.place_new(Position::new(row as i8, col as i8), kind, false);
            }
        }
        Ok(grid)
    }

    /// Board text, one string per row (inverse of [`Grid::from_rows`])
    pub fn to_rows(&self) -> Vec<String> {
        let n = self.size as usize;
        self.cells
            .chunks(n.max(1))
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or('.', |tile| tile.kind.as_char()))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.to_rows();
        for (i, row) in rows.iter().enumerate() {
            if i + 1 < rows.len() {
                writeln!(f, "{}", row)?;
            } else {
                write!(f, "{}", row)?;
            }
        }
        Ok(())
    }
}

/// Draw from `candidates`, falling back to the whole theme if the candidate
/// set came out empty.
fn draw_kind<S: TileSource + ?Sized>(
    source: &mut S,
    candidates: &[TileKind],
    theme: &Theme,
) -> TileKind {
    source
        .next_kind(candidates)
        .or_else(|| source.next_kind(theme.kinds()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedSource, SimpleRng};

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(8);
        assert_eq!(grid.index(pos(0, 0)), Some(0));
        assert_eq!(grid.index(pos(0, 7)), Some(7));
        assert_eq!(grid.index(pos(1, 0)), Some(8));
        assert_eq!(grid.index(pos(7, 7)), Some(63));
        assert_eq!(grid.index(pos(-1, 0)), None);
        assert_eq!(grid.index(pos(0, 8)), None);
        assert_eq!(grid.index(pos(8, 0)), None);
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(5);
        assert_eq!(grid.size(), 5);
        assert_eq!(grid.count_empty(), 25);
        assert_eq!(grid.tiles().count(), 0);
    }

    #[test]
    fn test_size_is_clamped() {
        let grid = Grid::new(200);
        assert_eq!(grid.size(), MAX_GRID_SIZE);
    }

    #[test]
    fn test_from_rows_roundtrip() {
        let rows = ["AB.", "CAB", "..C"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.to_rows(), rows);
        assert_eq!(grid.count_empty(), 3);
        assert_eq!(grid.to_string(), "AB.\nCAB\n..C");
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(Grid::from_rows(&[]), Err(GridParseError::Empty));
        assert_eq!(
            Grid::from_rows(&["AB", "A"]),
            Err(GridParseError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            Grid::from_rows(&["A#", "AB"]),
            Err(GridParseError::UnknownCell {
                row: 0,
                col: 1,
                ch: '#'
            })
        );
    }

    #[test]
    fn test_tile_ids_are_unique_and_positions_consistent() {
        let grid = Grid::generate(8, &Theme::classic(), &mut SimpleRng::new(5));
        let mut ids: Vec<TileId> = grid.tiles().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 64);

        for row in 0..8 {
            for col in 0..8 {
                let tile = grid.tile_at(pos(row, col)).unwrap();
                assert_eq!(tile.position, pos(row, col));
                assert!(!tile.is_falling);
                assert!(!tile.is_matched);
            }
        }
    }

    #[test]
    fn test_generate_excludes_left_and_above_pairs() {
        // Script asks for `A` everywhere; exclusions must force other kinds.
        let theme = Theme::with_kind_count("abc", 3).unwrap();
        let mut source = ScriptedSource::from_letters(&"A".repeat(9));
        let grid = Grid::generate(3, &theme, &mut source);

        // (0,2): left pair is AA so A is excluded, first remaining candidate is B
        assert_eq!(grid.to_rows()[0], "AAB");
        // (2,0): above pair is AA so A is excluded
        assert_eq!(grid.kind_at(pos(2, 0)), Some(TileKind::new(1)));
    }

    #[test]
    fn test_swap_updates_positions() {
        let mut grid = Grid::from_rows(&["AB", "CD"]).unwrap();
        let a_id = grid.tile_at(pos(0, 0)).unwrap().id;

        assert!(grid.swap(pos(0, 0), pos(0, 1)));
        assert_eq!(grid.to_rows(), ["BA", "CD"]);

        let moved = grid.tile_at(pos(0, 1)).unwrap();
        assert_eq!(moved.id, a_id);
        assert_eq!(moved.position, pos(0, 1));
        assert_eq!(grid.tile_at(pos(0, 0)).unwrap().position, pos(0, 0));
    }

    #[test]
    fn test_swap_out_of_bounds_is_noop() {
        let mut grid = Grid::from_rows(&["AB", "CD"]).unwrap();
        let before = grid.clone();
        assert!(!grid.swap(pos(0, 0), pos(0, 2)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_swapped_does_not_alias() {
        let grid = Grid::from_rows(&["AB", "CD"]).unwrap();
        let copy = grid.swapped(pos(0, 0), pos(1, 0));
        assert_eq!(grid.to_rows(), ["AB", "CD"]);
        assert_eq!(copy.to_rows(), ["CB", "AD"]);
    }

    #[test]
    fn test_remove_positions_is_idempotent() {
        let mut grid = Grid::from_rows(&["AB", "CD"]).unwrap();
        assert_eq!(grid.remove_positions([pos(0, 0), pos(0, 0), pos(5, 5)]), 1);
        assert_eq!(grid.remove_positions([pos(0, 0)]), 0);
        assert_eq!(grid.to_rows(), [".B", "CD"]);
    }

    #[test]
    fn test_gravity_compacts_column() {
        let mut grid = Grid::from_rows(&["A..", ".B.", "C.."]).unwrap();
        let moved = grid.apply_gravity();
        assert_eq!(moved, 2);
        assert_eq!(grid.to_rows(), ["...", "A..", "CB."]);

        let a = grid.tile_at(pos(1, 0)).unwrap();
        assert_eq!(a.position, pos(1, 0));
        assert!(a.is_falling);
        assert!(!grid.tile_at(pos(2, 0)).unwrap().is_falling);
    }

    #[test]
    fn test_fill_empty_marks_falling() {
        let mut grid = Grid::from_rows(&["A.", ".B"]).unwrap();
        let mut source = ScriptedSource::from_letters("CD");
        let filled = grid.fill_empty(&Theme::classic(), &mut source);
        assert_eq!(filled, 2);
        assert_eq!(grid.to_rows(), ["AC", "DB"]);
        assert!(grid.tile_at(pos(0, 1)).unwrap().is_falling);
        assert!(!grid.tile_at(pos(0, 0)).unwrap().is_falling);
        assert_eq!(grid.count_empty(), 0);
    }

    #[test]
    fn test_new_tiles_get_fresh_ids() {
        let mut grid = Grid::from_rows(&["AB", "CD"]).unwrap();
        let next = grid.next_tile_id();
        grid.remove_positions([pos(0, 0)]);
        grid.fill_empty(&Theme::classic(), &mut SimpleRng::new(1));
        assert_eq!(grid.tile_at(pos(0, 0)).unwrap().id, next);
        assert_eq!(grid.next_tile_id(), next + 1);
    }

    #[test]
    fn test_clear_flags() {
        let mut grid = Grid::from_rows(&["A.", "BC"]).unwrap();
        grid.apply_gravity();
        grid.fill_empty(&Theme::classic(), &mut SimpleRng::new(1));
        assert!(grid.tiles().any(|t| t.is_falling));
        grid.clear_flags();
        assert!(grid.tiles().all(|t| !t.is_falling && !t.is_matched));
    }
}
