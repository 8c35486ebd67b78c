//! Match engine - run detection, swap legality and stalemate detection
//!
//! Scans are single run-length passes: one left-to-right pass per row and
//! one top-to-bottom pass per column, each O(N), O(N²) for the whole grid.
//! A run ends on a kind change, an empty cell, or the edge of the grid; runs
//! of `MIN_RUN_LENGTH` or more become a [`Match`].
//!
//! Nothing here mutates a grid it is handed except [`scan_and_mark`], which
//! exists to flag matched tiles for the removal step. Trial swaps always run
//! on a private copy.
//!
//! # Cost
//!
//! [`has_valid_moves`] and [`find_hint`] try up to 2·N² swaps and re-scan the
//! grid after each, so the worst case is O(N⁴). That is trivial at N = 8 and
//! stays cheap up to `MAX_GRID_SIZE`.

use serde::Serialize;

use crate::grid::{Grid, Tile};
use crate::types::{Direction, Orientation, Position, TileKind, MIN_RUN_LENGTH};

/// A straight run of at least three same-kind tiles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub kind: TileKind,
    pub orientation: Orientation,
    /// Tiles in scan order (left to right, or top to bottom)
    pub tiles: Vec<Tile>,
}

impl Match {
    /// Run length
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Positions covered by this run
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.iter().map(|tile| tile.position)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.positions().any(|p| p == pos)
    }
}

/// A legal swap found by the stalemate sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Hint {
    pub from: Position,
    pub to: Position,
}

/// Accumulates one run while scanning a line
struct RunScanner {
    orientation: Orientation,
    kind: Option<TileKind>,
    run: Vec<Tile>,
}

impl RunScanner {
    fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            kind: None,
            run: Vec::new(),
        }
    }

    fn push(&mut self, cell: Option<&Tile>, out: &mut Vec<Match>) {
        match cell {
            Some(tile) if Some(tile.kind) == self.kind => self.run.push(*tile),
            Some(tile) => {
                self.flush(out);
                self.kind = Some(tile.kind);
                self.run.push(*tile);
            }
            None => self.flush(out),
        }
    }

    /// End the current run (type change, empty cell, or past-the-end sentinel)
    fn flush(&mut self, out: &mut Vec<Match>) {
        if let Some(kind) = self.kind.take() {
            if self.run.len() >= MIN_RUN_LENGTH {
                out.push(Match {
                    kind,
                    orientation: self.orientation,
                    tiles: std::mem::take(&mut self.run),
                });
            }
        }
        self.run.clear();
    }
}

/// All horizontal runs, rows top to bottom, each row left to right
pub fn find_horizontal_matches(grid: &Grid) -> Vec<Match> {
    let n = grid.size() as i8;
    let mut out = Vec::new();
    let mut scanner = RunScanner::new(Orientation::Horizontal);
    for row in 0..n {
        for col in 0..n {
            scanner.push(grid.tile_at(Position::new(row, col)), &mut out);
        }
        scanner.flush(&mut out);
    }
    out
}

/// All vertical runs, columns left to right, each column top to bottom
pub fn find_vertical_matches(grid: &Grid) -> Vec<Match> {
    let n = grid.size() as i8;
    let mut out = Vec::new();
    let mut scanner = RunScanner::new(Orientation::Vertical);
    for col in 0..n {
        for row in 0..n {
            scanner.push(grid.tile_at(Position::new(row, col)), &mut out);
        }
        scanner.flush(&mut out);
    }
    out
}

/// Horizontal matches followed by vertical matches.
///
/// Intersecting runs are not merged: a tile at the crossing of a horizontal
/// and a vertical run appears in both.
pub fn find_all_matches(grid: &Grid) -> Vec<Match> {
    let mut matches = find_horizontal_matches(grid);
    matches.extend(find_vertical_matches(grid));
    matches
}

/// Find all matches and flag their tiles as matched, both in the grid and in
/// the returned match records.
pub fn scan_and_mark(grid: &mut Grid) -> Vec<Match> {
    let mut matches = find_all_matches(grid);
    grid.mark_matched(&matches);
    for tile in matches.iter_mut().flat_map(|m| m.tiles.iter_mut()) {
        tile.is_matched = true;
    }
    matches
}

/// Would exchanging `a` and `b` produce at least one match?
///
/// Runs on a copy; `grid` is never touched. Out-of-bounds positions are never
/// a legal swap.
pub fn would_swap_create_match(grid: &Grid, a: Position, b: Position) -> bool {
    if !grid.is_valid_position(a) || !grid.is_valid_position(b) {
        return false;
    }
    let trial = grid.swapped(a, b);
    !find_all_matches(&trial).is_empty()
}

/// First legal swap in sweep order.
///
/// Rows top to bottom, columns left to right; for each cell the swap with the
/// right neighbour is tried before the swap with the bottom neighbour.
pub fn find_hint(grid: &Grid) -> Option<Hint> {
    let n = grid.size() as i8;
    for row in 0..n {
        for col in 0..n {
            let from = Position::new(row, col);
            for dir in [Direction::Right, Direction::Down] {
                let to = from.step(dir);
                if grid.is_valid_position(to) && would_swap_create_match(grid, from, to) {
                    return Some(Hint { from, to });
                }
            }
        }
    }
    None
}

/// False means stalemate: no adjacent swap produces a match
pub fn has_valid_moves(grid: &Grid) -> bool {
    find_hint(grid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_single_row_run() {
        let grid = Grid::from_rows(&["AAAB", "BCDC", "CDBD", "DBCB"]).unwrap();
        let matches = find_horizontal_matches(&grid);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].len(), 3);
        assert_eq!(matches[0].kind, TileKind::new(0));
        assert_eq!(matches[0].orientation, Orientation::Horizontal);
        assert_eq!(
            matches[0].positions().collect::<Vec<_>>(),
            vec![pos(0, 0), pos(0, 1), pos(0, 2)]
        );
    }

    #[test]
    fn test_run_ending_at_edge() {
        let grid = Grid::from_rows(&["BAAA", "CDCD", "DCDC", "CDCD"]).unwrap();
        let matches = find_horizontal_matches(&grid);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].contains(pos(0, 3)));
        assert!(!matches[0].contains(pos(0, 0)));
    }

    #[test]
    fn test_empty_cell_breaks_run() {
        let grid = Grid::from_rows(&["AA.A", "BCBC", "CBCB", "BCBC"]).unwrap();
        assert!(find_horizontal_matches(&grid).is_empty());
    }

    #[test]
    fn test_vertical_run() {
        let grid = Grid::from_rows(&["ABC", "ACB", "ABC"]).unwrap();
        let matches = find_vertical_matches(&grid);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].orientation, Orientation::Vertical);
        assert_eq!(
            matches[0].positions().collect::<Vec<_>>(),
            vec![pos(0, 0), pos(1, 0), pos(2, 0)]
        );
    }

    #[test]
    fn test_long_run_is_one_match() {
        let grid = Grid::from_rows(&["AAAAA", "BCBCB", "CBCBC", "BCBCB", "CBCBC"]).unwrap();
        let matches = find_all_matches(&grid);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].len(), 5);
    }

    #[test]
    fn test_intersecting_runs_are_not_merged() {
        // T-shape: row 0 run of A and column 1 run of A share (0,1)
        let grid = Grid::from_rows(&["AAA", "BAC", "CAB"]).unwrap();
        let matches = find_all_matches(&grid);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].orientation, Orientation::Horizontal);
        assert_eq!(matches[1].orientation, Orientation::Vertical);
        assert!(matches[0].contains(pos(0, 1)));
        assert!(matches[1].contains(pos(0, 1)));
    }

    #[test]
    fn test_scan_and_mark_flags_tiles() {
        let mut grid = Grid::from_rows(&["AAA", "BCB", "CBC"]).unwrap();
        let matches = scan_and_mark(&mut grid);
        assert_eq!(matches.len(), 1);
        assert!(matches[0].tiles.iter().all(|t| t.is_matched));
        for col in 0..3 {
            assert!(grid.tile_at(pos(0, col)).unwrap().is_matched);
            assert!(!grid.tile_at(pos(1, col)).unwrap().is_matched);
        }
    }

    #[test]
    fn test_would_swap_create_match_leaves_grid_untouched() {
        let grid = Grid::from_rows(&["AABA", "BCBC", "CBCB", "BCBC"]).unwrap();
        let before = grid.clone();

        // Swapping (0,2) with (0,3) gives AAAB
        assert!(would_swap_create_match(&grid, pos(0, 2), pos(0, 3)));
        assert!(!would_swap_create_match(&grid, pos(3, 0), pos(3, 1)));
        assert!(!would_swap_create_match(&grid, pos(0, 3), pos(0, 4)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_find_hint_order() {
        let grid = Grid::from_rows(&["AABA", "BCBC", "CBCB", "BCBC"]).unwrap();
        // (0,0) and (0,1) have no legal swap, so the first hit is (0,2) -> right
        assert_eq!(
            find_hint(&grid),
            Some(Hint {
                from: pos(0, 2),
                to: pos(0, 3)
            })
        );
        assert!(has_valid_moves(&grid));
    }

    #[test]
    fn test_stalemate_board() {
        let grid = Grid::from_rows(&["ABC", "BCA", "CAB"]).unwrap();
        assert!(find_hint(&grid).is_none());
        assert!(!has_valid_moves(&grid));
    }
}
