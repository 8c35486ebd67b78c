//! Grid tests - creation, gravity and refill through the public API

use std::collections::HashSet;

use match_grid::core::{find_all_matches, Grid, ScriptedSource, SimpleRng, TileId};
use match_grid::types::{Position, Theme, TileKind, MAX_GRID_SIZE};

fn pos(row: i8, col: i8) -> Position {
    Position::new(row, col)
}

#[test]
fn test_generated_grid_is_full_and_run_free() {
    for seed in [1, 7, 42, 12345, 99999] {
        let grid = Grid::generate(8, &Theme::classic(), &mut SimpleRng::new(seed));
        assert_eq!(grid.count_empty(), 0, "seed {}", seed);
        assert!(find_all_matches(&grid).is_empty(), "seed {}:\n{}", seed, grid);
    }
}

#[test]
fn test_three_kind_theme_is_still_run_free() {
    // Fewest kinds allowed: exclusions can remove two of three candidates
    let theme = Theme::with_kind_count("tri", 3).unwrap();
    for seed in 0..20 {
        let grid = Grid::generate(10, &theme, &mut SimpleRng::new(seed));
        assert!(find_all_matches(&grid).is_empty(), "seed {}:\n{}", seed, grid);
        assert!(grid.tiles().all(|t| theme.contains(t.kind)));
    }
}

#[test]
fn test_generated_kinds_come_from_theme() {
    let theme = Theme::new(
        "sparse",
        vec![TileKind::new(2), TileKind::new(6), TileKind::new(9)],
    )
    .unwrap();
    let grid = Grid::generate(6, &theme, &mut SimpleRng::new(3));
    assert!(grid.tiles().all(|t| theme.contains(t.kind)));
}

#[test]
fn test_generated_ids_unique() {
    let grid = Grid::generate(MAX_GRID_SIZE, &Theme::classic(), &mut SimpleRng::new(8));
    let ids: HashSet<TileId> = grid.tiles().map(|t| t.id).collect();
    assert_eq!(ids.len(), MAX_GRID_SIZE as usize * MAX_GRID_SIZE as usize);
}

#[test]
fn test_regenerate_keeps_counting_ids() {
    let theme = Theme::classic();
    let mut rng = SimpleRng::new(11);
    let mut grid = Grid::generate(4, &theme, &mut rng);
    let old: HashSet<TileId> = grid.tiles().map(|t| t.id).collect();

    grid.regenerate(&theme, &mut rng);
    let new: HashSet<TileId> = grid.tiles().map(|t| t.id).collect();

    assert_eq!(new.len(), 16);
    assert!(old.is_disjoint(&new));
    assert!(find_all_matches(&grid).is_empty());
}

#[test]
fn test_gravity_preserves_column_order() {
    let mut grid = Grid::from_rows(&[
        "A.C.", //
        ".B..", //
        "D..E", //
        "..F.", //
    ])
    .unwrap();
    let ids_before: Vec<TileId> = [pos(0, 0), pos(2, 0)]
        .iter()
        .map(|&p| grid.tile_at(p).unwrap().id)
        .collect();

    grid.apply_gravity();

    assert_eq!(grid.to_rows(), ["....", "....", "A.C.", "DBFE"]);
    let ids_after: Vec<TileId> = [pos(2, 0), pos(3, 0)]
        .iter()
        .map(|&p| grid.tile_at(p).unwrap().id)
        .collect();
    assert_eq!(ids_before, ids_after);
}

#[test]
fn test_gravity_on_settled_grid_moves_nothing() {
    let mut grid = Grid::from_rows(&["...", "A..", "BC."]).unwrap();
    let before = grid.clone();
    assert_eq!(grid.apply_gravity(), 0);
    assert_eq!(grid, before);
}

#[test]
fn test_full_removal_then_refill() {
    let mut grid = Grid::from_rows(&["AB", "CD"]).unwrap();
    let all: Vec<Position> = grid.tiles().map(|t| t.position).collect();
    assert_eq!(grid.remove_positions(all), 4);
    assert_eq!(grid.apply_gravity(), 0);

    let filled = grid.fill_empty(&Theme::classic(), &mut ScriptedSource::from_letters("EEDD"));
    assert_eq!(filled, 4);
    assert_eq!(grid.to_rows(), ["EE", "DD"]);
    assert!(grid.tiles().all(|t| t.is_falling));
}

#[test]
fn test_refill_may_create_runs() {
    // Refill does no run avoidance; the cascade loop picks these up
    let mut grid = Grid::from_rows(&["...", "ABC", "BCA"]).unwrap();
    grid.fill_empty(&Theme::classic(), &mut ScriptedSource::from_letters("DDD"));
    assert_eq!(find_all_matches(&grid).len(), 1);
}

#[test]
fn test_display_matches_rows() {
    let grid = Grid::from_rows(&["A B", "C D"]).unwrap();
    assert_eq!(grid.to_string(), "AB\nCD");
}
