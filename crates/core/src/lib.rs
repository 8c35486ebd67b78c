//! Core match-3 logic - pure, deterministic, and testable
//!
//! This crate contains the grid model, run detection, scoring and the cascade
//! state machine. It has **zero dependencies** on UI, timing, or I/O:
//!
//! - **Deterministic**: randomness only enters through a [`TileSource`], so a
//!   seeded [`SimpleRng`] or a [`ScriptedSource`] replays identical games
//! - **Synchronous**: every operation completes before it returns; callers
//!   that animate drive the cascade one [`GameSession::resolve`] at a time
//! - **Portable**: runs headless, in tests, or behind any renderer
//!
//! # Module Structure
//!
//! - [`grid`]: NxN tile grid, swaps, removal, gravity and refill
//! - [`matching`]: run detection, swap legality, hints and stalemate checks
//! - [`scoring`]: match points with length bonus and combo multiplier
//! - [`pattern`]: geometric clears that ignore tile kind
//! - [`session`]: the swap → mark → remove → fall → refill cascade loop
//! - [`rng`]: tile sources
//! - [`snapshot`]: serializable read-only view for renderers
//!
//! # Example
//!
//! ```
//! use match_grid_core::{GameSession, SimpleRng};
//! use match_grid_types::Theme;
//!
//! let mut game = GameSession::new(8, Theme::classic(), SimpleRng::new(12345));
//!
//! // A fresh session always offers at least one legal move
//! let hint = game.hint().expect("playable grid");
//! let report = game.swap_and_resolve(hint.from, hint.to).unwrap();
//!
//! assert!(report.score() >= 150);
//! assert_eq!(game.combo(), 0); // settled
//! ```

pub mod grid;
pub mod matching;
pub mod pattern;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use match_grid_types as types;

// Re-export commonly used types for convenience
pub use grid::{Cell, Grid, GridParseError, Tile, TileId};
pub use matching::{
    find_all_matches, find_hint, find_horizontal_matches, find_vertical_matches, has_valid_moves,
    scan_and_mark, would_swap_create_match, Hint, Match,
};
pub use pattern::PowerPattern;
pub use rng::{ScriptedSource, SimpleRng, TileSource};
pub use scoring::{calculate_match_score, calculate_score, ScoreResult};
pub use session::{CascadeReport, CascadeStep, GameSession, PatternClear, Phase, Resolution, Settlement};
pub use snapshot::{GridSnapshot, TileSnapshot};
