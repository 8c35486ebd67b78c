//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data with no engine logic, making them usable in any
//! context (grid logic, rendering snapshots, configuration).
//!
//! # Grid Dimensions
//!
//! The grid is square and its side is a runtime parameter:
//!
//! - **Default**: 8x8 cells
//! - **Range**: `MIN_GRID_SIZE..=MAX_GRID_SIZE` (3 to 32)
//! - **Coordinates**: `(row, col)`, row 0 is the top, col 0 is the left
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MATCH_TILE_SCORE` | 50 | Points per tile in a match |
//! | `LENGTH_BONUS_SCORE` | 100 | Points per tile beyond the third in a run |
//! | `PATTERN_TILE_SCORE` | 50 | Points per tile removed by a pattern clear |
//!
//! The combo multiplier is `1 + combo * 0.5`, where `combo` is the number of
//! cascade rounds already resolved in the current sequence.
//!
//! # Examples
//!
//! ```
//! use match_grid_types::{Direction, Position, Theme, TileKind};
//!
//! // Kinds print as letters
//! let kind = TileKind::new(2);
//! assert_eq!(kind.as_char(), 'C');
//! assert_eq!(TileKind::from_char('c'), Some(kind));
//!
//! // Adjacency is orthogonal only
//! let a = Position::new(3, 3);
//! assert!(a.is_adjacent(a.step(Direction::Right)));
//! assert!(!a.is_adjacent(Position::new(4, 4)));
//!
//! // Themes need at least three kinds
//! assert!(Theme::with_kind_count("tiny", 2).is_err());
//! assert_eq!(Theme::classic().len(), 5);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default grid side (8 rows x 8 columns)
pub const DEFAULT_GRID_SIZE: u8 = 8;

/// Smallest grid side that can contain a run
pub const MIN_GRID_SIZE: u8 = 3;

/// Largest supported grid side
pub const MAX_GRID_SIZE: u8 = 32;

/// Minimum run length that counts as a match
pub const MIN_RUN_LENGTH: usize = 3;

/// Minimum number of kinds a theme must supply.
///
/// Grid creation excludes at most two kinds per cell, so three guarantees a
/// candidate is always left.
pub const MIN_THEME_KINDS: usize = 3;

/// Maximum number of kinds a theme may supply
pub const MAX_THEME_KINDS: usize = 16;

/// Number of simultaneously active kinds in the default theme
pub const DEFAULT_THEME_KINDS: usize = 5;

/// Points per tile in a match
pub const MATCH_TILE_SCORE: u32 = 50;

/// Points per tile beyond `MIN_RUN_LENGTH` in a single run
pub const LENGTH_BONUS_SCORE: u32 = 100;

/// Points per tile removed by a geometric pattern clear
pub const PATTERN_TILE_SCORE: u32 = 50;

/// Upper bound on stalemate regenerations before the board is kept as-is
pub const MAX_REGENERATE_ATTEMPTS: u32 = 100;

/// A tile category.
///
/// The universe of kinds is supplied by a [`Theme`]; the engine only compares
/// kinds for equality. Kinds render as letters starting at `A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileKind(u8);

impl TileKind {
    pub const fn new(code: u8) -> Self {
        Self(code)
    }

    /// Numeric code of this kind
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Letter used in board text (`A` for code 0, `B` for code 1, ...)
    pub fn as_char(self) -> char {
        if (self.0 as usize) < MAX_THEME_KINDS {
            char::from(b'A' + self.0)
        } else {
            '?'
        }
    }

    /// Parse a kind from its letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        let code = upper as u8 - b'A';
        if (code as usize) < MAX_THEME_KINDS {
            Some(Self(code))
        } else {
            None
        }
    }
}

/// Grid coordinates. Signed so that neighbours of edge cells can be expressed
/// and rejected by bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// The neighbouring position one cell away in `dir` (may be out of bounds)
    pub fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.offset();
        Self {
            row: self.row.saturating_add(dr),
            col: self.col.saturating_add(dc),
        }
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: Self) -> u32 {
        let dr = (self.row as i32 - other.row as i32).unsigned_abs();
        let dc = (self.col as i32 - other.col as i32).unsigned_abs();
        dr + dc
    }

    /// True iff the positions share an edge (diagonals are not adjacent)
    pub fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

/// Swipe directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(row, col)` offset of one step in this direction
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Orientation of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// Errors from building a [`Theme`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("theme `{name}` has {count} tile kinds, at least {min} are required", min = MIN_THEME_KINDS)]
    TooFewKinds { name: String, count: usize },

    #[error("theme `{name}` has {count} tile kinds, at most {max} are supported", max = MAX_THEME_KINDS)]
    TooManyKinds { name: String, count: usize },

    #[error("theme `{name}` uses tile kind code {code}, codes must be below {max}", max = MAX_THEME_KINDS)]
    UnknownKind { name: String, code: u8 },

    #[error("theme `{name}` lists tile kind `{kind}` more than once")]
    DuplicateKind { name: String, kind: char },
}

/// A named palette of simultaneously active tile kinds.
///
/// Construction enforces `MIN_THEME_KINDS..=MAX_THEME_KINDS` distinct kinds,
/// which is the precondition grid creation relies on. Every kind must have a
/// code below `MAX_THEME_KINDS` so it has a letter in board text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    name: String,
    kinds: Vec<TileKind>,
}

impl Theme {
    /// Build a theme from an explicit list of kinds
    pub fn new(name: impl Into<String>, kinds: Vec<TileKind>) -> Result<Self, ThemeError> {
        let name = name.into();
        if kinds.len() < MIN_THEME_KINDS {
            return Err(ThemeError::TooFewKinds {
                name,
                count: kinds.len(),
            });
        }
        if kinds.len() > MAX_THEME_KINDS {
            return Err(ThemeError::TooManyKinds {
                name,
                count: kinds.len(),
            });
        }
        for (i, kind) in kinds.iter().enumerate() {
            if kind.code() as usize >= MAX_THEME_KINDS {
                return Err(ThemeError::UnknownKind {
                    name,
                    code: kind.code(),
                });
            }
            if kinds[..i].contains(kind) {
                return Err(ThemeError::DuplicateKind {
                    name,
                    kind: kind.as_char(),
                });
            }
        }
        Ok(Self { name, kinds })
    }

    /// Build a theme using kinds `A`, `B`, ... up to `count`
    pub fn with_kind_count(name: impl Into<String>, count: usize) -> Result<Self, ThemeError> {
        let kinds = (0..count.min(u8::MAX as usize))
            .map(|code| TileKind::new(code as u8))
            .collect();
        Self::new(name, kinds)
    }

    /// The default five-kind theme
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            kinds: (0..DEFAULT_THEME_KINDS as u8).map(TileKind::new).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kinds(&self) -> &[TileKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
