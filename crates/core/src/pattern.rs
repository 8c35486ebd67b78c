//! Geometric clear patterns (power-ups)
//!
//! A pattern is a fixed set of cells removed regardless of kind. It is
//! independent of run detection; the session removes the cells through the
//! grid's position-removal primitive and lets the cascade loop take over.

use serde::Serialize;

use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerPattern {
    /// The four corner cells
    Corners,
    /// Every cell on the outer ring
    Border,
}

impl PowerPattern {
    /// Cells covered by this pattern on a `size` x `size` grid, row-major,
    /// without duplicates
    pub fn positions(self, size: u8) -> Vec<Position> {
        if size == 0 {
            return Vec::new();
        }
        let last = size as i8 - 1;
        let mut out: Vec<Position> = match self {
            PowerPattern::Corners => vec![
                Position::new(0, 0),
                Position::new(0, last),
                Position::new(last, 0),
                Position::new(last, last),
            ],
            PowerPattern::Border => (0..=last)
                .flat_map(|row| (0..=last).map(move |col| Position::new(row, col)))
                .filter(|p| p.row == 0 || p.row == last || p.col == 0 || p.col == last)
                .collect(),
        };
        out.sort();
        out.dedup();
        out
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "corners" => Some(PowerPattern::Corners),
            "border" => Some(PowerPattern::Border),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerPattern::Corners => "corners",
            PowerPattern::Border => "border",
        }
    }
}
