//! Scoring module - match points with cascade combo scaling
//!
//! Each match is scored independently:
//! - base: `tiles * MATCH_TILE_SCORE`
//! - length bonus: `(length - 3) * LENGTH_BONUS_SCORE` for runs longer than 3
//! - combo multiplier: `1 + combo * 0.5`, floored after multiplying
//!
//! `combo` is the number of cascade rounds already resolved before the scan
//! being scored (0 for the round directly caused by a swap).
//!
//! The multiplier is applied in halves (`(2 + combo) / 2`) so the floor is
//! exact in integer arithmetic.

use serde::Serialize;

use crate::matching::Match;
use crate::types::{LENGTH_BONUS_SCORE, MATCH_TILE_SCORE, MIN_RUN_LENGTH, PATTERN_TILE_SCORE};

/// Score calculation result for one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreResult {
    /// Tile points before the multiplier, summed over all matches.
    pub base: u32,
    /// Long-run bonus before the multiplier, summed over all matches.
    pub length_bonus: u32,
    /// Combo depth the multiplier was computed from.
    pub combo: u32,
    pub total: u32,
}

/// Tile points for one match
pub fn calculate_base_score(m: &Match) -> u32 {
    (m.len() as u32).saturating_mul(MATCH_TILE_SCORE)
}

/// Bonus for runs longer than `MIN_RUN_LENGTH`
pub fn calculate_length_bonus(m: &Match) -> u32 {
    (m.len().saturating_sub(MIN_RUN_LENGTH) as u32).saturating_mul(LENGTH_BONUS_SCORE)
}

/// Apply the combo multiplier `1 + combo * 0.5`, flooring the result
pub fn apply_combo_multiplier(points: u32, combo: u32) -> u32 {
    let scaled = points as u64 * (2 + combo as u64) / 2;
    scaled.min(u32::MAX as u64) as u32
}

/// Points for a single match at the given combo depth
pub fn score_match(m: &Match, combo: u32) -> u32 {
    let raw = calculate_base_score(m).saturating_add(calculate_length_bonus(m));
    apply_combo_multiplier(raw, combo)
}

/// Total points for all matches found in one scan
pub fn calculate_match_score(matches: &[Match], combo: u32) -> u32 {
    matches
        .iter()
        .fold(0u32, |acc, m| acc.saturating_add(score_match(m, combo)))
}

/// Full breakdown for one scan
pub fn calculate_score(matches: &[Match], combo: u32) -> ScoreResult {
    ScoreResult {
        base: matches
            .iter()
            .fold(0u32, |acc, m| acc.saturating_add(calculate_base_score(m))),
        length_bonus: matches
            .iter()
            .fold(0u32, |acc, m| acc.saturating_add(calculate_length_bonus(m))),
        combo,
        total: calculate_match_score(matches, combo),
    }
}

/// Points for tiles removed by a geometric pattern clear (no combo scaling)
pub fn calculate_pattern_score(removed: usize) -> u32 {
    (removed as u32).saturating_mul(PATTERN_TILE_SCORE)
}
