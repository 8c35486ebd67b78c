//! RNG module - injectable tile randomness
//!
//! Grid creation and refill draw tile kinds through the [`TileSource`]
//! capability instead of a global PRNG, so tests can supply deterministic
//! sequences.
//!
//! Provides a simple LCG for seeded play and a scripted source for tests.

use std::collections::VecDeque;

use crate::types::TileKind;

/// Supplies the next tile kind from a candidate set
pub trait TileSource {
    /// Pick one kind out of `candidates`.
    ///
    /// Returns `None` only when `candidates` is empty.
    fn next_kind(&mut self, candidates: &[TileKind]) -> Option<TileKind>;
}

impl<S: TileSource + ?Sized> TileSource for &mut S {
    fn next_kind(&mut self, candidates: &[TileKind]) -> Option<TileKind> {
        (**self).next_kind(candidates)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales from the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current internal state (reseeding with it replays the remaining sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TileSource for SimpleRng {
    fn next_kind(&mut self, candidates: &[TileKind]) -> Option<TileKind> {
        if candidates.is_empty() {
            return None;
        }
        let idx = self.next_range(candidates.len() as u32) as usize;
        candidates.get(idx).copied()
    }
}

/// Replays a fixed list of kinds.
///
/// A scripted kind is used when it is among the candidates; otherwise the
/// first candidate is used and the script still advances. Once the script is
/// exhausted the first candidate is always returned.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: VecDeque<TileKind>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = TileKind>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Build from board letters, e.g. `"ABCA"`; other characters are skipped
    pub fn from_letters(letters: &str) -> Self {
        Self::new(letters.chars().filter_map(TileKind::from_char))
    }

    /// Number of scripted kinds not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TileSource for ScriptedSource {
    fn next_kind(&mut self, candidates: &[TileKind]) -> Option<TileKind> {
        let first = candidates.first().copied()?;
        match self.script.pop_front() {
            Some(kind) if candidates.contains(&kind) => Some(kind),
            _ => Some(first),
        }
    }
}
