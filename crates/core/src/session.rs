//! Game session - the cascade state machine
//!
//! A session owns one grid, its theme and tile source, and runs the
//! swap → mark → remove → gravity → refill → re-scan loop:
//!
//! ```text
//!   Idle ──commit_swap──▶ Marking ──resolve──▶ Marking ──resolve──▶ ... ──resolve──▶ Idle
//!                           │                    (new matches)                (no matches)
//!   Idle ──clear_pattern──▶─┘
//! ```
//!
//! `Marking` means matched tiles carry `is_matched` and are waiting for the
//! removal step; a renderer may animate them before calling [`GameSession::resolve`].
//! Validation, gravity and re-scanning all happen inside single calls and
//! are never observable as phases.
//!
//! The combo counter is the number of rounds scored so far in the current
//! sequence. It is 0 when the swap's own matches are scored and returns to 0
//! whenever the grid settles.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::grid::Grid;
use crate::matching::{self, Hint, Match};
use crate::pattern::PowerPattern;
use crate::rng::{SimpleRng, TileSource};
use crate::scoring::{calculate_pattern_score, calculate_score, ScoreResult};
use crate::snapshot::{GridSnapshot, TileSnapshot};
use crate::types::{Position, Theme, DEFAULT_GRID_SIZE, MAX_REGENERATE_ATTEMPTS};

/// Observable session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Stable grid, swaps accepted
    Idle,
    /// Tiles are flagged for removal
    Marking,
}

/// One scored scan within a cascade sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeStep {
    /// 1 for the swap's own matches, 2 for the first cascade, ...
    pub round: u32,
    pub matches: Vec<Match>,
    pub score: ScoreResult,
}

/// How a cascade sequence ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Settlement {
    /// Scored rounds in the sequence
    pub rounds: u32,
    /// The settled grid was a stalemate and got replaced
    pub regenerated: bool,
}

/// Outcome of one [`GameSession::resolve`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The refill produced new matches; they are now marked
    Marked(CascadeStep),
    /// Nothing matched after the refill; the session is idle again
    Settled(Settlement),
}

/// Every round of a sequence, resolved to completion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeReport {
    pub steps: Vec<CascadeStep>,
    pub settlement: Settlement,
}

impl CascadeReport {
    pub fn score(&self) -> u32 {
        self.steps
            .iter()
            .fold(0u32, |acc, step| acc.saturating_add(step.score.total))
    }

    pub fn rounds(&self) -> usize {
        self.steps.len()
    }

    /// Total tiles covered by matches over all rounds
    pub fn tiles_cleared(&self) -> usize {
        self.steps
            .iter()
            .flat_map(|step| step.matches.iter())
            .map(Match::len)
            .sum()
    }
}

/// Result of starting a pattern clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternClear {
    pub pattern: PowerPattern,
    pub removed: usize,
    pub score: u32,
}

#[derive(Debug, Clone)]
enum Pending {
    Matches(Vec<Match>),
    Pattern(Vec<Position>),
}

/// A single match-3 game: grid, score and cascade bookkeeping
#[derive(Debug, Clone)]
pub struct GameSession<S = SimpleRng> {
    grid: Grid,
    theme: Theme,
    source: S,
    /// Cells marked and waiting for removal (None while idle)
    pending: Option<Pending>,
    combo: u32,
    /// Rounds scored in the current sequence
    round: u32,
    score: u32,
    moves: u32,
    /// Rounds scored over the whole session
    total_rounds: u32,
    best_combo: u32,
    regenerations: u32,
}

impl Default for GameSession<SimpleRng> {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, Theme::classic(), SimpleRng::default())
    }
}

impl<S: TileSource> GameSession<S> {
    /// Generate a run-free grid and make sure it has at least one legal move
    pub fn new(size: u8, theme: Theme, mut source: S) -> Self {
        let grid = Grid::generate(size, &theme, &mut source);
        let mut session = Self::with_grid(grid, theme, source);
        session.ensure_playable();
        session
    }

    /// Wrap an existing grid as-is (no run or stalemate check)
    pub fn with_grid(grid: Grid, theme: Theme, source: S) -> Self {
        Self {
            grid,
            theme,
            source,
            pending: None,
            combo: 0,
            round: 0,
            score: 0,
            moves: 0,
            total_rounds: 0,
            best_combo: 0,
            regenerations: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Marking
        } else {
            Phase::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Accepted swaps
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn cascade_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Longest sequence of scored rounds seen so far
    pub fn best_combo(&self) -> u32 {
        self.best_combo
    }

    /// Stalemate grids replaced so far
    pub fn regenerations(&self) -> u32 {
        self.regenerations
    }

    pub fn would_swap_create_match(&self, a: Position, b: Position) -> bool {
        matching::would_swap_create_match(&self.grid, a, b)
    }

    pub fn hint(&self) -> Option<Hint> {
        matching::find_hint(&self.grid)
    }

    pub fn has_valid_moves(&self) -> bool {
        matching::has_valid_moves(&self.grid)
    }

    /// Perform a legal swap and mark the matches it creates.
    ///
    /// Returns `None` (grid untouched, no move counted) when the session is
    /// mid-cascade, the cells are not adjacent, or the swap creates no match.
    pub fn commit_swap(&mut self, a: Position, b: Position) -> Option<CascadeStep> {
        if self.pending.is_some() {
            trace!(?a, ?b, "swap ignored while marking");
            return None;
        }
        if !Grid::are_adjacent(a, b) || !self.would_swap_create_match(a, b) {
            trace!(?a, ?b, "swap rejected");
            return None;
        }

        self.grid.clear_flags();
        self.grid.swap(a, b);
        self.moves += 1;
        self.combo = 0;
        self.round = 0;
        self.scan()
    }

    /// Swap and run the whole cascade to completion
    pub fn swap_and_resolve(&mut self, a: Position, b: Position) -> Option<CascadeReport> {
        let first = self.commit_swap(a, b)?;
        let mut report = self.resolve_all();
        report.steps.insert(0, first);
        Some(report)
    }

    /// Advance the cascade by one round: remove the marked tiles, apply
    /// gravity, refill, and re-scan.
    ///
    /// Returns `None` when nothing is marked.
    pub fn resolve(&mut self) -> Option<Resolution> {
        let pending = self.pending.take()?;

        self.grid.clear_flags();
        let removed = match pending {
            Pending::Matches(matches) => self.grid.remove_matched(&matches),
            Pending::Pattern(positions) => self.grid.remove_positions(positions),
        };
        let fell = self.grid.apply_gravity();
        let filled = self.grid.fill_empty(&self.theme, &mut self.source);
        trace!(removed, fell, filled, "grid refilled");

        Some(match self.scan() {
            Some(step) => Resolution::Marked(step),
            None => Resolution::Settled(self.finish_cascade()),
        })
    }

    /// Resolve until the grid settles. Steps already returned by
    /// [`commit_swap`](Self::commit_swap) are not repeated.
    pub fn resolve_all(&mut self) -> CascadeReport {
        let mut report = CascadeReport::default();
        while let Some(resolution) = self.resolve() {
            match resolution {
                Resolution::Marked(step) => report.steps.push(step),
                Resolution::Settled(settlement) => {
                    report.settlement = settlement;
                    break;
                }
            }
        }
        report
    }

    /// Mark every tile a pattern covers for removal, regardless of kind.
    ///
    /// Points are awarded immediately and never scaled by combo; any cascade
    /// the removal triggers starts at combo 0. Returns `None` mid-cascade.
    pub fn clear_pattern(&mut self, pattern: PowerPattern) -> Option<PatternClear> {
        if self.pending.is_some() {
            return None;
        }

        let positions = pattern.positions(self.grid.size());
        self.grid.clear_flags();
        let removed = self.grid.mark_positions(positions.iter().copied());
        let score = calculate_pattern_score(removed);

        self.score = self.score.saturating_add(score);
        self.combo = 0;
        self.round = 0;
        self.pending = Some(Pending::Pattern(positions));
        info!(pattern = pattern.as_str(), removed, score, "pattern clear");

        Some(PatternClear {
            pattern,
            removed,
            score,
        })
    }

    /// Replace the grid with a fresh run-free layout that has a legal move.
    ///
    /// Returns false mid-cascade.
    pub fn regenerate(&mut self) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.grid.regenerate(&self.theme, &mut self.source);
        self.regenerations += 1;
        self.ensure_playable();
        true
    }

    pub fn snapshot_into(&self, out: &mut GridSnapshot) {
        out.size = self.grid.size();
        out.cells.clear();
        out.cells.extend(
            self.grid
                .cells()
                .iter()
                .map(|cell| cell.as_ref().map(TileSnapshot::from)),
        );
        out.phase = self.phase();
        out.score = self.score;
        out.combo = self.combo;
        out.moves = self.moves;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let mut s = GridSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Find and mark matches, scoring them at the current combo depth
    fn scan(&mut self) -> Option<CascadeStep> {
        let matches = matching::scan_and_mark(&mut self.grid);
        if matches.is_empty() {
            return None;
        }

        let score = calculate_score(&matches, self.combo);
        self.score = self.score.saturating_add(score.total);
        self.round += 1;
        self.total_rounds += 1;
        self.combo += 1;
        debug!(
            round = self.round,
            matches = matches.len(),
            combo = score.combo,
            points = score.total,
            "cascade round"
        );

        let step = CascadeStep {
            round: self.round,
            matches: matches.clone(),
            score,
        };
        self.pending = Some(Pending::Matches(matches));
        Some(step)
    }

    fn finish_cascade(&mut self) -> Settlement {
        let rounds = self.round;
        self.best_combo = self.best_combo.max(rounds);
        self.combo = 0;
        self.round = 0;
        let regenerated = self.ensure_playable();
        debug!(rounds, regenerated, "cascade settled");
        Settlement {
            rounds,
            regenerated,
        }
    }

    /// Regenerate until the grid has a legal move, giving up after
    /// `MAX_REGENERATE_ATTEMPTS`. Returns true if the grid was replaced.
    fn ensure_playable(&mut self) -> bool {
        let mut attempts = 0u32;
        while !matching::has_valid_moves(&self.grid) {
            if attempts >= MAX_REGENERATE_ATTEMPTS {
                warn!(attempts, "no playable grid found, keeping stalemate");
                break;
            }
            self.grid.regenerate(&self.theme, &mut self.source);
            attempts += 1;
        }
        if attempts > 0 {
            self.regenerations += attempts;
            info!(attempts, "stalemate grid regenerated");
        }
        attempts > 0
    }
}
