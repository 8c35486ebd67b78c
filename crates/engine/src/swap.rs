use thiserror::Error;
use tracing::trace;

use match_grid_core::{CascadeReport, CascadeStep, GameSession, Hint, PatternClear, PowerPattern, TileSource};
use match_grid_types::{Direction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("a cascade is still being resolved")]
    NotPlayable,
    #[error("position is outside the grid")]
    OutOfBounds,
    #[error("tiles are not adjacent")]
    NotAdjacent,
    #[error("swap does not create a match")]
    NoMatch,
    #[error("grid has no legal move")]
    NoMoves,
}

impl MoveError {
    pub fn code(self) -> &'static str {
        match self {
            MoveError::NotPlayable => "not_playable",
            MoveError::NoMoves => "no_moves",
            MoveError::OutOfBounds | MoveError::NotAdjacent | MoveError::NoMatch => "invalid_move",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            MoveError::NotPlayable => "moves are rejected until the cascade settles",
            MoveError::OutOfBounds => "both positions must lie inside the grid",
            MoveError::NotAdjacent => "only orthogonal neighbours can be swapped",
            MoveError::NoMatch => "the swap would not complete a run of three",
            MoveError::NoMoves => "no adjacent swap produces a match",
        }
    }
}

fn validate<S: TileSource>(
    session: &GameSession<S>,
    a: Position,
    b: Position,
) -> Result<(), MoveError> {
    if !session.is_idle() {
        return Err(MoveError::NotPlayable);
    }
    let grid = session.grid();
    if !grid.is_valid_position(a) || !grid.is_valid_position(b) {
        return Err(MoveError::OutOfBounds);
    }
    if !a.is_adjacent(b) {
        return Err(MoveError::NotAdjacent);
    }
    if !session.would_swap_create_match(a, b) {
        return Err(MoveError::NoMatch);
    }
    Ok(())
}

fn checked<S: TileSource>(
    session: &GameSession<S>,
    a: Position,
    b: Position,
) -> Result<(), MoveError> {
    validate(session, a, b).map_err(|err| {
        trace!(?a, ?b, code = err.code(), "move rejected");
        err
    })
}

/// Validate and commit a swap, leaving its matches marked for the caller to
/// resolve round by round.
pub fn begin_swap<S: TileSource>(
    session: &mut GameSession<S>,
    a: Position,
    b: Position,
) -> Result<CascadeStep, MoveError> {
    checked(session, a, b)?;
    // validate() mirrors every commit_swap precondition
    session.commit_swap(a, b).ok_or(MoveError::NoMatch)
}

/// Validate a swap and resolve the cascade it starts to completion
pub fn apply_swap<S: TileSource>(
    session: &mut GameSession<S>,
    a: Position,
    b: Position,
) -> Result<CascadeReport, MoveError> {
    checked(session, a, b)?;
    session.swap_and_resolve(a, b).ok_or(MoveError::NoMatch)
}

/// Swipe the tile at `from` one cell towards `direction`
pub fn apply_swipe<S: TileSource>(
    session: &mut GameSession<S>,
    from: Position,
    direction: Direction,
) -> Result<CascadeReport, MoveError> {
    apply_swap(session, from, from.step(direction))
}

/// Play the first legal swap in sweep order
pub fn apply_hint<S: TileSource>(
    session: &mut GameSession<S>,
) -> Result<(Hint, CascadeReport), MoveError> {
    if !session.is_idle() {
        return Err(MoveError::NotPlayable);
    }
    let hint = session.hint().ok_or(MoveError::NoMoves)?;
    let report = apply_swap(session, hint.from, hint.to)?;
    Ok((hint, report))
}

/// Clear a geometric pattern and resolve whatever cascade follows
pub fn apply_pattern<S: TileSource>(
    session: &mut GameSession<S>,
    pattern: PowerPattern,
) -> Result<(PatternClear, CascadeReport), MoveError> {
    let clear = session
        .clear_pattern(pattern)
        .ok_or(MoveError::NotPlayable)?;
    Ok((clear, session.resolve_all()))
}
