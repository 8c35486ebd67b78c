//! Move application for match-grid sessions
//!
//! Wraps the core session's `Option`-returning primitives with validation
//! that reports *why* a move was refused. Each [`MoveError`] carries a stable
//! `code()` for machine consumers and a human `message()`.
//!
//! All functions are synchronous: a successful call returns with the cascade
//! fully resolved (except [`begin_swap`], which stops after marking).

pub mod swap;

pub use swap::{apply_hint, apply_pattern, apply_swap, apply_swipe, begin_swap, MoveError};
