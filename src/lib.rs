//! Match Grid (workspace facade crate).
//!
//! Re-exports the `match_grid::{core,engine,types}` API whose implementation
//! lives in dedicated crates under `crates/`, plus TOML configuration.

pub mod config;

pub use match_grid_core as core;
pub use match_grid_engine as engine;
pub use match_grid_types as types;
