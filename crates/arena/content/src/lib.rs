//! Data-driven match content and its loaders.
//!
//! Maps, placements and rule overrides live in RON/TOML files under a data
//! directory. This crate turns them into [`arena_core::MatchSetup`] and
//! [`arena_core::GameConfig`] values; nothing here is part of match state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LoadResult, MapLoader};
