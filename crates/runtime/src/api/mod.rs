//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or persistence.

pub mod errors;
pub mod handle;
pub mod programs;
pub mod providers;
pub mod registry;

pub use errors::{Result, RuntimeError};
pub use handle::MatchHandle;
pub use programs::Skirmisher;
pub use providers::{IdleProvider, ProgramProvider, ScriptedProvider};
pub use registry::ProviderRegistry;
