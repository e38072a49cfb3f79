//! Team-to-provider bindings.

use std::sync::Arc;

use arena_core::Team;

use super::{IdleProvider, ProgramProvider};

/// Holds the program provider of each team.
///
/// Teams without a binding, and neutral robots, fall back to the default
/// provider, which idles unless replaced.
pub struct ProviderRegistry {
    teams: [Option<Arc<dyn ProgramProvider>>; 2],
    default: Arc<dyn ProgramProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            teams: [None, None],
            default: Arc::new(IdleProvider),
        }
    }

    /// Binds `provider` to `team`. Binding the neutral team replaces the
    /// default provider.
    pub fn register(&mut self, team: Team, provider: impl ProgramProvider + 'static) {
        self.register_arc(team, Arc::new(provider));
    }

    pub fn register_arc(&mut self, team: Team, provider: Arc<dyn ProgramProvider>) {
        match team {
            Team::A => self.teams[0] = Some(provider),
            Team::B => self.teams[1] = Some(provider),
            Team::Neutral => self.default = provider,
        }
    }

    pub fn unregister(&mut self, team: Team) {
        match team {
            Team::A => self.teams[0] = None,
            Team::B => self.teams[1] = None,
            Team::Neutral => self.default = Arc::new(IdleProvider),
        }
    }

    /// Provider for a robot of `team`. Cloned out so callers can await it
    /// without holding the registry.
    pub fn get(&self, team: Team) -> Arc<dyn ProgramProvider> {
        let bound = match team {
            Team::A => self.teams[0].as_ref(),
            Team::B => self.teams[1].as_ref(),
            Team::Neutral => None,
        };
        Arc::clone(bound.unwrap_or(&self.default))
    }

    pub fn is_bound(&self, team: Team) -> bool {
        match team {
            Team::A => self.teams[0].is_some(),
            Team::B => self.teams[1].is_some(),
            Team::Neutral => false,
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
