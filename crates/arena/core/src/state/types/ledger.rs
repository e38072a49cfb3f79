use crate::config::GameConfig;
use crate::state::Team;

/// Per-team persistent memory, carried from a match header to its footer.
pub type TeamMemory = [i64; GameConfig::TEAM_MEMORY_SIZE];

/// Per-team resource balances and persistent memory.
///
/// The neutral team has no ledger; operations naming it are no-ops.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamLedger {
    balances: [f64; 2],
    memory: [TeamMemory; 2],
}

impl TeamLedger {
    pub fn new(starting: [f64; 2], memory: [TeamMemory; 2]) -> Self {
        Self {
            balances: starting,
            memory,
        }
    }

    pub fn balance(&self, team: Team) -> f64 {
        team.index().map_or(0.0, |i| self.balances[i])
    }

    pub fn balances(&self) -> [f64; 2] {
        self.balances
    }

    pub fn memory(&self, team: Team) -> Option<&TeamMemory> {
        team.index().map(|i| &self.memory[i])
    }

    pub fn memories(&self) -> [TeamMemory; 2] {
        self.memory
    }

    /// Applies a delta; balances never drop below zero.
    pub(crate) fn adjust(&mut self, team: Team, delta: f64) {
        if let Some(i) = team.index() {
            self.balances[i] = (self.balances[i] + delta).max(0.0);
        }
    }

    /// Masked write: only bits set in `mask` take the new value. A mask of
    /// `-1` replaces the whole slot.
    pub(crate) fn write_memory(&mut self, team: Team, index: usize, value: i64, mask: i64) {
        let Some(i) = team.index() else {
            return;
        };
        if let Some(slot) = self.memory[i].get_mut(index) {
            *slot = (*slot & !mask) | (value & mask);
        }
    }
}
