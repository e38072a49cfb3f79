//! Time-limited stat modifiers attached to robots.
//!
//! Buffs store an absolute `expires_at` round. A buff is active while
//! `round < expires_at`; expiry needs no per-round countdown, so pruning
//! expired entries never changes observable behaviour.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::Round;

/// Kinds of buffs the rules can attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffKind {
    /// Applied by disrupter hits; the target takes extra damage from attacks.
    Disrupted,
}

/// A single buff with its modifier and expiration round.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buff {
    pub kind: BuffKind,
    /// Added to the damage-received multiplier while active.
    pub damage_received_modifier: f64,
    pub expires_at: Round,
}

impl Buff {
    pub fn disrupted(config: &GameConfig, round: Round) -> Self {
        Self {
            kind: BuffKind::Disrupted,
            damage_received_modifier: config.disrupted_damage_bonus,
            expires_at: round + config.disrupted_duration,
        }
    }

    #[inline]
    pub fn is_active(&self, round: Round) -> bool {
        round < self.expires_at
    }
}

/// Bounded buff set held by each robot.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buffs {
    entries: ArrayVec<Buff, { GameConfig::MAX_BUFFS }>,
}

impl Buffs {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a buff, refreshing an existing buff of the same kind.
    ///
    /// A refresh keeps the later expiry and the new modifier. When the set is
    /// full, the entry expiring first is replaced.
    pub(crate) fn add(&mut self, buff: Buff, round: Round) {
        self.remove_expired(round);

        if let Some(existing) = self.entries.iter_mut().find(|b| b.kind == buff.kind) {
            existing.expires_at = existing.expires_at.max(buff.expires_at);
            existing.damage_received_modifier = buff.damage_received_modifier;
            return;
        }

        if self.entries.is_full() {
            let earliest = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, b)| b.expires_at)
                .map(|(index, _)| index);
            if let Some(index) = earliest {
                self.entries[index] = buff;
            }
            return;
        }

        self.entries.push(buff);
    }

    pub(crate) fn remove_expired(&mut self, round: Round) {
        self.entries.retain(|b| b.is_active(round));
    }

    /// Sum of the damage-received modifiers active in `round`.
    pub fn damage_received_multiplier(&self, round: Round) -> f64 {
        self.active_at(round)
            .map(|b| b.damage_received_modifier)
            .sum()
    }

    pub fn has(&self, kind: BuffKind, round: Round) -> bool {
        self.active_at(round).any(|b| b.kind == kind)
    }

    pub fn active_at(&self, round: Round) -> impl Iterator<Item = &Buff> + '_ {
        self.entries.iter().filter(move |b| b.is_active(round))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buff(expires_at: Round) -> Buff {
        Buff {
            kind: BuffKind::Disrupted,
            damage_received_modifier: 0.5,
            expires_at,
        }
    }

    #[test]
    fn multiplier_ignores_expired_buffs() {
        let mut buffs = Buffs::empty();
        buffs.add(buff(10), 5);
        assert_eq!(buffs.damage_received_multiplier(9), 0.5);
        assert_eq!(buffs.damage_received_multiplier(10), 0.0);
        assert!(!buffs.has(BuffKind::Disrupted, 10));
    }

    #[test]
    fn refresh_keeps_later_expiry() {
        let mut buffs = Buffs::empty();
        buffs.add(buff(12), 1);
        buffs.add(buff(8), 2);
        assert_eq!(buffs.active_at(11).count(), 1);
        buffs.remove_expired(12);
        assert!(buffs.is_empty());
    }
}
