use std::collections::BTreeMap;

use super::{EntityId, Level, Position};

/// The two independent occupancy layers of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileSlots {
    pub ground: Option<EntityId>,
    pub air: Option<EntityId>,
}

impl TileSlots {
    pub fn get(&self, level: Level) -> Option<EntityId> {
        match level {
            Level::Ground => self.ground,
            Level::Air => self.air,
        }
    }

    fn slot_mut(&mut self, level: Level) -> &mut Option<EntityId> {
        match level {
            Level::Ground => &mut self.ground,
            Level::Air => &mut self.air,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ground.is_none() && self.air.is_none()
    }
}

/// Occupancy index: location → ground and air occupant.
///
/// Tiles with no occupant are not stored.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    occupancy: BTreeMap<Position, TileSlots>,
}

impl TileMap {
    pub fn occupancy(&self) -> &BTreeMap<Position, TileSlots> {
        &self.occupancy
    }

    pub fn slots(&self, position: Position) -> TileSlots {
        self.occupancy.get(&position).copied().unwrap_or_default()
    }

    pub fn occupant(&self, position: Position, level: Level) -> Option<EntityId> {
        self.occupancy.get(&position).and_then(|s| s.get(level))
    }

    pub fn is_free(&self, position: Position, level: Level) -> bool {
        self.occupant(position, level).is_none()
    }

    /// Places `entity` in the slot. Fails when another entity holds it.
    pub(crate) fn place(&mut self, position: Position, level: Level, entity: EntityId) -> bool {
        let slots = self.occupancy.entry(position).or_default();
        let slot = slots.slot_mut(level);
        match *slot {
            Some(existing) => existing == entity,
            None => {
                *slot = Some(entity);
                true
            }
        }
    }

    /// Clears the slot if `entity` holds it.
    pub(crate) fn remove(&mut self, position: Position, level: Level, entity: EntityId) -> bool {
        let Some(slots) = self.occupancy.get_mut(&position) else {
            return false;
        };
        let slot = slots.slot_mut(level);
        if *slot != Some(entity) {
            return false;
        }
        *slot = None;
        if slots.is_empty() {
            self.occupancy.remove(&position);
        }
        true
    }
}

/// Runtime world data layered on top of the immutable terrain oracle.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    pub tile_map: TileMap,
}
