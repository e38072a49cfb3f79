use crate::state::{Level, Position};

/// Static terrain oracle. Terrain never changes during a match.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    /// Terrain at `position`, or `None` when off the map.
    fn tile(&self, position: Position) -> Option<TerrainTile>;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// True when an entity on `level` may stand on `position`.
    fn is_traversable(&self, position: Position, level: Level) -> bool {
        self.tile(position)
            .is_some_and(|tile| tile.is_traversable(level))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Terrain classes. Void blocks ground units but not airborne ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainTile {
    #[default]
    Land,
    Void,
}

impl TerrainTile {
    pub fn is_traversable(self, level: Level) -> bool {
        match (self, level) {
            (TerrainTile::Land, _) => true,
            (TerrainTile::Void, Level::Air) => true,
            (TerrainTile::Void, Level::Ground) => false,
        }
    }

    /// Map file glyph: `.` land, `#` void.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(TerrainTile::Land),
            '#' => Some(TerrainTile::Void),
            _ => None,
        }
    }
}

/// Row-major terrain grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    name: String,
    dimensions: MapDimensions,
    tiles: Vec<TerrainTile>,
}

impl GridMap {
    /// Returns `None` when `tiles` does not cover the grid exactly.
    pub fn new(name: impl Into<String>, dimensions: MapDimensions, tiles: Vec<TerrainTile>) -> Option<Self> {
        let expected = dimensions.width as usize * dimensions.height as usize;
        if tiles.len() != expected {
            return None;
        }
        Some(Self {
            name: name.into(),
            dimensions,
            tiles,
        })
    }

    /// An all-land map.
    pub fn open(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            dimensions: MapDimensions::new(width, height),
            tiles: vec![TerrainTile::Land; width as usize * height as usize],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tiles(&self) -> &[TerrainTile] {
        &self.tiles
    }
}

impl MapOracle for GridMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<TerrainTile> {
        if !self.dimensions.contains(position) {
            return None;
        }
        let index = position.y as usize * self.dimensions.width as usize + position.x as usize;
        self.tiles.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_blocks_only_ground() {
        let mut tiles = vec![TerrainTile::Land; 4];
        tiles[3] = TerrainTile::Void;
        let map = GridMap::new("t", MapDimensions::new(2, 2), tiles).expect("grid");
        let void = Position::new(1, 1);
        assert!(!map.is_traversable(void, Level::Ground));
        assert!(map.is_traversable(void, Level::Air));
        assert!(!map.is_traversable(Position::new(2, 0), Level::Air));
        assert!(GridMap::new("bad", MapDimensions::new(3, 3), vec![]).is_none());
    }
}
