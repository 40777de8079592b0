//! Battle grid - tile storage, occupancy tracking, and spawn zones

pub mod pathing;
pub mod stage;
pub mod terrain;

pub use pathing::{find_path, reachable_tiles, tiles_in_range};
pub use stage::{generate_stage, MapConfig, PaletteEntry, MAP_CONFIGS};
pub use terrain::Terrain;

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, UnitId};

pub const DEFAULT_GRID_SIZE: i32 = 10;

/// A single tile on the battle grid
///
/// Occupancy is tracked as a unit id, never an owning reference; the combat
/// engine keeps it in agreement with the occupant's position on every move
/// and death.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub pos: Position,
    pub terrain: Terrain,
    pub occupant: Option<UnitId>,
}

/// Fixed-size square grid of tiles plus per-faction spawn lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    size: i32,
    tiles: Vec<Tile>,
    pub player_spawns: Vec<Position>,
    pub enemy_spawns: Vec<Position>,
}

impl Grid {
    /// Create a grid filled with grass and no occupants
    pub fn new(size: i32) -> Self {
        let mut tiles = Vec::with_capacity((size * size) as usize);
        for row in 0..size {
            for col in 0..size {
                tiles.push(Tile {
                    pos: Position::new(row, col),
                    terrain: Terrain::Grass,
                    occupant: None,
                });
            }
        }
        Self {
            size,
            tiles,
            player_spawns: Vec::new(),
            enemy_spawns: Vec::new(),
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.size && pos.col >= 0 && pos.col < self.size
    }

    fn index(&self, pos: Position) -> usize {
        (pos.row * self.size + pos.col) as usize
    }

    /// Bounds-checked tile lookup; None outside the grid
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        if self.in_bounds(pos) {
            Some(&self.tiles[self.index(pos)])
        } else {
            None
        }
    }

    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    pub fn terrain_at(&self, pos: Position) -> Option<Terrain> {
        self.tile(pos).map(|t| t.terrain)
    }

    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.terrain = terrain;
        }
    }

    pub fn occupant(&self, pos: Position) -> Option<UnitId> {
        self.tile(pos).and_then(|t| t.occupant)
    }

    pub fn set_occupant(&mut self, pos: Position, occupant: Option<UnitId>) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.occupant = occupant;
        }
    }

    /// Terrain passability only; occupancy is the caller's concern
    pub fn is_passable(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|t| t.terrain.passable())
    }

    /// Cardinal neighbours, bounds-filtered
    pub fn neighbours(&self, pos: Position) -> Vec<Position> {
        pos.cardinal_neighbours()
            .into_iter()
            .filter(|p| self.in_bounds(*p))
            .collect()
    }
}
