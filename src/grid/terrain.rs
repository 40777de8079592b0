//! Terrain descriptors
//!
//! One descriptor is shared by every tile of the same kind; a Copy enum with
//! table methods keeps them immutable by construction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Terrain {
    #[default]
    Grass,
    Forest,
    Water,
    Mountain,
    Road,
    Lava,
    Crystal,
}

impl Terrain {
    pub fn name(&self) -> &'static str {
        match self {
            Terrain::Grass => "Grass",
            Terrain::Forest => "Forest",
            Terrain::Water => "Water",
            Terrain::Mountain => "Mountain",
            Terrain::Road => "Road",
            Terrain::Lava => "Lava",
            Terrain::Crystal => "Crystal",
        }
    }

    /// Can units stand on and move through this terrain?
    pub fn passable(&self) -> bool {
        !matches!(self, Terrain::Water | Terrain::Mountain | Terrain::Lava)
    }

    /// Added to a defender's DEF while standing here
    pub fn def_bonus(&self) -> i32 {
        match self {
            Terrain::Forest => 2,
            _ => 0,
        }
    }

    /// Added to a defender's RES while standing here
    pub fn res_bonus(&self) -> i32 {
        match self {
            Terrain::Crystal => 2,
            _ => 0,
        }
    }
}
