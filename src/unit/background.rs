//! Optional character backgrounds
//!
//! A background is a small flavour-driven stat nudge applied when stats are
//! computed, on top of class and race.

use serde::{Deserialize, Serialize};

use crate::unit::StatBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Background {
    Soldier,
    Acolyte,
    Hunter,
    Noble,
}

impl Background {
    pub fn name(&self) -> &'static str {
        match self {
            Background::Soldier => "Soldier",
            Background::Acolyte => "Acolyte",
            Background::Hunter => "Hunter",
            Background::Noble => "Noble",
        }
    }

    pub fn stat_bonus(&self) -> StatBlock {
        match self {
            Background::Soldier => StatBlock { atk: 1, def: 1, ..StatBlock::ZERO },
            Background::Acolyte => StatBlock { mag: 2, res: 1, ..StatBlock::ZERO },
            Background::Hunter => StatBlock { spd: 2, atk: 1, ..StatBlock::ZERO },
            Background::Noble => StatBlock { hp: 5, res: 1, ..StatBlock::ZERO },
        }
    }
}
