//! Race stat bonuses and experience multipliers

use serde::{Deserialize, Serialize};

use crate::unit::StatBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Beastkin,
}

impl Race {
    pub fn name(&self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Elf => "Elf",
            Race::Dwarf => "Dwarf",
            Race::Beastkin => "Beastkin",
        }
    }

    /// Flat stat bonus applied on top of class base stats
    pub fn stat_bonus(&self) -> StatBlock {
        match self {
            Race::Human => StatBlock::ZERO,
            Race::Elf => StatBlock { hp: -5, atk: -2, def: -2, mag: 5, spd: 3, res: 3 },
            Race::Dwarf => StatBlock { hp: 15, atk: 3, def: 5, mag: -3, spd: -3, res: 2 },
            Race::Beastkin => StatBlock { hp: 5, atk: 5, def: -2, mag: -3, spd: 5, res: -1 },
        }
    }

    /// Multiplier applied to experience gains
    ///
    /// Humans learn fastest, beastkin slowest.
    pub fn exp_multiplier(&self) -> f64 {
        match self {
            Race::Human => 1.10,
            Race::Elf => 1.00,
            Race::Dwarf => 1.00,
            Race::Beastkin => 0.95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_is_the_baseline() {
        assert_eq!(Race::Human.stat_bonus(), StatBlock::ZERO);
        assert!(Race::Human.exp_multiplier() > 1.0);
    }

    #[test]
    fn test_bonuses_are_tradeoffs() {
        let elf = Race::Elf.stat_bonus();
        assert!(elf.hp < 0 && elf.mag > 0);
        let dwarf = Race::Dwarf.stat_bonus();
        assert!(dwarf.hp > 0 && dwarf.spd < 0);
    }
}
