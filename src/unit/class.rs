//! Class base stats, growths, and skill lists

use serde::{Deserialize, Serialize};

use crate::unit::skill::{Skill, SkillId, SkillKind};
use crate::unit::StatBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    Warrior,
    Mage,
    Archer,
    Healer,
}

static WARRIOR_SKILLS: [Skill; 2] = [
    Skill { id: SkillId::Slash, name: "Power Slash", kind: SkillKind::Physical, power: 1.3, range: 1 },
    Skill { id: SkillId::Bash, name: "Shield Bash", kind: SkillKind::Physical, power: 0.7, range: 1 },
];

static MAGE_SKILLS: [Skill; 2] = [
    Skill { id: SkillId::Fireball, name: "Fireball", kind: SkillKind::Magic, power: 1.5, range: 3 },
    Skill { id: SkillId::IceLance, name: "Ice Lance", kind: SkillKind::Magic, power: 1.2, range: 3 },
];

static ARCHER_SKILLS: [Skill; 2] = [
    Skill { id: SkillId::TrueShot, name: "True Shot", kind: SkillKind::Physical, power: 1.1, range: 4 },
    Skill { id: SkillId::Volley, name: "Arrow Volley", kind: SkillKind::Physical, power: 0.7, range: 4 },
];

static HEALER_SKILLS: [Skill; 2] = [
    Skill { id: SkillId::HolyLight, name: "Holy Light", kind: SkillKind::Heal, power: 1.5, range: 2 },
    Skill { id: SkillId::Strike, name: "Light Strike", kind: SkillKind::Magic, power: 1.0, range: 2 },
];

impl Class {
    pub fn name(&self) -> &'static str {
        match self {
            Class::Warrior => "Warrior",
            Class::Mage => "Mage",
            Class::Archer => "Archer",
            Class::Healer => "Healer",
        }
    }

    /// Stats at level 1, before race and background adjustments
    pub fn base_stats(&self) -> StatBlock {
        match self {
            Class::Warrior => StatBlock { hp: 55, atk: 14, def: 12, mag: 2, spd: 8, res: 5 },
            Class::Mage => StatBlock { hp: 30, atk: 4, def: 3, mag: 16, spd: 7, res: 8 },
            Class::Archer => StatBlock { hp: 38, atk: 13, def: 6, mag: 4, spd: 11, res: 4 },
            Class::Healer => StatBlock { hp: 38, atk: 5, def: 6, mag: 12, spd: 9, res: 11 },
        }
    }

    /// Per-level stat growth
    pub fn growth(&self) -> StatBlock {
        match self {
            Class::Warrior => StatBlock { hp: 8, atk: 3, def: 3, mag: 0, spd: 1, res: 1 },
            Class::Mage => StatBlock { hp: 4, atk: 0, def: 1, mag: 4, spd: 1, res: 2 },
            Class::Archer => StatBlock { hp: 5, atk: 3, def: 1, mag: 1, spd: 2, res: 1 },
            Class::Healer => StatBlock { hp: 5, atk: 1, def: 1, mag: 3, spd: 1, res: 3 },
        }
    }

    /// Tiles of movement per turn
    pub fn move_range(&self) -> i32 {
        match self {
            Class::Mage => 2,
            _ => 3,
        }
    }

    /// Basic attack range in tiles
    pub fn attack_range(&self) -> i32 {
        match self {
            Class::Warrior => 1,
            Class::Mage => 3,
            Class::Archer => 4,
            Class::Healer => 2,
        }
    }

    pub fn skills(&self) -> &'static [Skill] {
        match self {
            Class::Warrior => &WARRIOR_SKILLS,
            Class::Mage => &MAGE_SKILLS,
            Class::Archer => &ARCHER_SKILLS,
            Class::Healer => &HEALER_SKILLS,
        }
    }
}
