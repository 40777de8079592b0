//! Skill definitions
//!
//! Skills are static data attached to a class; the power multiplier scales
//! the attacker's offensive stat and the range is a Manhattan radius.

use serde::{Deserialize, Serialize};

use crate::unit::StatusKind;

/// How a skill resolves and which side it may target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    /// ATK vs DEF, mitigated by forest cover
    Physical,
    /// MAG vs RES, mitigated by crystal cover
    Magic,
    /// Restores HP to an ally, no attack roll
    Heal,
}

impl SkillKind {
    /// Healing targets the user's own side; everything else targets foes
    pub fn targets_allies(&self) -> bool {
        matches!(self, SkillKind::Heal)
    }
}

/// Stable identity for each skill, independent of display name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillId {
    Slash,
    Bash,
    Fireball,
    IceLance,
    TrueShot,
    Volley,
    HolyLight,
    Strike,
}

/// One usable skill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skill {
    pub id: SkillId,
    pub name: &'static str,
    pub kind: SkillKind,
    /// Multiplier applied to the attacker's offensive stat
    pub power: f64,
    /// Manhattan targeting radius
    pub range: i32,
}

impl Skill {
    /// Status effect this skill inflicts on a surviving target, if any
    pub fn applied_status(&self) -> Option<(StatusKind, u32)> {
        match self.id {
            SkillId::Fireball => Some((StatusKind::Burn, 3)),
            SkillId::Bash => Some((StatusKind::Stun, 1)),
            _ => None,
        }
    }
}
