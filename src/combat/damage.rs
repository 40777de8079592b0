//! Attack resolution - the d20 to-hit roll and damage math
//!
//! All randomness flows through the `Dice` trait so battles can be seeded
//! from config and tests can script exact rolls.

use rand::Rng;

use crate::grid::Terrain;
use crate::unit::{Skill, SkillKind, Unit};

/// Source of combat randomness
pub trait Dice: Send {
    /// A d20 roll, 1..=20
    fn d20(&mut self) -> u8;

    /// Uniform value in [0, 1)
    fn chance(&mut self) -> f64;

    /// Uniform index in 0..len
    fn index(&mut self, len: usize) -> usize;
}

/// Real dice backed by any seedable RNG
pub struct RngDice<R: Rng + Send> {
    rng: R,
}

impl<R: Rng + Send> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> Dice for RngDice<R> {
    fn d20(&mut self) -> u8 {
        self.rng.gen_range(1..=20)
    }

    fn chance(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Result of resolving one attack or heal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Damage dealt, or HP restored for heals; 0 on a miss
    pub damage: i32,
    /// The raw d20 roll; 0 for heals, which never roll
    pub roll: u8,
    pub crit: bool,
    pub miss: bool,
}

/// Resolve an attack or heal without mutating either unit
///
/// Heals restore `round(MAG x power)` and cannot miss. Attacks roll a d20
/// against a defence class of `10 + DEF/2`; a natural 20 always hits and
/// crits for 1.5x, a natural 1 always misses. Damage is the attacker's
/// offensive stat scaled by skill power, less half the defender's defensive
/// stat (with terrain cover added), plus a small variance roll, never below 1.
pub fn resolve_action(
    attacker: &Unit,
    target: &Unit,
    target_terrain: Option<Terrain>,
    skill: Option<&Skill>,
    dice: &mut dyn Dice,
) -> ActionOutcome {
    if let Some(skill) = skill {
        if skill.kind == SkillKind::Heal {
            let amount = (f64::from(attacker.stats.mag) * skill.power).round() as i32;
            return ActionOutcome { damage: amount, roll: 0, crit: false, miss: false };
        }
    }

    // A bare attack is always physical; only skills carry a magic kind
    let magic = skill.is_some_and(|s| s.kind == SkillKind::Magic);
    let power = skill.map_or(1.0, |s| s.power);

    let off = if magic { attacker.stats.mag } else { attacker.stats.atk };
    let cover = match target_terrain {
        Some(t) if magic => t.res_bonus(),
        Some(t) => t.def_bonus(),
        None => 0,
    };
    let def = if magic { target.stats.res } else { target.stats.def } + cover;

    let roll = dice.d20();
    let crit = roll == 20;
    let atk_bonus = off / 2;
    let dc = 10 + def / 2;
    // Natural 20 always hits, natural 1 always misses
    let miss = !crit && (roll == 1 || i32::from(roll) + atk_bonus < dc);
    if miss {
        return ActionOutcome { damage: 0, roll, crit: false, miss: true };
    }

    let variance = dice.chance() * 3.0 - 1.0;
    let raw = f64::from(off) * power - f64::from(def) * 0.5 + variance;
    let mut damage = (raw.round() as i32).max(1);
    if crit {
        damage = (f64::from(damage) * 1.5).ceil() as i32;
    }
    ActionOutcome { damage, roll, crit, miss: false }
}
