//! Units - stats, progression, and status effects
//!
//! A unit's effective stats are always recomputable from its identity (class,
//! race, background, level); current HP, experience, and statuses are the only
//! mutable battle state.

pub mod background;
pub mod class;
pub mod presets;
pub mod race;
pub mod skill;

pub use background::Background;
pub use class::Class;
pub use presets::{UnitFactory, UnitPreset, ALLY_PRESETS, ENEMY_PRESETS};
pub use race::Race;
pub use skill::{Skill, SkillId, SkillKind};

use serde::{Deserialize, Serialize};

use crate::core::types::{Position, UnitId};

/// Flat damage dealt by one burn tick
pub const BURN_DAMAGE: i32 = 2;

/// The six combat stats; `hp` is maximum HP when used as effective stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub mag: i32,
    pub spd: i32,
    pub res: i32,
}

impl StatBlock {
    pub const ZERO: StatBlock = StatBlock { hp: 0, atk: 0, def: 0, mag: 0, spd: 0, res: 0 };

    /// Clamp to playable minimums after stacking bonuses and penalties
    ///
    /// HP, ATK, and SPD can never drop below 1; the defensive stats and MAG
    /// bottom out at 0.
    pub fn floored(self) -> StatBlock {
        StatBlock {
            hp: self.hp.max(1),
            atk: self.atk.max(1),
            def: self.def.max(0),
            mag: self.mag.max(0),
            spd: self.spd.max(1),
            res: self.res.max(0),
        }
    }

    /// Per-stat difference (`self` minus `other`), used for level-up reports
    pub fn delta(self, other: StatBlock) -> StatBlock {
        StatBlock {
            hp: self.hp - other.hp,
            atk: self.atk - other.atk,
            def: self.def - other.def,
            mag: self.mag - other.mag,
            spd: self.spd - other.spd,
            res: self.res - other.res,
        }
    }

    fn scaled(self, factor: i32) -> StatBlock {
        StatBlock {
            hp: self.hp * factor,
            atk: self.atk * factor,
            def: self.def * factor,
            mag: self.mag * factor,
            spd: self.spd * factor,
            res: self.res * factor,
        }
    }
}

impl std::ops::Add for StatBlock {
    type Output = StatBlock;

    fn add(self, rhs: StatBlock) -> StatBlock {
        StatBlock {
            hp: self.hp + rhs.hp,
            atk: self.atk + rhs.atk,
            def: self.def + rhs.def,
            mag: self.mag + rhs.mag,
            spd: self.spd + rhs.spd,
            res: self.res + rhs.res,
        }
    }
}

/// Which side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The human-controlled hero
    Player,
    /// AI-controlled, fights alongside the player
    Ally,
    Enemy,
}

impl Faction {
    /// Player and Ally units are on the same side
    pub fn is_player_side(&self) -> bool {
        matches!(self, Faction::Player | Faction::Ally)
    }

    pub fn is_hostile_to(&self, other: Faction) -> bool {
        self.is_player_side() != other.is_player_side()
    }
}

/// Kinds of inflictable status effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusKind {
    Burn,
    Stun,
}

/// Remaining duration (in turns) of each status on a unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub burn: u32,
    pub stun: u32,
}

/// What happened to a unit when its statuses ticked at turn start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTick {
    /// The unit loses its action this turn
    Stunned,
    Burned { damage: i32, hp_left: i32 },
}

/// One combatant
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub race: Race,
    pub class: Class,
    pub background: Option<Background>,
    pub faction: Faction,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    /// Effective stats at the current level; `stats.hp` is maximum HP
    pub stats: StatBlock,
    /// Current HP
    pub hp: i32,
    pub move_range: i32,
    pub attack_range: i32,
    pub skills: &'static [Skill],
    pub status: StatusEffects,
    pub has_moved: bool,
    pub has_acted: bool,
    pub pos: Position,
}

/// Total experience needed to advance from `level` to the next
pub fn exp_to_next_level(level: u32) -> u32 {
    (100.0 * 1.25f64.powi(level as i32 - 1)).floor() as u32
}

/// Effective stats for a unit identity at a given level
///
/// Pure function of identity: class base plus race bonus plus growth for each
/// level past the first plus background, clamped to playable floors.
pub fn compute_stats(
    class: Class,
    race: Race,
    background: Option<Background>,
    level: u32,
) -> StatBlock {
    let mut stats = class.base_stats() + race.stat_bonus();
    stats = stats + class.growth().scaled(level as i32 - 1);
    if let Some(bg) = background {
        stats = stats + bg.stat_bonus();
    }
    stats.floored()
}

impl Unit {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Fraction of maximum HP remaining, for health bars
    pub fn hp_ratio(&self) -> f64 {
        f64::from(self.hp) / f64::from(self.stats.hp)
    }

    /// Experience awarded for defeating this unit
    pub fn exp_reward(&self) -> u32 {
        20 * self.level
    }

    /// Apply damage; every hit deals at least 1
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let dealt = amount.max(1);
        self.hp = (self.hp - dealt).max(0);
        dealt
    }

    /// Restore HP; every heal restores at least 1, capped at maximum
    pub fn heal_hp(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(1)).min(self.stats.hp);
        self.hp - before
    }

    pub fn restore_hp(&mut self) {
        self.hp = self.stats.hp;
    }

    /// Begin this unit's turn: reset action flags and tick statuses
    ///
    /// Stun consumes the unit's action for the turn; burn deals flat damage.
    /// Both tick on the same turn if both are active.
    pub fn start_turn(&mut self) -> Vec<StatusTick> {
        self.has_moved = false;
        self.has_acted = false;

        let mut ticks = Vec::new();
        if self.status.stun > 0 {
            self.status.stun -= 1;
            self.has_acted = true;
            ticks.push(StatusTick::Stunned);
        }
        if self.status.burn > 0 {
            self.take_damage(BURN_DAMAGE);
            self.status.burn -= 1;
            ticks.push(StatusTick::Burned { damage: BURN_DAMAGE, hp_left: self.hp });
        }
        ticks
    }

    /// Inflict a status; re-application keeps the longer remaining duration
    pub fn apply_status(&mut self, kind: StatusKind, turns: u32) {
        match kind {
            StatusKind::Burn => self.status.burn = self.status.burn.max(turns),
            StatusKind::Stun => self.status.stun = self.status.stun.max(turns),
        }
    }

    /// Grant experience, scaled by race; returns stat gains if a level was
    /// gained
    ///
    /// At most one level per grant, even if the scaled amount covers several
    /// thresholds; the surplus carries toward the next one.
    pub fn gain_exp(&mut self, amount: u32) -> Option<StatBlock> {
        let scaled = (f64::from(amount) * self.race.exp_multiplier()).round() as u32;
        self.exp += scaled;
        if self.exp >= self.exp_to_next {
            Some(self.level_up())
        } else {
            None
        }
    }

    fn level_up(&mut self) -> StatBlock {
        self.exp -= self.exp_to_next;
        self.level += 1;
        self.exp_to_next = exp_to_next_level(self.level);

        let old = self.stats;
        self.stats = compute_stats(self.class, self.race, self.background, self.level);
        let gains = self.stats.delta(old);
        // Level-up heals by the max-HP increase, never past the new maximum
        self.hp = (self.hp + gains.hp).min(self.stats.hp);
        tracing::info!(unit = %self.name, level = self.level, "level up");
        gains
    }
}
