//! Unit presets, stage rosters, and the unit factory

use rand::Rng;

use crate::core::types::{Position, UnitId};
use crate::unit::{
    compute_stats, exp_to_next_level, Background, Class, Faction, Race, StatusEffects, Unit,
};

/// A named identity template for AI-built units
#[derive(Debug, Clone, Copy)]
pub struct UnitPreset {
    pub name: &'static str,
    pub race: Race,
    pub class: Class,
}

pub const ALLY_PRESETS: [UnitPreset; 3] = [
    UnitPreset { name: "Knight", race: Race::Human, class: Class::Warrior },
    UnitPreset { name: "Sorcerer", race: Race::Elf, class: Class::Mage },
    UnitPreset { name: "Ranger", race: Race::Beastkin, class: Class::Archer },
];

pub const ENEMY_PRESETS: [UnitPreset; 6] = [
    UnitPreset { name: "Dark Knight", race: Race::Human, class: Class::Warrior },
    UnitPreset { name: "Iron Guard", race: Race::Dwarf, class: Class::Warrior },
    UnitPreset { name: "Shadow Mage", race: Race::Elf, class: Class::Mage },
    UnitPreset { name: "Shadow Archer", race: Race::Beastkin, class: Class::Archer },
    UnitPreset { name: "Dark Witch", race: Race::Human, class: Class::Healer },
    UnitPreset { name: "Orc Crusher", race: Race::Dwarf, class: Class::Warrior },
];

/// Enemy team composition for a band of stages
#[derive(Debug, Clone, Copy)]
struct StageRoster {
    min_stage: u32,
    roster: &'static [UnitPreset],
}

// Ordered by min_stage descending so lookup takes the first match.
const STAGE_ROSTERS: [StageRoster; 4] = [
    StageRoster {
        min_stage: 10,
        roster: &[
            ENEMY_PRESETS[5], // Orc Crusher
            ENEMY_PRESETS[2], // Shadow Mage
            ENEMY_PRESETS[3], // Shadow Archer
            ENEMY_PRESETS[4], // Dark Witch
            ENEMY_PRESETS[0], // Dark Knight
        ],
    },
    StageRoster {
        min_stage: 6,
        roster: &[ENEMY_PRESETS[0], ENEMY_PRESETS[2], ENEMY_PRESETS[3], ENEMY_PRESETS[4]],
    },
    StageRoster {
        min_stage: 3,
        roster: &[ENEMY_PRESETS[0], ENEMY_PRESETS[2], ENEMY_PRESETS[3]],
    },
    StageRoster {
        min_stage: 1,
        roster: &[ENEMY_PRESETS[0], ENEMY_PRESETS[1]],
    },
];

/// Enemy team composition for a given stage
pub fn roster_for_stage(stage: u32) -> &'static [UnitPreset] {
    STAGE_ROSTERS
        .iter()
        .find(|r| stage >= r.min_stage)
        .map(|r| r.roster)
        .unwrap_or(STAGE_ROSTERS[STAGE_ROSTERS.len() - 1].roster)
}

/// Builds units with unique ids
#[derive(Debug, Default)]
pub struct UnitFactory {
    next_id: u32,
}

impl UnitFactory {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> UnitId {
        let id = UnitId(self.next_id);
        self.next_id += 1;
        id
    }

    fn build(
        &mut self,
        name: String,
        race: Race,
        class: Class,
        background: Option<Background>,
        faction: Faction,
        level: u32,
    ) -> Unit {
        let stats = compute_stats(class, race, background, level);
        Unit {
            id: self.next_id(),
            name,
            race,
            class,
            background,
            faction,
            level,
            exp: 0,
            exp_to_next: exp_to_next_level(level),
            stats,
            hp: stats.hp,
            move_range: class.move_range(),
            attack_range: class.attack_range(),
            skills: class.skills(),
            status: StatusEffects::default(),
            has_moved: false,
            has_acted: false,
            pos: Position::new(0, 0),
        }
    }

    /// The human-controlled hero, always level 1
    pub fn player(
        &mut self,
        name: &str,
        race: Race,
        class: Class,
        background: Option<Background>,
    ) -> Unit {
        self.build(name.to_string(), race, class, background, Faction::Player, 1)
    }

    /// An AI-controlled ally from a preset
    pub fn ally(&mut self, preset: &UnitPreset, level: u32) -> Unit {
        self.build(
            preset.name.to_string(),
            preset.race,
            preset.class,
            None,
            Faction::Ally,
            level.max(1),
        )
    }

    /// An enemy from a preset, levelled for the stage with a little variance
    pub fn enemy(&mut self, preset: &UnitPreset, stage: u32, rng: &mut impl Rng) -> Unit {
        let level = (stage + rng.gen_range(0..2)).max(1);
        self.build(
            preset.name.to_string(),
            preset.race,
            preset.class,
            None,
            Faction::Enemy,
            level,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_roster_sizes_scale_with_stage() {
        assert_eq!(roster_for_stage(1).len(), 2);
        assert_eq!(roster_for_stage(2).len(), 2);
        assert_eq!(roster_for_stage(3).len(), 3);
        assert_eq!(roster_for_stage(6).len(), 4);
        assert_eq!(roster_for_stage(10).len(), 5);
        assert_eq!(roster_for_stage(42).len(), 5);
    }

    #[test]
    fn test_factory_ids_are_unique() {
        let mut factory = UnitFactory::new();
        let a = factory.player("A", Race::Human, Class::Warrior, None);
        let b = factory.ally(&ALLY_PRESETS[0], 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_enemy_level_tracks_stage() {
        let mut factory = UnitFactory::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for _ in 0..20 {
            let enemy = factory.enemy(&ENEMY_PRESETS[0], 5, &mut rng);
            assert!(enemy.level == 5 || enemy.level == 6);
            assert_eq!(enemy.faction, Faction::Enemy);
        }
    }

    #[test]
    fn test_units_spawn_at_full_hp() {
        let mut factory = UnitFactory::new();
        let unit = factory.player("Hero", Race::Dwarf, Class::Warrior, Some(Background::Soldier));
        assert_eq!(unit.hp, unit.stats.hp);
        assert_eq!(unit.exp_to_next, 100);
        assert_eq!(unit.skills.len(), 2);
    }
}
