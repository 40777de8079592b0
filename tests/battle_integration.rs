//! End-to-end battles driven through the public input API
//!
//! All tests run on a paused tokio clock so the pacing delays resolve
//! instantly, and on scripted dice so every roll is known.

mod common;

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use gridfall::combat::CombatPhase;
use gridfall::core::types::Position;
use gridfall::unit::{Class, Faction, Race, StatusKind, Unit, UnitFactory, ALLY_PRESETS, ENEMY_PRESETS};

use common::{assert_occupancy_consistent, battle};

fn hero_at(factory: &mut UnitFactory, class: Class, pos: Position) -> Unit {
    let mut unit = factory.player("Hero", Race::Human, class, None);
    unit.pos = pos;
    unit
}

fn enemy_at(factory: &mut UnitFactory, pos: Position) -> Unit {
    let mut unit = factory.ally(&ENEMY_PRESETS[0], 1);
    unit.faction = Faction::Enemy;
    unit.pos = pos;
    unit
}

#[tokio::test(start_paused = true)]
async fn test_turn_order_fastest_first_with_stable_ties() {
    let mut factory = UnitFactory::new();
    let mut units: Vec<Unit> = (0..4)
        .map(|i| hero_at(&mut factory, Class::Warrior, Position::new(0, i)))
        .collect();
    units[0].stats.spd = 5;
    units[1].stats.spd = 10;
    units[2].stats.spd = 10;
    units[3].stats.spd = 3;
    let ids: Vec<_> = units.iter().map(|u| u.id).collect();

    let (mut combat, _) = battle(units, &[]);
    combat.start().await;

    assert_eq!(combat.phase(), CombatPhase::PlayerSelect);
    // Speed ties (units 1 and 2) keep roster order
    assert_eq!(combat.turn_order(), &[ids[1], ids[2], ids[0], ids[3]]);
}

#[tokio::test(start_paused = true)]
async fn test_forced_attack_wins_battle() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(5, 5));
    let hero_id = hero.id;
    let mut enemy = enemy_at(&mut factory, Position::new(5, 6));
    enemy.hp = 1;

    let (mut combat, messages) = battle(vec![hero, enemy], &[10]);
    let exp_awarded = Arc::new(AtomicU32::new(0));
    let exp_handle = Arc::clone(&exp_awarded);
    combat.on_victory(move |exp| exp_handle.store(exp, Ordering::SeqCst));

    combat.start().await;
    assert_eq!(combat.phase(), CombatPhase::PlayerSelect);

    combat.handle_tile_click(Position::new(5, 5)).await;
    assert_eq!(combat.phase(), CombatPhase::PlayerMove);
    // Clicking the hero's own tile skips the move
    combat.handle_tile_click(Position::new(5, 5)).await;
    assert_eq!(combat.phase(), CombatPhase::PlayerAction);

    combat.begin_targeting(None);
    assert_eq!(combat.phase(), CombatPhase::PlayerTarget);
    assert!(combat.targetable_tiles().contains(&Position::new(5, 6)));

    combat.handle_tile_click(Position::new(5, 6)).await;

    assert_eq!(combat.phase(), CombatPhase::Done);
    assert_eq!(exp_awarded.load(Ordering::SeqCst), 20);
    assert!(messages.lock().unwrap().iter().any(|m| m == "Victory!"));
    // The engine only reports the total; applying EXP is the caller's job,
    // so the killer's own tally is untouched.
    assert_eq!(combat.unit(hero_id).unwrap().exp, 0);
    assert_eq!(combat.unit(hero_id).unwrap().level, 1);
    assert_occupancy_consistent(&combat);
}

#[tokio::test(start_paused = true)]
async fn test_burn_death_at_round_start_frees_tile() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(0, 0));
    let mut burning = enemy_at(&mut factory, Position::new(5, 5));
    burning.hp = 2;
    burning.apply_status(StatusKind::Burn, 1);
    burning.stats.spd = 99;
    let burning_id = burning.id;
    let other = enemy_at(&mut factory, Position::new(9, 9));

    let (mut combat, messages) = battle(vec![hero, burning, other], &[]);
    combat.start().await;

    // The burning unit went first, died to its own burn, and play moved on
    assert_eq!(combat.phase(), CombatPhase::PlayerSelect);
    assert!(!combat.unit(burning_id).unwrap().is_alive());
    assert_eq!(combat.grid().occupant(Position::new(5, 5)), None);
    assert!(messages.lock().unwrap().iter().any(|m| m.contains("takes 2 burn damage")));
    assert!(messages.lock().unwrap().iter().any(|m| m.contains("burned away")));
    assert_occupancy_consistent(&combat);
}

#[tokio::test(start_paused = true)]
async fn test_input_ignored_after_battle_ends() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(5, 5));
    let mut enemy = enemy_at(&mut factory, Position::new(5, 6));
    enemy.hp = 1;

    let (mut combat, _) = battle(vec![hero, enemy], &[10]);
    combat.start().await;
    combat.handle_tile_click(Position::new(5, 5)).await;
    combat.handle_tile_click(Position::new(5, 5)).await;
    combat.begin_targeting(None);
    combat.handle_tile_click(Position::new(5, 6)).await;
    assert_eq!(combat.phase(), CombatPhase::Done);

    combat.handle_tile_click(Position::new(5, 5)).await;
    combat.begin_targeting(None);
    combat.do_wait().await;
    assert_eq!(combat.phase(), CombatPhase::Done);
}

#[tokio::test(start_paused = true)]
async fn test_no_targets_in_range_stays_in_action_phase() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(0, 0));
    let enemy = enemy_at(&mut factory, Position::new(9, 9));

    let (mut combat, messages) = battle(vec![hero, enemy], &[]);
    combat.start().await;
    combat.handle_tile_click(Position::new(0, 0)).await;
    combat.handle_tile_click(Position::new(0, 0)).await;
    assert_eq!(combat.phase(), CombatPhase::PlayerAction);

    combat.begin_targeting(None);
    assert_eq!(combat.phase(), CombatPhase::PlayerAction);
    assert!(messages.lock().unwrap().iter().any(|m| m.contains("No valid targets")));
}

#[tokio::test(start_paused = true)]
async fn test_clicking_away_cancels_selection() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(5, 5));
    let enemy = enemy_at(&mut factory, Position::new(9, 9));

    let (mut combat, _) = battle(vec![hero, enemy], &[]);
    combat.start().await;
    combat.handle_tile_click(Position::new(5, 5)).await;
    assert_eq!(combat.phase(), CombatPhase::PlayerMove);
    assert!(!combat.movable_tiles().is_empty());

    // Far outside movement range
    combat.handle_tile_click(Position::new(0, 0)).await;
    assert_eq!(combat.phase(), CombatPhase::PlayerSelect);
    assert!(combat.movable_tiles().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_wait_hands_the_round_over() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(0, 0));
    let enemy = enemy_at(&mut factory, Position::new(9, 9));
    let enemy_id = enemy.id;

    let (mut combat, _) = battle(vec![hero, enemy], &[]);
    combat.start().await;
    combat.handle_tile_click(Position::new(0, 0)).await;
    combat.handle_tile_click(Position::new(0, 0)).await;
    combat.do_wait().await;

    // The enemy took its turn (stepping closer) and a new round began
    assert_eq!(combat.phase(), CombatPhase::PlayerSelect);
    assert_eq!(combat.turn_number(), 2);
    let enemy_pos = combat.unit(enemy_id).unwrap().pos;
    assert!(enemy_pos.manhattan(Position::new(0, 0)) < 18);
    assert_occupancy_consistent(&combat);
}

#[tokio::test(start_paused = true)]
async fn test_enemy_ai_defeats_lone_hero() {
    let mut factory = UnitFactory::new();
    let mut hero = hero_at(&mut factory, Class::Warrior, Position::new(5, 5));
    hero.hp = 5;
    let enemy = enemy_at(&mut factory, Position::new(5, 6));

    let (mut combat, messages) = battle(vec![hero, enemy], &[]);
    let defeated = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&defeated);
    combat.on_defeat(move || flag.store(true, Ordering::SeqCst));

    combat.start().await;
    let mut budget = 50;
    while !combat.phase().is_terminal() && budget > 0 {
        budget -= 1;
        match combat.phase() {
            CombatPhase::PlayerSelect => {
                combat.handle_tile_click(Position::new(5, 5)).await;
            }
            CombatPhase::PlayerMove => {
                combat.handle_tile_click(Position::new(5, 5)).await;
            }
            CombatPhase::PlayerAction => combat.do_wait().await,
            _ => break,
        }
    }

    assert_eq!(combat.phase(), CombatPhase::Done);
    assert!(defeated.load(Ordering::SeqCst));
    assert!(messages.lock().unwrap().iter().any(|m| m == "Defeat..."));
    assert_occupancy_consistent(&combat);
}

#[tokio::test(start_paused = true)]
async fn test_bash_stuns_but_enemies_shrug_it_off() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(5, 5));
    let hero_id = hero.id;
    let enemy = enemy_at(&mut factory, Position::new(5, 6));
    let enemy_id = enemy.id;

    // Hero bashes (roll 10 hits for 4), then the enemy replies (13)
    let (mut combat, messages) = battle(vec![hero, enemy], &[10, 10]);
    combat.start().await;
    combat.handle_tile_click(Position::new(5, 5)).await;
    combat.handle_tile_click(Position::new(5, 5)).await;

    let bash = &Class::Warrior.skills()[1];
    combat.begin_targeting(Some(bash));
    assert_eq!(combat.phase(), CombatPhase::PlayerTarget);
    combat.handle_tile_click(Position::new(5, 6)).await;

    // Round 2: back to the hero. The enemy was stunned by the bash, but
    // enemy units act regardless, so it still hit back.
    assert_eq!(combat.phase(), CombatPhase::PlayerSelect);
    let enemy_unit = combat.unit(enemy_id).unwrap();
    assert_eq!(enemy_unit.hp, enemy_unit.stats.hp - 4);
    assert_eq!(enemy_unit.status.stun, 0);
    assert_eq!(combat.unit(hero_id).unwrap().hp, 55 - 13);
    // The stun still gets announced when the enemy's turn starts
    assert!(messages.lock().unwrap().iter().any(|m| m.contains("is stunned!")));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_targeting_returns_to_action_menu() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Warrior, Position::new(5, 5));
    let enemy = enemy_at(&mut factory, Position::new(5, 6));

    let (mut combat, _) = battle(vec![hero, enemy], &[]);
    combat.start().await;
    combat.handle_tile_click(Position::new(5, 5)).await;
    combat.handle_tile_click(Position::new(5, 5)).await;
    combat.begin_targeting(None);
    assert_eq!(combat.phase(), CombatPhase::PlayerTarget);

    // A stray click outside the target set changes nothing
    combat.handle_tile_click(Position::new(0, 0)).await;
    assert_eq!(combat.phase(), CombatPhase::PlayerTarget);

    combat.cancel_targeting();
    assert_eq!(combat.phase(), CombatPhase::PlayerAction);
    assert!(combat.targetable_tiles().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_heal_targets_own_side_only() {
    let mut factory = UnitFactory::new();
    let hero = hero_at(&mut factory, Class::Healer, Position::new(5, 5));
    let mut ally = factory.ally(&ALLY_PRESETS[0], 1);
    ally.pos = Position::new(5, 6);
    ally.hp -= 20;
    let ally_id = ally.id;
    let enemy = enemy_at(&mut factory, Position::new(9, 9));

    let (mut combat, _) = battle(vec![hero, ally, enemy], &[]);
    combat.start().await;
    combat.handle_tile_click(Position::new(5, 5)).await;
    combat.handle_tile_click(Position::new(5, 5)).await;

    let holy_light = &Class::Healer.skills()[0];
    combat.begin_targeting(Some(holy_light));
    assert_eq!(combat.phase(), CombatPhase::PlayerTarget);
    assert!(combat.targetable_tiles().contains(&Position::new(5, 6)));
    assert!(!combat.targetable_tiles().contains(&Position::new(9, 9)));

    combat.handle_tile_click(Position::new(5, 6)).await;

    // MAG 12 x 1.5 = 18 restored
    assert_eq!(combat.unit(ally_id).unwrap().hp, 55 - 20 + 18);
}
