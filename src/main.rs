//! Demo driver - runs one full battle headlessly with a scripted player
//!
//! Usage: `gridfall [config.toml]`. The hero walks toward the nearest enemy
//! and attacks whatever it can reach; allies and enemies play themselves.
//! Events are logged through tracing and a JSON summary is printed at the
//! end.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use gridfall::combat::{BattleUi, BattleView, Combat, CombatPhase, HighlightKind, RngDice};
use gridfall::core::types::{Position, UnitId};
use gridfall::core::{GameConfig, GridfallError, Result};
use gridfall::grid::generate_stage;
use gridfall::unit::{Faction, Unit, UnitFactory, ALLY_PRESETS};

/// Renders battle events into the log
#[derive(Debug, Default)]
struct LogView;

#[async_trait::async_trait]
impl BattleView for LogView {
    async fn move_unit(&mut self, id: UnitId, path: &[Position]) {
        if let Some(dest) = path.last() {
            tracing::info!(?id, steps = path.len(), ?dest, "unit moves");
        }
    }

    async fn play_hit_effect(&mut self, at: Position, crit: bool) {
        tracing::info!(?at, crit, "hit effect");
    }

    fn remove_unit(&mut self, id: UnitId) {
        tracing::info!(?id, "unit removed from field");
    }

    fn highlight_tiles(&mut self, tiles: &[Position], kind: HighlightKind) {
        tracing::debug!(count = tiles.len(), ?kind, "highlight");
    }

    fn clear_highlights(&mut self) {}

    fn set_unit_glow(&mut self, id: Option<UnitId>) {
        if let Some(id) = id {
            tracing::debug!(?id, "active unit");
        }
    }
}

#[derive(Debug, Default)]
struct LogUi;

impl BattleUi for LogUi {
    fn show_message(&mut self, text: &str) {
        tracing::info!("{text}");
    }

    fn show_floating_number(&mut self, at: Position, text: &str) {
        tracing::info!(?at, "{text}");
    }

    fn show_unit_panel(&mut self, unit: &Unit) {
        tracing::debug!(name = %unit.name, hp = unit.hp, max = unit.stats.hp, "unit panel");
    }

    fn update_unit_panel(&mut self, unit: &Unit) {
        tracing::debug!(name = %unit.name, hp = unit.hp, ratio = unit.hp_ratio(), "panel update");
    }

    fn set_phase_display(&mut self, text: &str) {
        tracing::info!("=== {text} ===");
    }

    fn set_turn_number(&mut self, turn: u32) {
        tracing::info!(turn, "round");
    }

    fn update_turn_order(&mut self, names: &[String], current: usize) {
        tracing::debug!(?names, current, "turn order");
    }

    fn show_action_menu(&mut self, unit: &Unit) {
        tracing::debug!(name = %unit.name, "action menu");
    }

    fn hide_action_menu(&mut self) {}

    fn show_skill_menu(&mut self, skills: &[gridfall::unit::Skill]) {
        tracing::debug!(count = skills.len(), "skill menu");
    }

    fn hide_skill_menu(&mut self) {}
}

#[derive(Debug, Clone, Serialize)]
struct BattleSummary {
    stage: u32,
    map_seed: Option<u64>,
    rounds: u32,
    outcome: String,
    exp_earned: u32,
    survivors: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path))?,
        None => GameConfig::default(),
    };
    config.validate().map_err(GridfallError::InvalidConfig)?;
    tracing::info!(stage = config.stage, hero = %config.hero_name, "starting battle");

    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let grid = generate_stage(config.stage, &mut rng);

    let mut factory = UnitFactory::new();
    let mut units = Vec::new();
    units.push(factory.player(
        &config.hero_name,
        config.hero_race,
        config.hero_class,
        config.hero_background,
    ));
    for preset in &ALLY_PRESETS {
        units.push(factory.ally(preset, config.ally_level));
    }
    for preset in gridfall::unit::presets::roster_for_stage(config.stage) {
        units.push(factory.enemy(preset, config.stage, &mut rng));
    }

    // Deploy: player-side units on player spawns, enemies on theirs
    let mut player_spawns = grid.player_spawns.iter();
    let mut enemy_spawns = grid.enemy_spawns.iter();
    units.retain_mut(|unit| {
        let spawn = if unit.faction.is_player_side() {
            player_spawns.next()
        } else {
            enemy_spawns.next()
        };
        match spawn {
            Some(pos) => {
                unit.pos = *pos;
                true
            }
            None => false,
        }
    });

    let result: Arc<Mutex<Option<(String, u32)>>> = Arc::new(Mutex::new(None));
    let mut combat = Combat::new(
        grid,
        units,
        Box::new(LogView),
        Box::new(LogUi),
        Box::new(RngDice::new(rng)),
    );
    let on_win = Arc::clone(&result);
    combat.on_victory(move |exp| {
        if let Ok(mut slot) = on_win.lock() {
            *slot = Some(("victory".to_string(), exp));
        }
    });
    let on_loss = Arc::clone(&result);
    combat.on_defeat(move || {
        if let Ok(mut slot) = on_loss.lock() {
            *slot = Some(("defeat".to_string(), 0));
        }
    });

    combat.start().await;
    drive_player(&mut combat).await;

    let (outcome, exp_earned) = result
        .lock()
        .ok()
        .and_then(|slot| slot.clone())
        .unwrap_or_else(|| ("unresolved".to_string(), 0));
    let summary = BattleSummary {
        stage: config.stage,
        map_seed: config.seed,
        rounds: combat.turn_number(),
        outcome,
        exp_earned,
        survivors: combat
            .units()
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| format!("{} (lv {}, {}/{} hp)", u.name, u.level, u.hp, u.stats.hp))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Script the hero: advance on the nearest enemy and attack when possible
async fn drive_player(combat: &mut Combat) {
    // Bounded so a stalemate cannot hang the demo
    let mut budget = 500;
    while !combat.phase().is_terminal() && budget > 0 {
        budget -= 1;
        match combat.phase() {
            CombatPhase::PlayerSelect => {
                let Some(pos) = combat.current_unit().map(|u| u.pos) else {
                    break;
                };
                combat.handle_tile_click(pos).await;
            }
            CombatPhase::PlayerMove => {
                let Some(hero_pos) = combat.current_unit().map(|u| u.pos) else {
                    break;
                };
                let target = combat
                    .units()
                    .iter()
                    .filter(|u| u.faction == Faction::Enemy && u.is_alive())
                    .min_by_key(|u| hero_pos.manhattan(u.pos))
                    .map(|u| u.pos);
                let dest = target
                    .and_then(|t| {
                        combat
                            .movable_tiles()
                            .iter()
                            .copied()
                            .min_by_key(|p| p.manhattan(t))
                            .filter(|p| p.manhattan(t) < hero_pos.manhattan(t))
                    })
                    .unwrap_or(hero_pos);
                combat.handle_tile_click(dest).await;
            }
            CombatPhase::PlayerAction => {
                combat.begin_targeting(None);
                if combat.phase() != CombatPhase::PlayerTarget {
                    combat.do_wait().await;
                }
            }
            CombatPhase::PlayerTarget => {
                let Some(pos) = combat.targetable_tiles().first().copied() else {
                    break;
                };
                combat.handle_tile_click(pos).await;
            }
            _ => break,
        }
    }
}
