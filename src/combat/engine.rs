//! The turn-based combat engine
//!
//! One `Combat` owns the grid, the roster, and the turn cursor. AI turns are
//! resolved inside `run_from_current`, a sequential loop that only returns
//! when it is the player's turn (or the battle is over), so player input can
//! never interleave with an in-flight AI resolution.

use tokio::time::sleep;

use crate::combat::ai::{self, AiMove};
use crate::combat::constants::*;
use crate::combat::damage::{resolve_action, Dice};
use crate::combat::state::CombatPhase;
use crate::combat::view::{BattleUi, BattleView, HighlightKind};
use crate::core::types::{Position, UnitId};
use crate::grid::{find_path, reachable_tiles, tiles_in_range, Grid};
use crate::unit::{Faction, Skill, SkillKind, StatusTick, Unit};

pub struct Combat {
    grid: Grid,
    units: Vec<Unit>,
    phase: CombatPhase,
    turn_order: Vec<UnitId>,
    current_idx: usize,
    turn_number: u32,
    selected: Option<UnitId>,
    movable_tiles: Vec<Position>,
    targetable_tiles: Vec<Position>,
    pending_skill: Option<&'static Skill>,
    view: Box<dyn BattleView>,
    ui: Box<dyn BattleUi>,
    dice: Box<dyn Dice>,
    on_victory: Box<dyn FnMut(u32) + Send>,
    on_defeat: Box<dyn FnMut() + Send>,
}

impl Combat {
    /// Build a battle; grid occupancy is synced from the units' positions
    pub fn new(
        mut grid: Grid,
        units: Vec<Unit>,
        view: Box<dyn BattleView>,
        ui: Box<dyn BattleUi>,
        dice: Box<dyn Dice>,
    ) -> Self {
        for unit in &units {
            if unit.is_alive() {
                grid.set_occupant(unit.pos, Some(unit.id));
            }
        }
        Self {
            grid,
            units,
            phase: CombatPhase::Idle,
            turn_order: Vec::new(),
            current_idx: 0,
            turn_number: 0,
            selected: None,
            movable_tiles: Vec::new(),
            targetable_tiles: Vec::new(),
            pending_skill: None,
            view,
            ui,
            dice,
            on_victory: Box::new(|_| {}),
            on_defeat: Box::new(|| {}),
        }
    }

    /// Called once with the total experience value of the defeated enemies
    pub fn on_victory(&mut self, f: impl FnMut(u32) + Send + 'static) {
        self.on_victory = Box::new(f);
    }

    pub fn on_defeat(&mut self, f: impl FnMut() + Send + 'static) {
        self.on_defeat = Box::new(f);
    }

    // ---- accessors ----

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn turn_order(&self) -> &[UnitId] {
        &self.turn_order
    }

    /// The unit whose turn it currently is
    pub fn current_unit(&self) -> Option<&Unit> {
        self.current_unit_id().and_then(|id| self.unit(id))
    }

    pub fn movable_tiles(&self) -> &[Position] {
        &self.movable_tiles
    }

    pub fn targetable_tiles(&self) -> &[Position] {
        &self.targetable_tiles
    }

    fn current_unit_id(&self) -> Option<UnitId> {
        self.turn_order.get(self.current_idx).copied()
    }

    fn unit_index(&self, id: UnitId) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    // ---- battle flow ----

    /// Begin the battle and run until player input is needed
    pub async fn start(&mut self) {
        self.turn_number = 1;
        self.ui.set_turn_number(1);
        self.build_turn_order();
        tracing::info!(units = self.units.len(), "battle started");
        self.run_from_current().await;
    }

    /// Rebuild the initiative order from the living roster
    ///
    /// Fastest first; roster order breaks speed ties, so the order is stable
    /// across rounds until someone dies or levels.
    fn build_turn_order(&mut self) {
        let living: Vec<&Unit> = self.units.iter().filter(|u| u.is_alive()).collect();
        let mut order: Vec<(i32, UnitId, String)> =
            living.iter().map(|u| (u.stats.spd, u.id, u.name.clone())).collect();
        order.sort_by_key(|(spd, _, _)| std::cmp::Reverse(*spd));
        self.turn_order = order.iter().map(|(_, id, _)| *id).collect();
        self.current_idx = 0;
        let names: Vec<String> = order.into_iter().map(|(_, _, name)| name).collect();
        self.ui.update_turn_order(&names, 0);
    }

    /// Process turns from the cursor until the player must act or the battle
    /// ends
    async fn run_from_current(&mut self) {
        loop {
            if self.phase.is_terminal() {
                return;
            }
            if self.current_idx >= self.turn_order.len() {
                self.end_round();
                continue;
            }

            let id = self.turn_order[self.current_idx];
            let Some(idx) = self.unit_index(id) else {
                self.advance_cursor();
                continue;
            };
            if !self.units[idx].is_alive() {
                self.advance_cursor();
                continue;
            }

            let ticks = self.units[idx].start_turn();
            if !self.process_status_ticks(idx, &ticks).await {
                // Unit died to burn before acting
                if self.check_end_conditions().await {
                    return;
                }
                self.advance_cursor();
                continue;
            }

            let faction = self.units[idx].faction;
            match faction {
                Faction::Enemy => {
                    self.phase = CombatPhase::EnemyTurn;
                    self.ui.set_phase_display("Enemy Turn");
                    sleep(ENEMY_THINK_DELAY).await;
                    // Enemies act even when stunned flagged them as acted;
                    // stun only suppresses allied and player actions.
                    self.run_ai_turn(id).await;
                    if self.phase.is_terminal() {
                        return;
                    }
                    self.advance_cursor();
                }
                Faction::Ally => {
                    self.phase = CombatPhase::AllyTurn;
                    self.ui.set_phase_display("Ally Turn");
                    if self.units[idx].has_acted {
                        sleep(STUN_SKIP_DELAY).await;
                    } else {
                        sleep(ALLY_THINK_DELAY).await;
                        self.run_ai_turn(id).await;
                    }
                    if self.phase.is_terminal() {
                        return;
                    }
                    self.advance_cursor();
                }
                Faction::Player => {
                    self.phase = CombatPhase::PlayerSelect;
                    self.ui.set_phase_display("Your Turn");
                    if self.units[idx].has_acted {
                        sleep(STUN_SKIP_DELAY).await;
                        self.advance_cursor();
                        continue;
                    }
                    self.view.set_unit_glow(Some(id));
                    return;
                }
            }
        }
    }

    /// Report status ticks; returns false if the unit died to burn
    async fn process_status_ticks(&mut self, idx: usize, ticks: &[StatusTick]) -> bool {
        for tick in ticks {
            let name = self.units[idx].name.clone();
            match tick {
                StatusTick::Stunned => {
                    self.ui.show_message(&format!("{name} is stunned!"));
                }
                StatusTick::Burned { damage, .. } => {
                    let pos = self.units[idx].pos;
                    self.ui.show_message(&format!("{name} takes {damage} burn damage!"));
                    self.ui.show_floating_number(pos, &format!("{damage}"));
                    self.ui.update_unit_panel(&self.units[idx]);
                    if !self.units[idx].is_alive() {
                        self.ui.show_message(&format!("{name} burned away!"));
                        self.remove_from_field(idx);
                        sleep(STATUS_SKIP_DELAY).await;
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Reset per-turn UI state and step the initiative cursor
    fn advance_cursor(&mut self) {
        self.view.set_unit_glow(None);
        self.view.clear_highlights();
        self.ui.hide_action_menu();
        self.ui.hide_skill_menu();
        self.selected = None;
        self.movable_tiles.clear();
        self.targetable_tiles.clear();
        self.pending_skill = None;
        self.current_idx += 1;
    }

    fn end_round(&mut self) {
        self.turn_number += 1;
        self.ui.set_turn_number(self.turn_number);
        self.build_turn_order();
        if self.turn_order.is_empty() {
            self.phase = CombatPhase::Done;
        }
    }

    // ---- player input ----

    /// Player clicked a tile; routed by phase, ignored outside input phases
    pub async fn handle_tile_click(&mut self, pos: Position) {
        if !self.phase.accepts_input() || !self.grid.in_bounds(pos) {
            return;
        }
        match self.phase {
            CombatPhase::PlayerSelect => {
                if let Some(id) = self.grid.occupant(pos) {
                    if Some(id) == self.current_unit_id() {
                        self.select_unit(id);
                    } else if let Some(idx) = self.unit_index(id) {
                        // Inspecting other units never changes phase
                        self.ui.show_unit_panel(&self.units[idx]);
                    }
                }
            }
            CombatPhase::PlayerMove => {
                let own_pos = self.selected.and_then(|id| self.unit(id)).map(|u| u.pos);
                if own_pos == Some(pos) {
                    // Standing still: straight to the action menu
                    self.view.clear_highlights();
                    self.movable_tiles.clear();
                    self.enter_action_phase();
                } else if self.movable_tiles.contains(&pos) {
                    self.do_move(pos).await;
                } else {
                    self.cancel_select();
                }
            }
            CombatPhase::PlayerAction => {
                // Actions are menu-driven; stray clicks are ignored
            }
            CombatPhase::PlayerTarget => {
                // Clicks outside the precomputed target set are ignored
                if self.targetable_tiles.contains(&pos) {
                    if let (Some(attacker), Some(target)) =
                        (self.current_unit_id(), self.grid.occupant(pos))
                    {
                        let skill = self.pending_skill;
                        self.view.clear_highlights();
                        self.targetable_tiles.clear();
                        self.do_attack(attacker, target, skill).await;
                        if self.phase.is_terminal() {
                            return;
                        }
                        self.advance_cursor();
                        self.run_from_current().await;
                    }
                }
            }
            _ => {}
        }
    }

    fn select_unit(&mut self, id: UnitId) {
        let Some(idx) = self.unit_index(id) else {
            return;
        };
        let pos = self.units[idx].pos;
        let range = self.units[idx].move_range;
        self.ui.show_unit_panel(&self.units[idx]);
        self.selected = Some(id);
        if self.units[idx].has_moved {
            // Movement is spent; straight to the action menu
            self.enter_action_phase();
            return;
        }
        self.phase = CombatPhase::PlayerMove;
        self.movable_tiles = reachable_tiles(&self.grid, pos, range)
            .into_iter()
            .filter(|p| self.grid.occupant(*p).is_none())
            .collect();
        self.view.highlight_tiles(&self.movable_tiles, HighlightKind::Move);
    }

    fn cancel_select(&mut self) {
        self.view.clear_highlights();
        self.movable_tiles.clear();
        self.selected = None;
        self.phase = CombatPhase::PlayerSelect;
    }

    fn enter_action_phase(&mut self) {
        self.phase = CombatPhase::PlayerAction;
        if let Some(idx) = self.current_unit_id().and_then(|id| self.unit_index(id)) {
            self.ui.show_action_menu(&self.units[idx]);
        }
    }

    async fn do_move(&mut self, dest: Position) {
        let Some(id) = self.selected else {
            return;
        };
        let Some(idx) = self.unit_index(id) else {
            return;
        };
        let from = self.units[idx].pos;
        let Some(path) = find_path(&self.grid, from, dest) else {
            return;
        };

        self.phase = CombatPhase::Executing;
        self.view.clear_highlights();
        self.movable_tiles.clear();

        self.grid.set_occupant(from, None);
        self.grid.set_occupant(dest, Some(id));
        self.units[idx].pos = dest;
        self.units[idx].has_moved = true;

        self.view.move_unit(id, &path).await;
        self.enter_action_phase();
    }

    /// Enter targeting for a skill (or None for the basic attack)
    ///
    /// Stays in the action phase with a message when nothing is in range.
    pub fn begin_targeting(&mut self, skill: Option<&'static Skill>) {
        if self.phase != CombatPhase::PlayerAction {
            return;
        }
        let Some(unit) = self.current_unit_id().and_then(|id| self.unit(id)) else {
            return;
        };
        let (origin, faction) = (unit.pos, unit.faction);
        let range = skill.map_or(unit.attack_range, |s| s.range);
        let heals = skill.is_some_and(|s| s.kind.targets_allies());

        self.targetable_tiles = tiles_in_range(&self.grid, origin, range)
            .into_iter()
            .filter(|p| {
                self.grid
                    .occupant(*p)
                    .and_then(|id| self.unit(id))
                    .is_some_and(|u| u.is_alive() && faction.is_hostile_to(u.faction) != heals)
            })
            .collect();

        if self.targetable_tiles.is_empty() {
            self.ui.show_message("No valid targets in range!");
            return;
        }

        self.pending_skill = skill;
        self.phase = CombatPhase::PlayerTarget;
        self.ui.hide_action_menu();
        self.ui.hide_skill_menu();
        let kind = if heals { HighlightKind::Heal } else { HighlightKind::Attack };
        self.view.highlight_tiles(&self.targetable_tiles, kind);
    }

    /// Back out of targeting to the action menu
    pub fn cancel_targeting(&mut self) {
        if self.phase != CombatPhase::PlayerTarget {
            return;
        }
        self.view.clear_highlights();
        self.targetable_tiles.clear();
        self.pending_skill = None;
        self.enter_action_phase();
    }

    /// Show the current unit's skill list; valid only from the action menu
    pub fn open_skill_menu(&mut self) {
        if self.phase != CombatPhase::PlayerAction {
            return;
        }
        if let Some(idx) = self.current_unit_id().and_then(|id| self.unit_index(id)) {
            let skills = self.units[idx].skills;
            self.ui.show_skill_menu(skills);
        }
    }

    /// End the current player unit's turn without acting
    pub async fn do_wait(&mut self) {
        if !matches!(self.phase, CombatPhase::PlayerMove | CombatPhase::PlayerAction) {
            return;
        }
        if let Some(idx) = self.current_unit_id().and_then(|id| self.unit_index(id)) {
            self.units[idx].has_acted = true;
        }
        self.advance_cursor();
        self.run_from_current().await;
    }

    // ---- resolution ----

    /// Resolve one attack or heal, shared by player and AI turns
    async fn do_attack(&mut self, attacker: UnitId, target: UnitId, skill: Option<&'static Skill>) {
        let (Some(a_idx), Some(t_idx)) = (self.unit_index(attacker), self.unit_index(target))
        else {
            return;
        };
        self.phase = CombatPhase::Executing;

        let terrain = self.grid.terrain_at(self.units[t_idx].pos);
        let outcome = resolve_action(
            &self.units[a_idx],
            &self.units[t_idx],
            terrain,
            skill,
            &mut *self.dice,
        );
        let target_pos = self.units[t_idx].pos;
        let is_heal = skill.is_some_and(|s| s.kind == SkillKind::Heal);
        tracing::debug!(
            attacker = %self.units[a_idx].name,
            target = %self.units[t_idx].name,
            roll = outcome.roll,
            damage = outcome.damage,
            crit = outcome.crit,
            miss = outcome.miss,
            "action resolved"
        );

        self.view.play_hit_effect(target_pos, outcome.crit).await;

        if is_heal {
            let healed = self.units[t_idx].heal_hp(outcome.damage);
            self.ui.show_floating_number(target_pos, &format!("+{healed}"));
            self.ui.update_unit_panel(&self.units[t_idx]);
        } else if outcome.miss {
            self.ui.show_floating_number(target_pos, "Miss!");
        } else {
            self.units[t_idx].take_damage(outcome.damage);
            let text = if outcome.crit {
                format!("{}!", outcome.damage)
            } else {
                outcome.damage.to_string()
            };
            self.ui.show_floating_number(target_pos, &text);
            self.ui.update_unit_panel(&self.units[t_idx]);

            if self.units[t_idx].is_alive() {
                if let Some((kind, turns)) = skill.and_then(|s| s.applied_status()) {
                    self.units[t_idx].apply_status(kind, turns);
                }
            } else {
                self.handle_death(t_idx);
            }
        }

        self.units[a_idx].has_acted = true;
        self.check_end_conditions().await;
    }

    /// Announce a kill and free the tile; EXP is tallied once at victory
    fn handle_death(&mut self, victim_idx: usize) {
        let victim_name = self.units[victim_idx].name.clone();
        self.ui.show_message(&format!("{victim_name} is defeated!"));
        self.remove_from_field(victim_idx);
    }

    /// Take a dead unit off the board; its tile frees up immediately
    fn remove_from_field(&mut self, idx: usize) {
        let id = self.units[idx].id;
        let pos = self.units[idx].pos;
        self.grid.set_occupant(pos, None);
        self.view.remove_unit(id);
    }

    async fn run_ai_turn(&mut self, id: UnitId) {
        let Some(idx) = self.unit_index(id) else {
            return;
        };
        let plan = ai::plan_move(&self.grid, &self.units, &self.units[idx]);
        tracing::debug!(unit = %self.units[idx].name, ?plan, "ai turn");

        match plan {
            AiMove::Attack { target } => {
                sleep(AI_ATTACK_DELAY).await;
                let skill = ai::pick_attack_skill(&self.units[idx], &mut *self.dice);
                self.do_attack(id, target, skill).await;
            }
            AiMove::MoveToward { dest, target } => {
                let from = self.units[idx].pos;
                let Some(path) = find_path(&self.grid, from, dest) else {
                    return;
                };
                self.grid.set_occupant(from, None);
                self.grid.set_occupant(dest, Some(id));
                self.units[idx].pos = dest;
                self.units[idx].has_moved = true;
                self.view.move_unit(id, &path).await;

                let in_range = self
                    .unit(target)
                    .is_some_and(|t| t.is_alive() && dest.manhattan(t.pos) <= self.units[idx].attack_range);
                if in_range {
                    sleep(POST_MOVE_ATTACK_DELAY).await;
                    let skill = ai::pick_attack_skill(&self.units[idx], &mut *self.dice);
                    self.do_attack(id, target, skill).await;
                }
            }
            AiMove::Pass => {}
        }
    }

    /// Check victory and defeat; returns true if the battle ended
    async fn check_end_conditions(&mut self) -> bool {
        if self.phase.is_terminal() {
            return true;
        }
        let enemies_alive = self.units.iter().any(|u| u.faction == Faction::Enemy && u.is_alive());
        let player_alive = self.units.iter().any(|u| u.faction == Faction::Player && u.is_alive());

        if !enemies_alive {
            let total: u32 = self
                .units
                .iter()
                .filter(|u| u.faction == Faction::Enemy)
                .map(Unit::exp_reward)
                .sum();
            self.ui.show_message("Victory!");
            tracing::info!(exp = total, turns = self.turn_number, "battle won");
            sleep(END_OF_BATTLE_DELAY).await;
            self.phase = CombatPhase::Done;
            (self.on_victory)(total);
            return true;
        }
        if !player_alive {
            self.ui.show_message("Defeat...");
            tracing::info!(turns = self.turn_number, "battle lost");
            sleep(END_OF_BATTLE_DELAY).await;
            self.phase = CombatPhase::Done;
            (self.on_defeat)();
            return true;
        }
        false
    }
}
