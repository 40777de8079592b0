//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use gridfall::combat::{BattleUi, Combat, Dice, NullView};
use gridfall::core::types::Position;
use gridfall::grid::Grid;
use gridfall::unit::Unit;

/// Dice that replay a fixed d20 script, then roll 10s forever
///
/// `chance` is pinned at 0.5 (variance +0.5) and `index` always picks the
/// first option, so every outcome is exactly computable.
pub struct FixedDice {
    rolls: VecDeque<u8>,
}

impl FixedDice {
    pub fn new(rolls: &[u8]) -> Self {
        Self { rolls: rolls.iter().copied().collect() }
    }
}

impl Dice for FixedDice {
    fn d20(&mut self) -> u8 {
        self.rolls.pop_front().unwrap_or(10)
    }

    fn chance(&mut self) -> f64 {
        0.5
    }

    fn index(&mut self, _len: usize) -> usize {
        0
    }
}

/// UI that records every message for later assertions
pub struct RecordingUi {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingUi {
    pub fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        (Self { messages: Arc::clone(&messages) }, messages)
    }
}

impl BattleUi for RecordingUi {
    fn show_message(&mut self, text: &str) {
        self.messages.lock().unwrap().push(text.to_string());
    }

    fn show_floating_number(&mut self, _at: Position, _text: &str) {}
    fn show_unit_panel(&mut self, _unit: &Unit) {}
    fn update_unit_panel(&mut self, _unit: &Unit) {}
    fn set_phase_display(&mut self, _text: &str) {}
    fn set_turn_number(&mut self, _turn: u32) {}
    fn update_turn_order(&mut self, _names: &[String], _current: usize) {}
    fn show_action_menu(&mut self, _unit: &Unit) {}
    fn hide_action_menu(&mut self) {}
    fn show_skill_menu(&mut self, _skills: &[gridfall::unit::Skill]) {}
    fn hide_skill_menu(&mut self) {}
}

/// A battle on an all-grass 10x10 grid with scripted dice and recorded
/// messages
pub fn battle(units: Vec<Unit>, rolls: &[u8]) -> (Combat, Arc<Mutex<Vec<String>>>) {
    let (ui, messages) = RecordingUi::new();
    let combat = Combat::new(
        Grid::new(10),
        units,
        Box::new(NullView),
        Box::new(ui),
        Box::new(FixedDice::new(rolls)),
    );
    (combat, messages)
}

/// Every living unit must sit on the tile that claims it, and no tile may
/// reference a dead unit
pub fn assert_occupancy_consistent(combat: &Combat) {
    for unit in combat.units() {
        if unit.is_alive() {
            assert_eq!(
                combat.grid().occupant(unit.pos),
                Some(unit.id),
                "living unit {} not on its tile",
                unit.name
            );
        }
    }
    let size = combat.grid().size();
    for row in 0..size {
        for col in 0..size {
            let pos = Position::new(row, col);
            if let Some(id) = combat.grid().occupant(pos) {
                let unit = combat.unit(id).expect("occupant refers to unknown unit");
                assert!(unit.is_alive(), "tile {pos:?} still holds dead unit {}", unit.name);
                assert_eq!(unit.pos, pos);
            }
        }
    }
}
