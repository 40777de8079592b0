//! Presentation seams
//!
//! The engine drives two collaborators: a `BattleView` whose animations it
//! awaits before mutating state, and a fire-and-forget `BattleUi` for panels
//! and messages. Headless drivers and tests plug in the null impls.

use async_trait::async_trait;

use crate::core::types::{Position, UnitId};
use crate::unit::{Skill, Unit};

/// What a highlighted tile overlay means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    /// Reachable movement destination
    Move,
    /// Attackable tile
    Attack,
    /// Healable tile
    Heal,
}

/// Animated battlefield renderer
///
/// `move_unit` and `play_hit_effect` are awaited: state mutation happens only
/// after the animation completes, so the view never renders a stale unit.
#[async_trait]
pub trait BattleView: Send {
    async fn move_unit(&mut self, id: UnitId, path: &[Position]);
    async fn play_hit_effect(&mut self, at: Position, crit: bool);
    fn remove_unit(&mut self, id: UnitId);
    fn highlight_tiles(&mut self, tiles: &[Position], kind: HighlightKind);
    fn clear_highlights(&mut self);
    /// Mark the unit whose turn it is
    fn set_unit_glow(&mut self, id: Option<UnitId>);
}

/// Panels, menus, and combat log
pub trait BattleUi: Send {
    fn show_message(&mut self, text: &str);
    fn show_floating_number(&mut self, at: Position, text: &str);
    fn show_unit_panel(&mut self, unit: &Unit);
    fn update_unit_panel(&mut self, unit: &Unit);
    fn set_phase_display(&mut self, text: &str);
    fn set_turn_number(&mut self, turn: u32);
    fn update_turn_order(&mut self, names: &[String], current: usize);
    fn show_action_menu(&mut self, unit: &Unit);
    fn hide_action_menu(&mut self);
    fn show_skill_menu(&mut self, skills: &[Skill]);
    fn hide_skill_menu(&mut self);
}

/// View that renders nothing; animations complete immediately
#[derive(Debug, Default)]
pub struct NullView;

#[async_trait]
impl BattleView for NullView {
    async fn move_unit(&mut self, _id: UnitId, _path: &[Position]) {}
    async fn play_hit_effect(&mut self, _at: Position, _crit: bool) {}
    fn remove_unit(&mut self, _id: UnitId) {}
    fn highlight_tiles(&mut self, _tiles: &[Position], _kind: HighlightKind) {}
    fn clear_highlights(&mut self) {}
    fn set_unit_glow(&mut self, _id: Option<UnitId>) {}
}

/// UI that swallows everything
#[derive(Debug, Default)]
pub struct NullUi;

impl BattleUi for NullUi {
    fn show_message(&mut self, _text: &str) {}
    fn show_floating_number(&mut self, _at: Position, _text: &str) {}
    fn show_unit_panel(&mut self, _unit: &Unit) {}
    fn update_unit_panel(&mut self, _unit: &Unit) {}
    fn set_phase_display(&mut self, _text: &str) {}
    fn set_turn_number(&mut self, _turn: u32) {}
    fn update_turn_order(&mut self, _names: &[String], _current: usize) {}
    fn show_action_menu(&mut self, _unit: &Unit) {}
    fn hide_action_menu(&mut self) {}
    fn show_skill_menu(&mut self, _skills: &[Skill]) {}
    fn hide_skill_menu(&mut self) {}
}
