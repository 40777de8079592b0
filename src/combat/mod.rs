//! Turn-based combat - phases, dice, AI, and the engine

pub mod ai;
pub mod constants;
pub mod damage;
pub mod engine;
pub mod state;
pub mod view;

pub use ai::{nearest_opponent, pick_attack_skill, plan_move, AiMove};
pub use damage::{resolve_action, ActionOutcome, Dice, RngDice};
pub use engine::Combat;
pub use state::CombatPhase;
pub use view::{BattleUi, BattleView, HighlightKind, NullUi, NullView};
