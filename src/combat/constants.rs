//! Combat pacing delays
//!
//! All waits the engine performs between visible steps, in one place so a
//! driver (or a paused-clock test) knows exactly what it is skipping.

use std::time::Duration;

/// Pause before an enemy unit starts acting
pub const ENEMY_THINK_DELAY: Duration = Duration::from_millis(700);
/// Pause before an allied AI unit starts acting
pub const ALLY_THINK_DELAY: Duration = Duration::from_millis(700);
/// Pause between an AI unit finishing its move and attacking
pub const AI_ATTACK_DELAY: Duration = Duration::from_millis(600);
/// Pause between a move animation and an immediate follow-up attack
pub const POST_MOVE_ATTACK_DELAY: Duration = Duration::from_millis(400);
/// Pause when a turn is skipped by a status message
pub const STATUS_SKIP_DELAY: Duration = Duration::from_millis(600);
/// Pause when a stunned unit forfeits its turn
pub const STUN_SKIP_DELAY: Duration = Duration::from_millis(800);
/// Pause before the victory or defeat callback fires
pub const END_OF_BATTLE_DELAY: Duration = Duration::from_millis(800);
