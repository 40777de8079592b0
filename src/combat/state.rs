//! Combat phase state machine

use serde::{Deserialize, Serialize};

/// Where the battle currently is in its turn flow
///
/// Player input is only honoured in the `Player*` phases; everything else is
/// engine-driven and input arriving during it is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatPhase {
    /// Battle not yet started
    Idle,
    /// Waiting for the player to select their unit
    PlayerSelect,
    /// Player unit selected, waiting for a move destination
    PlayerMove,
    /// Move spent, waiting for an action choice
    PlayerAction,
    /// Action chosen, waiting for a target tile
    PlayerTarget,
    /// An animation or resolution step is in flight
    Executing,
    AllyTurn,
    EnemyTurn,
    /// Battle over, no further input accepted
    Done,
}

impl CombatPhase {
    /// Phases in which tile clicks and menu choices are honoured
    pub fn accepts_input(&self) -> bool {
        matches!(
            self,
            CombatPhase::PlayerSelect
                | CombatPhase::PlayerMove
                | CombatPhase::PlayerAction
                | CombatPhase::PlayerTarget
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CombatPhase::Done)
    }
}
