//! AI turn planning for enemy and allied units
//!
//! Planning is pure over the battle state so it can be unit-tested without
//! the engine. The plan is greedy: attack the nearest opponent if in range,
//! otherwise step toward them.

use crate::combat::damage::Dice;
use crate::core::types::{Position, UnitId};
use crate::grid::{reachable_tiles, Grid};
use crate::unit::{Skill, Unit};

/// What an AI unit intends to do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMove {
    /// Attack an opponent already in range
    Attack { target: UnitId },
    /// Step toward an opponent; the engine re-checks range after moving
    MoveToward { dest: Position, target: UnitId },
    Pass,
}

/// Nearest living opponent by Manhattan distance, first encountered on a tie
pub fn nearest_opponent(units: &[Unit], actor: &Unit) -> Option<UnitId> {
    units
        .iter()
        .filter(|u| u.is_alive() && actor.faction.is_hostile_to(u.faction))
        .min_by_key(|u| actor.pos.manhattan(u.pos))
        .map(|u| u.id)
}

/// Pick an attack skill at random; None means a bare basic attack
///
/// A heal coming up is swapped for the first offensive skill so the attack
/// never turns friendly; a unit with nothing offensive attacks bare-handed.
pub fn pick_attack_skill(actor: &Unit, dice: &mut dyn Dice) -> Option<&'static Skill> {
    if actor.skills.is_empty() {
        return None;
    }
    let skill = &actor.skills[dice.index(actor.skills.len())];
    if skill.kind.targets_allies() {
        actor.skills.iter().find(|s| !s.kind.targets_allies())
    } else {
        Some(skill)
    }
}

/// Plan one AI turn
pub fn plan_move(grid: &Grid, units: &[Unit], actor: &Unit) -> AiMove {
    let Some(target_id) = nearest_opponent(units, actor) else {
        return AiMove::Pass;
    };
    let target_pos = match units.iter().find(|u| u.id == target_id) {
        Some(t) => t.pos,
        None => return AiMove::Pass,
    };

    if actor.pos.manhattan(target_pos) <= actor.attack_range {
        return AiMove::Attack { target: target_id };
    }

    // Greedy approach: of the reachable unoccupied tiles, take the one that
    // closes the most distance, even when none actually closes it. First
    // candidate wins ties (BFS order).
    match reachable_tiles(grid, actor.pos, actor.move_range)
        .into_iter()
        .filter(|p| grid.occupant(*p).is_none())
        .min_by_key(|p| p.manhattan(target_pos))
    {
        Some(dest) => AiMove::MoveToward { dest, target: target_id },
        None => AiMove::Pass,
    }
}
