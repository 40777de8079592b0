//! Gridfall - a turn-based tactical combat resolver for grid RPG battles
//!
//! Battles run on a square tile grid with procedurally generated terrain.
//! Units take initiative-ordered turns: the player's hero is driven by input
//! through the phase machine in [`combat::Combat`], while allies and enemies
//! resolve through the built-in AI. Damage uses a d20 to-hit roll with
//! terrain cover; victories feed an experience and level progression.
//!
//! Rendering is abstracted behind [`combat::BattleView`] and
//! [`combat::BattleUi`], so the engine is equally at home under a real
//! renderer, the bundled demo driver, or a headless test.

pub mod combat;
pub mod core;
pub mod grid;
pub mod unit;
