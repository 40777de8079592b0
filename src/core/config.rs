//! Battle configuration with documented constants
//!
//! Values that drivers are expected to tune live here; combat pacing
//! constants live in `combat::constants`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::Result;
use crate::unit::{Background, Class, Race};

/// Configuration for a single battle session
///
/// Loadable from TOML by the demo driver; all fields have sensible defaults
/// so an empty file (or no file at all) yields a playable battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Stage number, drives map-config eligibility and enemy scaling
    ///
    /// Stage 1 always has at least one eligible map configuration; higher
    /// stages unlock harsher palettes and larger enemy teams.
    pub stage: u32,

    /// RNG seed for stage generation and combat dice
    ///
    /// None = seed from entropy. A fixed seed reproduces the same terrain
    /// but not the same battle: player input timing is still external.
    pub seed: Option<u64>,

    /// Hero identity
    pub hero_name: String,
    pub hero_race: Race,
    pub hero_class: Class,
    pub hero_background: Option<Background>,

    /// Level for AI-controlled allies spawned from presets
    pub ally_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stage: 1,
            seed: None,
            hero_name: "Hero".to_string(),
            hero_race: Race::Human,
            hero_class: Class::Warrior,
            hero_background: None,
            ally_level: 1,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&text)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.stage == 0 {
            return Err("stage numbers start at 1".into());
        }
        if self.ally_level == 0 {
            return Err("ally_level must be at least 1".into());
        }
        if self.hero_name.trim().is_empty() {
            return Err("hero_name must not be empty".into());
        }
        Ok(())
    }
}
