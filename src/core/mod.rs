//! Core types, errors, and configuration

pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{GridfallError, Result};
pub use types::{Position, UnitId};
