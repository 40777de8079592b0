//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for a unit in the battle roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

/// Grid coordinate (row, col), row 0 at the top
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another position
    pub fn manhattan(&self, other: Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// The four cardinal neighbours (not bounds-checked)
    pub fn cardinal_neighbours(&self) -> [Position; 4] {
        [
            Position::new(self.row - 1, self.col),
            Position::new(self.row + 1, self.col),
            Position::new(self.row, self.col - 1),
            Position::new(self.row, self.col + 1),
        ]
    }
}
