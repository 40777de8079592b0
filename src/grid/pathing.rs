//! Breadth-first reachability and path search over the battle grid
//!
//! Movement legality respects terrain obstacles; attack targeting is a pure
//! Manhattan ring query because ranged skills may target over obstacles.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::types::Position;
use crate::grid::Grid;

/// All tiles reachable from `start` in at most `range` cardinal steps
///
/// BFS over terrain passability only - unit occupancy is ignored here and
/// filtered by the caller afterwards. The origin tile is excluded.
pub fn reachable_tiles(grid: &Grid, start: Position, range: i32) -> Vec<Position> {
    let mut visited: HashSet<Position> = HashSet::new();
    let mut queue: VecDeque<(Position, i32)> = VecDeque::new();
    let mut result = Vec::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((pos, steps)) = queue.pop_front() {
        if steps > 0 {
            result.push(pos);
        }
        if steps >= range {
            continue;
        }
        for next in grid.neighbours(pos) {
            if !visited.contains(&next) && grid.is_passable(next) {
                visited.insert(next);
                queue.push_back((next, steps + 1));
            }
        }
    }
    result
}

/// BFS shortest path from `start` to `goal` over passable terrain
///
/// Returns the tile sequence excluding `start`, or None if unreachable.
pub fn find_path(grid: &Grid, start: Position, goal: Position) -> Option<Vec<Position>> {
    let mut visited: HashSet<Position> = HashSet::new();
    let mut prev: HashMap<Position, Position> = HashMap::new();
    let mut queue: VecDeque<Position> = VecDeque::new();

    visited.insert(start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        if pos == goal {
            let mut path = Vec::new();
            let mut cur = goal;
            while cur != start {
                path.push(cur);
                cur = prev[&cur];
            }
            path.reverse();
            return Some(path);
        }
        for next in grid.neighbours(pos) {
            if !visited.contains(&next) && grid.is_passable(next) {
                visited.insert(next);
                prev.insert(next, pos);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Tiles at Manhattan distance 1..=range from `origin`, terrain ignored
///
/// Row-major iteration order is part of the contract: AI tie-breaks take the
/// first candidate encountered.
pub fn tiles_in_range(grid: &Grid, origin: Position, range: i32) -> Vec<Position> {
    let mut result = Vec::new();
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let pos = Position::new(row, col);
            let dist = origin.manhattan(pos);
            if dist >= 1 && dist <= range {
                result.push(pos);
            }
        }
    }
    result
}
