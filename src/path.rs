//! The waypoint [`Path`] and the [`PathResult`] it arrives in.
use std::collections::VecDeque;

use bevy::math::Vec2;

use crate::MovementCost;

/// An ordered sequence of world-space waypoints, each the center of a grid
/// cell, plus the total step cost of walking them.
#[derive(Debug, Clone)]
pub struct Path {
    path: VecDeque<Vec2>,
    cost: MovementCost,
}

impl Path {
    pub fn new(path: Vec<Vec2>, cost: MovementCost) -> Self {
        Path {
            path: path.into_iter().collect(),
            cost,
        }
    }

    /// The waypoints as a slice.
    pub fn path(&self) -> &[Vec2] {
        self.path.as_slices().0
    }

    /// Total movement cost, in tenths of a world unit.
    pub fn cost(&self) -> MovementCost {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Removes and returns the next waypoint.
    pub fn pop(&mut self) -> Option<Vec2> {
        self.path.pop_front()
    }

    /// The next waypoint, left in place.
    pub fn next(&self) -> Option<Vec2> {
        self.path.front().copied()
    }

    pub fn contains(&self, waypoint: Vec2) -> bool {
        self.path.contains(&waypoint)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl IntoIterator for Path {
    type Item = Vec2;
    type IntoIter = std::collections::vec_deque::IntoIter<Vec2>;

    fn into_iter(self) -> Self::IntoIter {
        self.path.into_iter()
    }
}

/// Outcome of a path search.
///
/// "No path" is not an error, but it is two different facts: the frontier
/// genuinely ran dry, or the iteration budget ran out first with the answer
/// still unknown. Callers that retry with a bigger budget need to tell the
/// two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum PathResult {
    Found(Path),
    /// The search exhausted every reachable cell without touching the goal.
    Unreachable,
    /// The iteration cap was hit before the frontier emptied.
    BudgetExceeded,
}

impl PathResult {
    pub fn is_found(&self) -> bool {
        matches!(self, PathResult::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            PathResult::Found(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            PathResult::Found(path) => Some(path),
            _ => None,
        }
    }
}
