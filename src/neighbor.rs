//! Neighborhoods: which cells border a cell, what a step costs, and the
//! matching admissible heuristic.
use std::fmt::Debug;

use bevy::math::IVec2;
use smallvec::SmallVec;

use crate::{grid::TraversalGrid, MovementCost};

/// Cost of an orthogonal step, in tenths of a world unit (5.0 units).
pub const COST_ORTHOGONAL: MovementCost = 50;

/// Cost of a diagonal step (7.1 units = 5 x 1.42). Deliberately cheaper
/// than sqrt(2) times a straight step; a game-feel tuning, not Euclid.
pub const COST_DIAGONAL: MovementCost = 71;

pub const CARDINAL_OFFSETS: [IVec2; 4] = [
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
];

pub const ORDINAL_OFFSETS: [IVec2; 8] = [
    IVec2::new(0, -1),
    IVec2::new(0, 1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, -1),
    IVec2::new(-1, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 1),
];

/// Scratch buffer for neighbor expansion; eight entries cover the widest
/// neighborhood without spilling to the heap.
pub type NeighborBuf = SmallVec<[IVec2; 8]>;

/// The movement model a search runs under.
pub trait Neighborhood: Clone + Debug + Default + Send + Sync {
    fn directions(&self) -> &'static [IVec2];

    /// Fills `out` with the in-bounds neighbors of `pos`. Traversability is
    /// the search's concern, not the neighborhood's.
    fn neighbors(&self, map: &impl TraversalGrid, pos: IVec2, out: &mut NeighborBuf) {
        out.clear();
        for &offset in self.directions() {
            let next = pos + offset;
            if map.in_bounds(next) {
                out.push(next);
            }
        }
    }

    /// Admissible estimate of the remaining cost from `pos` to `target`.
    fn heuristic(&self, pos: IVec2, target: IVec2) -> MovementCost;

    /// Cost of one step between adjacent cells.
    fn step_cost(&self, from: IVec2, to: IVec2) -> MovementCost {
        if from.x == to.x || from.y == to.y {
            COST_ORTHOGONAL
        } else {
            COST_DIAGONAL
        }
    }

    fn is_ordinal(&self) -> bool {
        false
    }
}

/// 4-way movement.
#[derive(Clone, Copy, Debug, Default)]
pub struct CardinalNeighborhood;

impl Neighborhood for CardinalNeighborhood {
    #[inline(always)]
    fn directions(&self) -> &'static [IVec2] {
        &CARDINAL_OFFSETS
    }

    /// Manhattan distance in orthogonal-step units.
    #[inline(always)]
    fn heuristic(&self, pos: IVec2, target: IVec2) -> MovementCost {
        let dx = (pos.x - target.x).unsigned_abs();
        let dy = (pos.y - target.y).unsigned_abs();
        (dx + dy) * COST_ORTHOGONAL
    }
}

/// 8-way movement.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrdinalNeighborhood;

impl Neighborhood for OrdinalNeighborhood {
    #[inline(always)]
    fn directions(&self) -> &'static [IVec2] {
        &ORDINAL_OFFSETS
    }

    /// Chebyshev distance, the reduced form of `dx + dy - min(dx, dy)`,
    /// scaled into step-cost units. Admissible because a diagonal step
    /// (71) costs more than the 50 the estimate charges for it.
    #[inline(always)]
    fn heuristic(&self, pos: IVec2, target: IVec2) -> MovementCost {
        let dx = (pos.x - target.x).unsigned_abs();
        let dy = (pos.y - target.y).unsigned_abs();
        dx.max(dy) * COST_ORTHOGONAL
    }

    #[inline(always)]
    fn is_ordinal(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridMap;

    #[test]
    fn cardinal_neighbors() {
        let map = GridMap::new(3, 3, 10.0, 0);
        let neighborhood = CardinalNeighborhood;
        let mut out = NeighborBuf::new();

        neighborhood.neighbors(&map, IVec2::new(1, 1), &mut out);
        assert_eq!(out.len(), 4);

        neighborhood.neighbors(&map, IVec2::new(0, 0), &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn ordinal_neighbors() {
        let map = GridMap::new(3, 3, 10.0, 0);
        let neighborhood = OrdinalNeighborhood;
        let mut out = NeighborBuf::new();

        neighborhood.neighbors(&map, IVec2::new(1, 1), &mut out);
        assert_eq!(out.len(), 8);

        neighborhood.neighbors(&map, IVec2::new(2, 2), &mut out);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn step_costs() {
        let neighborhood = OrdinalNeighborhood;

        let origin = IVec2::new(1, 1);
        assert_eq!(neighborhood.step_cost(origin, IVec2::new(1, 2)), 50);
        assert_eq!(neighborhood.step_cost(origin, IVec2::new(0, 1)), 50);
        assert_eq!(neighborhood.step_cost(origin, IVec2::new(2, 2)), 71);
        assert_eq!(neighborhood.step_cost(origin, IVec2::new(0, 0)), 71);
    }

    #[test]
    fn heuristics_stay_admissible() {
        let a = IVec2::new(0, 0);
        let b = IVec2::new(3, 4);

        // Cardinal: 7 orthogonal steps are needed and estimated.
        assert_eq!(CardinalNeighborhood.heuristic(a, b), 7 * COST_ORTHOGONAL);

        // Ordinal: 3 diagonals + 1 straight = 263 actual, 200 estimated.
        assert_eq!(OrdinalNeighborhood.heuristic(a, b), 4 * COST_ORTHOGONAL);
        assert!(OrdinalNeighborhood.heuristic(a, b) <= 3 * COST_DIAGONAL + COST_ORTHOGONAL);

        assert_eq!(OrdinalNeighborhood.heuristic(b, b), 0);
    }
}
