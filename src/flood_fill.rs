//! Bounded flood-fill reachability probe.
use std::collections::VecDeque;

use bevy::log::warn;
use bevy::math::Vec2;
use rustc_hash::FxHashSet;

use crate::{
    grid::TraversalGrid,
    nav::Movelist,
    neighbor::{NeighborBuf, Neighborhood},
    timed,
};

/// Counts the grid cells reachable from `start` before `max_iterations`
/// cells have been expanded.
///
/// Same bounds and movelist admission as [`crate::astar::astar_path`], but
/// no costs and no path: this is a connectivity probe ("how much of the map
/// can I reach from here"). Expansion is FIFO, so on an unchanged map the
/// count, and even the visitation order, is reproducible.
///
/// The cap is deliberately an argument rather than a constant; callers probe
/// with very different budgets (a door check might use 100, a region check
/// 500).
pub fn area_search<N: Neighborhood, M: TraversalGrid>(
    neighborhood: &N,
    map: &M,
    start: Vec2,
    movelist: &Movelist,
    max_iterations: usize,
) -> usize {
    timed!("area_search", {
        if movelist.is_empty() {
            warn!("area_search called with an empty movelist; only the start cell is reachable");
        }

        let start_cell = map.to_cell(start);
        if !map.in_bounds(start_cell) {
            return 0;
        }

        let mut open = VecDeque::from([start_cell]);
        let mut seen = FxHashSet::default();
        seen.insert(start_cell);

        let mut neighbors = NeighborBuf::new();
        let mut expanded = 0usize;

        while let Some(current) = open.pop_front() {
            if expanded >= max_iterations {
                break;
            }
            expanded += 1;

            neighborhood.neighbors(map, current, &mut neighbors);
            for &neighbor in neighbors.iter() {
                if !map.is_traversable(neighbor, movelist) {
                    continue;
                }
                if seen.insert(neighbor) {
                    open.push_back(neighbor);
                }
            }
        }

        expanded
    })
}
