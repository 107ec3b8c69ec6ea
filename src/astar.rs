//! The A* waypoint search.
use std::collections::BinaryHeap;

use bevy::log::warn;
use bevy::math::{IVec2, Vec2};
use indexmap::map::Entry::{Occupied, Vacant};

use crate::{
    grid::TraversalGrid,
    nav::SearchSettings,
    neighbor::{NeighborBuf, Neighborhood},
    path::{Path, PathResult},
    timed, FxIndexMap, MovementCost, SmallestCostHolder,
};

/// A* search from `start` to `goal`, both world positions.
///
/// Runs over anything implementing [`TraversalGrid`], so a plain
/// [`crate::grid::GridMap`] and a live [`crate::index::BarrierIndex`] are
/// interchangeable here.
///
/// The search succeeds when it selects a cell whose Euclidean distance to
/// the goal, in world units, is within `settings.min_distance` (0 means the
/// exact goal cell). Each selection counts against the iteration cap, map
/// cell count by default; hitting the cap yields
/// [`PathResult::BudgetExceeded`], an emptied frontier
/// [`PathResult::Unreachable`].
///
/// # Example
/// ```rust,no_run
/// use bevy::math::Vec2;
/// use tilenav::prelude::*;
///
/// let map = GridMap::new(64, 64, 10.0, 0);
/// let settings = SearchSettings::new(Movelist::new().allow(0));
/// let result = astar_path(&OrdinalNeighborhood, &map, Vec2::ZERO, Vec2::new(500.0, 300.0), &settings);
/// ```
pub fn astar_path<N: Neighborhood, M: TraversalGrid>(
    neighborhood: &N,
    map: &M,
    start: Vec2,
    goal: Vec2,
    settings: &SearchSettings,
) -> PathResult {
    timed!("astar_path", {
        if settings.movelist.is_empty() {
            warn!("astar_path called with an empty movelist; no cell is traversable");
            return PathResult::Unreachable;
        }

        let start_cell = map.to_cell(start);
        let goal_cell = map.to_cell(goal);

        if !map.in_bounds(start_cell) || !map.in_bounds(goal_cell) {
            return PathResult::Unreachable;
        }

        let max_iterations = settings.max_iterations.unwrap_or_else(|| map.cell_count());

        let mut to_visit = BinaryHeap::with_capacity(map.cell_count() / 2);
        to_visit.push(SmallestCostHolder {
            estimated_cost: 0,
            cost: 0,
            index: 0,
        });

        let mut visited: FxIndexMap<IVec2, (usize, MovementCost)> = FxIndexMap::default();
        visited.insert(start_cell, (usize::MAX, 0));

        let mut neighbors = NeighborBuf::new();
        let mut iterations = 0usize;

        while let Some(SmallestCostHolder { cost, index, .. }) = to_visit.pop() {
            iterations += 1;
            if iterations > max_iterations {
                return PathResult::BudgetExceeded;
            }

            let (current_cell, current_cost) = {
                let (cell, &(_, best_cost)) = visited.get_index(index).unwrap();
                (*cell, best_cost)
            };

            // Stop radius is measured in world units from the current cell
            // to the goal cell.
            let distance = (current_cell - goal_cell).as_vec2().length() * map.tile_size();
            if current_cell == goal_cell || distance <= settings.min_distance {
                return PathResult::Found(reconstruct(map, &visited, index, current_cost));
            }

            if cost > current_cost {
                // Stale heap entry, the cell was relaxed since it was pushed.
                continue;
            }

            neighborhood.neighbors(map, current_cell, &mut neighbors);

            for &neighbor in neighbors.iter() {
                if !map.is_traversable(neighbor, &settings.movelist) {
                    continue;
                }

                let new_cost = cost + neighborhood.step_cost(current_cell, neighbor);
                let h;
                let n;
                match visited.entry(neighbor) {
                    Vacant(e) => {
                        h = neighborhood.heuristic(neighbor, goal_cell);
                        n = e.index();
                        e.insert((index, new_cost));
                    }
                    Occupied(mut e) => {
                        if e.get().1 > new_cost {
                            h = neighborhood.heuristic(neighbor, goal_cell);
                            n = e.index();
                            e.insert((index, new_cost));
                        } else {
                            continue;
                        }
                    }
                }

                to_visit.push(SmallestCostHolder {
                    estimated_cost: new_cost + h,
                    cost: new_cost,
                    index: n,
                });
            }
        }

        PathResult::Unreachable
    })
}

/// Follows parent links back to the start, then converts the reversed cell
/// chain into cell-center waypoints.
fn reconstruct<M: TraversalGrid>(
    map: &M,
    visited: &FxIndexMap<IVec2, (usize, MovementCost)>,
    index: usize,
    cost: MovementCost,
) -> Path {
    let mut current = index;
    let mut cells = vec![];

    while current != usize::MAX {
        let (cell, &(parent, _)) = visited.get_index(current).unwrap();
        cells.push(*cell);
        current = parent;
    }

    cells.reverse();
    Path::new(cells.into_iter().map(|cell| map.cell_center(cell)).collect(), cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridMap;
    use crate::index::BarrierIndex;
    use crate::nav::Movelist;
    use crate::neighbor::{CardinalNeighborhood, OrdinalNeighborhood};

    fn open_5x5() -> GridMap {
        GridMap::new(5, 5, 10.0, 0)
    }

    fn floor_only() -> SearchSettings {
        SearchSettings::new(Movelist::new().allow(0))
    }

    #[test]
    fn start_equals_goal_is_a_single_waypoint() {
        let map = open_5x5();

        let result = astar_path(
            &OrdinalNeighborhood,
            &map,
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 5.0),
            &floor_only(),
        );

        let path = result.into_path().unwrap();
        assert_eq!(path.path(), &[Vec2::new(5.0, 5.0)]);
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn empty_movelist_is_unreachable() {
        let map = open_5x5();

        let result = astar_path(
            &OrdinalNeighborhood,
            &map,
            Vec2::new(5.0, 5.0),
            Vec2::new(45.0, 45.0),
            &SearchSettings::default(),
        );

        assert_eq!(result, PathResult::Unreachable);
    }

    #[test]
    fn diagonal_run_across_an_open_grid() {
        let map = open_5x5();

        let result = astar_path(
            &OrdinalNeighborhood,
            &map,
            Vec2::new(0.0, 0.0),
            Vec2::new(40.0, 40.0),
            &floor_only(),
        );

        let path = result.into_path().unwrap();
        // Four diagonal steps, 4 x 71 = 284 (28.4 world units).
        assert_eq!(path.len(), 5);
        assert_eq!(path.cost(), 284);

        // No negative-cost shortcut below the admissible estimate.
        let estimate = OrdinalNeighborhood.heuristic(IVec2::new(0, 0), IVec2::new(4, 4));
        assert!(path.cost() >= estimate);

        // Both coordinates rise monotonically.
        for pair in path.path().windows(2) {
            assert!(pair[1].x > pair[0].x);
            assert!(pair[1].y > pair[0].y);
        }
    }

    #[test]
    fn detours_around_an_excluded_cell() {
        let mut map = open_5x5();
        map.set_classification(2, 2, 1).unwrap();

        let result = astar_path(
            &CardinalNeighborhood,
            &map,
            Vec2::new(0.0, 0.0),
            Vec2::new(40.0, 40.0),
            &floor_only(),
        );

        let path = result.into_path().unwrap();
        assert!(!path.contains(Vec2::new(25.0, 25.0)));
        // A monotone staircase around the block still makes it in 8 steps.
        assert_eq!(path.len(), 9);
        assert_eq!(path.cost(), 8 * 50);
    }

    #[test]
    fn fully_blocked_neighborhood_is_unreachable() {
        let mut map = open_5x5();
        // Wall ring around the start cell.
        for (x, y) in [(0, 1), (1, 0), (1, 1)] {
            map.set_classification(x, y, 1).unwrap();
        }

        let result = astar_path(
            &OrdinalNeighborhood,
            &map,
            Vec2::new(0.0, 0.0),
            Vec2::new(40.0, 40.0),
            &floor_only(),
        );

        assert_eq!(result, PathResult::Unreachable);
    }

    #[test]
    fn cardinal_is_never_shorter_than_ordinal() {
        let map = open_5x5();
        let start = Vec2::new(0.0, 0.0);
        let goal = Vec2::new(40.0, 40.0);

        let ordinal = astar_path(&OrdinalNeighborhood, &map, start, goal, &floor_only())
            .into_path()
            .unwrap();
        let cardinal = astar_path(&CardinalNeighborhood, &map, start, goal, &floor_only())
            .into_path()
            .unwrap();

        assert!(cardinal.len() >= ordinal.len());
    }

    #[test]
    fn stop_radius_halts_short_of_the_goal() {
        let map = open_5x5();

        let result = astar_path(
            &CardinalNeighborhood,
            &map,
            Vec2::new(0.0, 0.0),
            Vec2::new(40.0, 40.0),
            &floor_only().min_distance(15.0),
        );

        let path = result.into_path().unwrap();
        let last_cell = map.to_cell(*path.path().last().unwrap());
        let distance = (last_cell - IVec2::new(4, 4)).as_vec2().length() * 10.0;
        assert!(distance <= 15.0);
        assert!(path.len() < 9);
    }

    #[test]
    fn tiny_budget_reports_budget_exceeded() {
        let map = open_5x5();

        let result = astar_path(
            &CardinalNeighborhood,
            &map,
            Vec2::new(0.0, 0.0),
            Vec2::new(40.0, 40.0),
            &floor_only().max_iterations(1),
        );

        assert_eq!(result, PathResult::BudgetExceeded);
    }

    #[test]
    fn barrier_index_blocks_until_the_barrier_breaks() {
        let mut index = BarrierIndex::new(10.0, 0.0, 40.0, 0.0, 40.0, 0);
        index.add(1, Vec2::new(35.0, 35.0)).unwrap();

        let start = Vec2::new(5.0, 5.0);
        let goal = Vec2::new(35.0, 35.0);

        let blocked = astar_path(&OrdinalNeighborhood, &index, start, goal, &floor_only());
        assert_eq!(blocked, PathResult::Unreachable);

        index.remove_at(IVec2::new(3, 3));

        let cleared = astar_path(&OrdinalNeighborhood, &index, start, goal, &floor_only());
        assert!(cleared.is_found());
    }
}
