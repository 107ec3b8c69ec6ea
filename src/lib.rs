//! Grid pathfinding and reachability for tile-based games where a cell can
//! hold a *stack* of overlapping obstacles (a wall over a floor over bare
//! ground) instead of a single static code.
//!
//! The crate has two halves:
//!
//! * The layered obstacle index: [`grid::GridMap`] for plain per-cell codes,
//!   and [`index::BarrierIndex`] + [`barrier::BarrierStack`] for cells whose
//!   effective code is whatever obstacle currently sits on top.
//! * The searches: [`astar::astar_path`] produces world-space waypoint paths,
//!   [`flood_fill::area_search`] probes how many cells are reachable.
//!
//! Both searches run against anything implementing [`grid::TraversalGrid`],
//! so a game loop can mutate its index once per tick and then run any number
//! of searches against the frozen state.
use std::cmp::Ordering;
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

pub mod astar;
pub mod barrier;
pub mod flood_fill;
pub mod grid;
pub mod index;
mod macros;
pub mod nav;
pub mod neighbor;
pub mod path;

pub mod prelude {
    pub use crate::astar::astar_path;
    pub use crate::barrier::{Barrier, BarrierId, BarrierStack};
    pub use crate::flood_fill::area_search;
    pub use crate::grid::{GridError, GridMap, TraversalGrid};
    pub use crate::index::BarrierIndex;
    pub use crate::nav::{Movelist, SearchSettings};
    pub use crate::neighbor::*;
    pub use crate::path::{Path, PathResult};
    pub use crate::{Layer, MovementCost};
}

/// Movement-classification code. Doubles as the obstacle class tag and the
/// key searches match against a [`nav::Movelist`].
pub type Layer = u32;

/// Accumulated path cost. Stored in tenths of a world unit so step costs
/// stay integral: an orthogonal step is 50, a diagonal step 71.
pub type MovementCost = u32;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Binary-heap entry for the A* open set. `BinaryHeap` is a max-heap, so the
/// ordering is reversed on `estimated_cost` to pop the smallest `f` first.
/// Ties prefer the higher `g` (deeper node), then the earliest-discovered
/// visited index, which keeps expansion order fully deterministic.
pub(crate) struct SmallestCostHolder {
    estimated_cost: MovementCost,
    cost: MovementCost,
    index: usize,
}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl Eq for SmallestCostHolder {}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => match self.cost.cmp(&other.cost) {
                Ordering::Equal => other.index.cmp(&self.index),
                s => s,
            },
            s => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn heap_pops_smallest_estimated_cost_first() {
        let mut heap = BinaryHeap::new();
        heap.push(SmallestCostHolder {
            estimated_cost: 300,
            cost: 100,
            index: 0,
        });
        heap.push(SmallestCostHolder {
            estimated_cost: 200,
            cost: 100,
            index: 1,
        });
        heap.push(SmallestCostHolder {
            estimated_cost: 250,
            cost: 100,
            index: 2,
        });

        assert_eq!(heap.pop().map(|h| h.index), Some(1));
        assert_eq!(heap.pop().map(|h| h.index), Some(2));
        assert_eq!(heap.pop().map(|h| h.index), Some(0));
    }

    #[test]
    fn heap_ties_prefer_deeper_then_earliest() {
        let mut heap = BinaryHeap::new();
        // Same f, different g: the deeper node (higher g) pops first.
        heap.push(SmallestCostHolder {
            estimated_cost: 200,
            cost: 50,
            index: 0,
        });
        heap.push(SmallestCostHolder {
            estimated_cost: 200,
            cost: 150,
            index: 1,
        });
        // Same f and g: the earlier-discovered index pops first.
        heap.push(SmallestCostHolder {
            estimated_cost: 200,
            cost: 150,
            index: 2,
        });

        assert_eq!(heap.pop().map(|h| h.index), Some(1));
        assert_eq!(heap.pop().map(|h| h.index), Some(2));
        assert_eq!(heap.pop().map(|h| h.index), Some(0));
    }
}
