//! The [`BarrierIndex`]: a rectangle of [`BarrierStack`]s kept in sync with
//! moving, stackable obstacles.
use bevy::log::warn;
use bevy::math::{IVec2, Vec2};
use ndarray::Array2;
use slab::Slab;

use crate::{
    barrier::{Barrier, BarrierId, BarrierStack},
    grid::{GridError, TraversalGrid},
    nav::Movelist,
    Layer,
};

/// Maps every grid coordinate in a bounded rectangle to a [`BarrierStack`].
///
/// Stacks are created eagerly for the whole rectangle at construction, so
/// lookups during a search never allocate. The game loop owns the index,
/// mutates it once per tick (`add` / `remove` / `move_to` / `refresh_moved`)
/// and then runs its searches against the frozen state.
pub struct BarrierIndex {
    tile_size: f32,
    /// Tile coordinate of the lower-left covered cell.
    left: i32,
    bottom: i32,
    width: u32,
    height: u32,
    stacks: Array2<BarrierStack>,
    barriers: Slab<Barrier>,
}

impl BarrierIndex {
    /// Covers the world-space rectangle `[left, right] x [bottom, top]`,
    /// floored into tile units, both edges inclusive. Every covered cell
    /// starts empty with the `base` fallback code.
    pub fn new(tile_size: f32, left: f32, right: f32, bottom: f32, top: f32, base: Layer) -> Self {
        let left = (left / tile_size).floor() as i32;
        let right = (right / tile_size).floor() as i32;
        let bottom = (bottom / tile_size).floor() as i32;
        let top = (top / tile_size).floor() as i32;

        let width = (right - left + 1).max(0) as u32;
        let height = (top - bottom + 1).max(0) as u32;

        BarrierIndex {
            tile_size,
            left,
            bottom,
            width,
            height,
            stacks: Array2::from_elem((width as usize, height as usize), BarrierStack::new(base)),
            barriers: Slab::new(),
        }
    }

    fn slot(&self, cell: IVec2) -> Option<(usize, usize)> {
        let x = cell.x - self.left;
        let y = cell.y - self.bottom;
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((x as usize, y as usize))
    }

    fn out_of_range(&self, cell: IVec2) -> GridError {
        GridError::OutOfRange {
            x: cell.x - self.left,
            y: cell.y - self.bottom,
            width: self.width,
            height: self.height,
        }
    }

    /// Registers an obstacle and pushes it onto the stack at its cell.
    pub fn add(&mut self, layer: Layer, position: Vec2) -> Result<BarrierId, GridError> {
        let cell = self.to_cell(position);
        let slot = self.slot(cell).ok_or_else(|| self.out_of_range(cell))?;

        let id = BarrierId(self.barriers.insert(Barrier {
            layer,
            position,
            cell,
            moved: false,
        }));
        self.stacks[slot].push(id, layer);
        Ok(id)
    }

    /// Drops a barrier record and pulls it out of whatever stack position it
    /// holds, top or buried. A stale id is a silent no-op: removing an
    /// already-broken layer should never fail.
    pub fn remove(&mut self, id: BarrierId) {
        let Some(barrier) = self.barriers.try_remove(id.0) else {
            return;
        };
        if let Some(slot) = self.slot(barrier.cell) {
            self.stacks[slot].remove(id);
        }
    }

    /// Pops the top barrier at `cell` and drops its record. Returns the
    /// handle that was removed, or `None` if the stack was already empty.
    pub fn remove_at(&mut self, cell: IVec2) -> Option<BarrierId> {
        let slot = self.slot(cell)?;
        let (id, _) = self.stacks[slot].pop_top()?;
        self.barriers.try_remove(id.0);
        Some(id)
    }

    /// Records a new world position and flags the barrier as moved. The
    /// stacks are untouched until [`BarrierIndex::refresh_moved`] runs.
    pub fn set_position(&mut self, id: BarrierId, position: Vec2) {
        if let Some(barrier) = self.barriers.get_mut(id.0) {
            barrier.position = position;
            barrier.moved = true;
        }
    }

    /// Atomically relocates a barrier: removed from its old cell's stack,
    /// pushed at the new one. No stale reference is ever left behind.
    pub fn move_to(&mut self, id: BarrierId, position: Vec2) -> Result<(), GridError> {
        let new_cell = self.to_cell(position);
        let new_slot = self.slot(new_cell).ok_or_else(|| self.out_of_range(new_cell))?;

        let Some((old_cell, layer)) = self.barriers.get(id.0).map(|b| (b.cell, b.layer)) else {
            return Ok(());
        };

        if let Some(old_slot) = self.slot(old_cell) {
            self.stacks[old_slot].remove(id);
        }
        self.stacks[new_slot].push(id, layer);

        if let Some(barrier) = self.barriers.get_mut(id.0) {
            barrier.position = position;
            barrier.cell = new_cell;
            barrier.moved = false;
        }
        Ok(())
    }

    /// Relocates every barrier flagged as moved and clears the flags.
    ///
    /// A barrier whose new position falls outside the covered rectangle is
    /// logged and left where it was; the sweep itself never aborts.
    pub fn refresh_moved(&mut self) {
        let moved: Vec<(BarrierId, Vec2)> = self
            .barriers
            .iter()
            .filter(|(_, barrier)| barrier.moved)
            .map(|(key, barrier)| (BarrierId(key), barrier.position))
            .collect();

        for (id, position) in moved {
            if let Err(err) = self.move_to(id, position) {
                warn!("barrier {id:?} moved outside the index, keeping its old cell: {err}");
                if let Some(barrier) = self.barriers.get_mut(id.0) {
                    barrier.moved = false;
                }
            }
        }
    }

    /// Clears every stack and re-pushes every live barrier at its current
    /// cell. O(cells + barriers).
    pub fn rebuild(&mut self) {
        for stack in self.stacks.iter_mut() {
            stack.clear();
        }

        let placements: Vec<(usize, IVec2, Layer)> = self
            .barriers
            .iter()
            .map(|(key, barrier)| (key, self.to_cell(barrier.position), barrier.layer))
            .collect();

        for (key, cell, layer) in placements {
            if let Some(barrier) = self.barriers.get_mut(key) {
                barrier.cell = cell;
                barrier.moved = false;
            }
            match self.slot(cell) {
                Some(slot) => self.stacks[slot].push(BarrierId(key), layer),
                None => warn!("barrier {key} sits outside the index at cell {cell}, skipping"),
            }
        }
    }

    pub fn barrier(&self, id: BarrierId) -> Option<&Barrier> {
        self.barriers.get(id.0)
    }

    pub fn stack(&self, cell: IVec2) -> Option<&BarrierStack> {
        let slot = self.slot(cell)?;
        Some(&self.stacks[slot])
    }

    /// Number of registered barriers.
    pub fn len(&self) -> usize {
        self.barriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barriers.is_empty()
    }

    /// Tile coordinates of the covered rectangle as `(min, max)`, inclusive.
    pub fn bounds(&self) -> (IVec2, IVec2) {
        (
            IVec2::new(self.left, self.bottom),
            IVec2::new(
                self.left + self.width as i32 - 1,
                self.bottom + self.height as i32 - 1,
            ),
        )
    }

    /// Evaluates the effective layer of `cell` against an allow-set.
    pub fn is_traversable_at(&self, cell: IVec2, movelist: &Movelist) -> bool {
        self.is_traversable(cell, movelist)
    }
}

impl TraversalGrid for BarrierIndex {
    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        self.slot(cell).is_some()
    }

    fn layer_at(&self, cell: IVec2) -> Option<Layer> {
        let slot = self.slot(cell)?;
        Some(self.stacks[slot].effective_layer())
    }
}
