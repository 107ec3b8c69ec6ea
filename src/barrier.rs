//! Per-cell LIFO stacks of layered obstacles.
//!
//! A cell can carry several overlapping obstacles: earth below a floor below
//! a wall. Whatever sits on top is what a traversal sees; break the wall and
//! the floor underneath is exposed, break the floor and the cell falls back
//! to its permanent `base` code.
use bevy::math::{IVec2, Vec2};

use crate::Layer;

/// Handle to a barrier registered with a [`crate::index::BarrierIndex`].
///
/// The index only mirrors game-side obstacles; dropping a record never
/// destroys the obstacle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarrierId(pub(crate) usize);

/// The index's record of one obstacle: its class tag, its world position,
/// the cell derived from that position, and whether the owner has flagged it
/// as moved since the last sync.
#[derive(Debug, Clone)]
pub struct Barrier {
    pub(crate) layer: Layer,
    pub(crate) position: Vec2,
    pub(crate) cell: IVec2,
    pub(crate) moved: bool,
}

impl Barrier {
    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    pub fn moved(&self) -> bool {
        self.moved
    }
}

/// The ordered obstacle stack of one cell.
///
/// The most recently pushed entry is the top and determines the cell's
/// effective classification; popping never underflows past `base`.
#[derive(Debug, Clone)]
pub struct BarrierStack {
    base: Layer,
    top: Option<(BarrierId, Layer)>,
    below: Vec<(BarrierId, Layer)>,
}

impl BarrierStack {
    pub fn new(base: Layer) -> Self {
        BarrierStack {
            base,
            top: None,
            below: Vec::new(),
        }
    }

    /// Pushes a new top entry; the previous top moves onto the rest stack.
    pub fn push(&mut self, id: BarrierId, layer: Layer) {
        if let Some(previous) = self.top.take() {
            self.below.push(previous);
        }
        self.top = Some((id, layer));
    }

    /// Removes and returns the top entry, promoting the next one. `None`
    /// once the stack is empty.
    pub fn pop_top(&mut self) -> Option<(BarrierId, Layer)> {
        let popped = self.top.take()?;
        self.top = self.below.pop();
        Some(popped)
    }

    /// Removes a specific entry by identity wherever it sits. Returns false
    /// (a no-op) when the entry is absent.
    pub fn remove(&mut self, id: BarrierId) -> bool {
        if self.top.is_some_and(|(top, _)| top == id) {
            self.pop_top();
            return true;
        }
        if let Some(at) = self.below.iter().position(|&(entry, _)| entry == id) {
            self.below.remove(at);
            return true;
        }
        false
    }

    /// The top entry's layer, or `base` when the stack is empty.
    pub fn effective_layer(&self) -> Layer {
        self.top.map_or(self.base, |(_, layer)| layer)
    }

    pub fn base(&self) -> Layer {
        self.base
    }

    pub fn top(&self) -> Option<BarrierId> {
        self.top.map(|(id, _)| id)
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Number of stacked entries, the base excluded.
    pub fn len(&self) -> usize {
        self.below.len() + usize::from(self.top.is_some())
    }

    pub fn clear(&mut self) {
        self.top = None;
        self.below.clear();
    }
}
