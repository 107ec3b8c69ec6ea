//! The allow-set and the per-call search configuration.
use rustc_hash::FxHashSet;

use crate::Layer;

/// The set of classification codes a search treats as passable.
///
/// An empty movelist means nothing is traversable; searches warn about it
/// instead of silently wandering, since it is a frequent caller mistake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Movelist(FxHashSet<Layer>);

impl Movelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn allow(mut self, layer: Layer) -> Self {
        self.0.insert(layer);
        self
    }

    pub fn insert(&mut self, layer: Layer) {
        self.0.insert(layer);
    }

    pub fn allows(&self, layer: Layer) -> bool {
        self.0.contains(&layer)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<Layer> for Movelist {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        Movelist(iter.into_iter().collect())
    }
}

/// Per-call configuration for [`crate::astar::astar_path`].
///
/// Constructed fresh for every search; nothing here is shared or cached
/// between calls.
///
/// # Example
/// ```rust,no_run
/// use tilenav::prelude::*;
///
/// let settings = SearchSettings::new(Movelist::new().allow(0))
///     .min_distance(15.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchSettings {
    pub(crate) movelist: Movelist,
    pub(crate) min_distance: f32,
    pub(crate) max_iterations: Option<usize>,
}

impl SearchSettings {
    pub fn new(movelist: Movelist) -> Self {
        SearchSettings {
            movelist,
            min_distance: 0.0,
            max_iterations: None,
        }
    }

    /// Stop radius in world units. The search succeeds as soon as it expands
    /// a cell within this distance of the goal; 0 (the default) requires the
    /// exact goal cell.
    pub fn min_distance(mut self, min_distance: f32) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Overrides the iteration cap. Defaults to the map's cell count.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }
}
