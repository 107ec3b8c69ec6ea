//! The dense [`GridMap`] and the [`TraversalGrid`] query both searches run
//! against.
use bevy::math::{IVec2, Vec2};
use ndarray::Array2;
use thiserror::Error;

use crate::{nav::Movelist, Layer};

/// Errors for direct cell access. Coordinates outside the grid are surfaced,
/// never clamped.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfRange {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

/// The traversability query shared by [`crate::astar::astar_path`] and
/// [`crate::flood_fill::area_search`].
///
/// World units (pixels) appear only at this seam: positions are floored into
/// tile coordinates on the way in and multiplied back out, as cell centers,
/// on the way out.
pub trait TraversalGrid {
    /// World units per tile.
    fn tile_size(&self) -> f32;

    /// Number of cells covered, used as the default search iteration cap.
    fn cell_count(&self) -> usize;

    fn in_bounds(&self, cell: IVec2) -> bool;

    /// Effective classification of `cell`, or `None` out of bounds.
    fn layer_at(&self, cell: IVec2) -> Option<Layer>;

    fn is_traversable(&self, cell: IVec2, movelist: &Movelist) -> bool {
        self.layer_at(cell)
            .is_some_and(|layer| movelist.allows(layer))
    }

    /// Floor-divides a world position into a tile coordinate.
    fn to_cell(&self, world: Vec2) -> IVec2 {
        (world / self.tile_size()).floor().as_ivec2()
    }

    /// World position of the center of `cell`.
    fn cell_center(&self, cell: IVec2) -> Vec2 {
        (cell.as_vec2() + 0.5) * self.tile_size()
    }
}

/// A fixed-size 2D grid of movement-classification codes.
///
/// Every cell starts at the `base` code passed to [`GridMap::new`]; mutation
/// goes through bounds-checked setters only.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: u32,
    height: u32,
    tile_size: f32,
    cells: Array2<Layer>,
}

impl GridMap {
    pub fn new(width: u32, height: u32, tile_size: f32, base: Layer) -> Self {
        GridMap {
            width,
            height,
            tile_size,
            cells: Array2::from_elem((width as usize, height as usize), base),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn checked(&self, x: i32, y: i32) -> Result<(usize, usize), GridError> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Err(GridError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((x as usize, y as usize))
    }

    /// Classification code of the cell at `(x, y)`.
    pub fn classify(&self, x: i32, y: i32) -> Result<Layer, GridError> {
        let idx = self.checked(x, y)?;
        Ok(self.cells[idx])
    }

    /// Sets the classification code of the cell at `(x, y)`.
    pub fn set_classification(&mut self, x: i32, y: i32, layer: Layer) -> Result<(), GridError> {
        let idx = self.checked(x, y)?;
        self.cells[idx] = layer;
        Ok(())
    }

    /// Sets the classification of the cell under a world position.
    pub fn set_at_world(&mut self, world: Vec2, layer: Layer) -> Result<(), GridError> {
        let cell = self.to_cell(world);
        self.set_classification(cell.x, cell.y, layer)
    }

    /// Stamps `layer` onto the cell under each world position. Handy for
    /// loading a grid straight from the positions of a sprite list.
    pub fn paint_layer(
        &mut self,
        positions: impl IntoIterator<Item = Vec2>,
        layer: Layer,
    ) -> Result<(), GridError> {
        for position in positions {
            self.set_at_world(position, layer)?;
        }
        Ok(())
    }
}

impl TraversalGrid for GridMap {
    fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    fn layer_at(&self, cell: IVec2) -> Option<Layer> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(self.cells[(cell.x as usize, cell.y as usize)])
    }
}
