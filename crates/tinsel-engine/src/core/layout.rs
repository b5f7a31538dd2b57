use glam::Vec2;

use crate::api::types::NodeId;
use crate::core::scene::Scene;

/// Cell arrangement for [`grid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell: Vec2,
    /// Center each node in its cell instead of aligning it to the cell's corner.
    pub centered: bool,
    pub offset: Vec2,
}

impl GridLayout {
    pub fn new(columns: u32, rows: u32, cell: Vec2) -> Self {
        Self {
            columns,
            rows,
            cell,
            centered: false,
            offset: Vec2::ZERO,
        }
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Position of a node of `size` in the given cell.
    pub fn cell_position(&self, column: u32, row: u32, size: Vec2) -> Vec2 {
        let corner = Vec2::new(column as f32 * self.cell.x, row as f32 * self.cell.y);
        if self.centered {
            corner + self.cell * 0.5 - size * 0.5 + self.offset
        } else {
            corner + self.offset
        }
    }
}

/// Build a grid of nodes. `factory` runs once per cell in row-major order and
/// returns the node for that cell. Returns a group holding every cell.
pub fn grid(
    scene: &mut Scene,
    layout: GridLayout,
    mut factory: impl FnMut(&mut Scene) -> NodeId,
) -> NodeId {
    let container = scene.group(&[]);
    for index in 0..layout.cell_count() {
        let column = index % layout.columns;
        let row = index / layout.columns;

        let cell = factory(scene);
        let pos = layout.cell_position(column, row, scene.size(cell));
        if let Some(node) = scene.get_mut(cell) {
            node.pos = pos;
        }
        if let Err(err) = scene.add_child(container, cell) {
            log::warn!("grid cell {} skipped: {}", index, err);
        }
    }
    container
}
