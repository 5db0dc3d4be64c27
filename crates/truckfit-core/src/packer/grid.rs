use crate::shape::Shape;

/// One floor cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    /// Holds the instance id of the item covering it
    Occupied(String),
}

/// Square truck floor, stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    dimension: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates an empty `dimension x dimension` grid.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            cells: vec![Cell::Empty; dimension * dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Cell at column `x`, row `y`, or `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.dimension && y < self.dimension {
            self.cells.get(y * self.dimension + x)
        } else {
            None
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, Cell::Occupied(_)))
            .count()
    }

    /// Checks whether `shape` fits with its top-left corner at `(x, y)`.
    ///
    /// Every occupied shape cell must land inside the grid on an empty cell.
    /// Unoccupied shape cells are ignored.
    pub fn can_place(&self, shape: &Shape, x: usize, y: usize) -> bool {
        shape.occupied_cells().all(|(col, row)| {
            match (x.checked_add(col), y.checked_add(row)) {
                (Some(cx), Some(cy)) => matches!(self.cell(cx, cy), Some(Cell::Empty)),
                _ => false,
            }
        })
    }

    /// Marks the cells covered by `shape` at `(x, y)` with `id`.
    ///
    /// The caller must have checked the spot with [`Grid::can_place`].
    pub fn place(&mut self, shape: &Shape, x: usize, y: usize, id: &str) {
        debug_assert!(self.can_place(shape, x, y));

        for (col, row) in shape.occupied_cells() {
            let index = (y + row) * self.dimension + (x + col);
            self.cells[index] = Cell::Occupied(id.to_string());
        }
    }
}
