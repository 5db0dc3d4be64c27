//! Furniture footprints.
//!
//! A [`Shape`] is a rectangular occupancy matrix, `rows[row][col]`. It can
//! only be built through [`Shape::new`] (or deserialized, which goes through
//! the same checks), so the placement code never sees a ragged or empty
//! matrix.

use serde::{Deserialize, Serialize};

use crate::types::{PackerError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Validates a 0/1 matrix.
    ///
    /// Rejects empty or ragged matrices, values other than 0 and 1, and
    /// borders without any occupied cell: the matrix has to be the tight
    /// bounding box of the footprint.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(PackerError::MalformedShape(
                "shape must have at least one row and one column".to_string(),
            ));
        }

        for (index, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(PackerError::MalformedShape(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    width
                )));
            }
            if let Some(value) = row.iter().find(|value| **value > 1) {
                return Err(PackerError::MalformedShape(format!(
                    "row {} contains {}, only 0 and 1 are allowed",
                    index, value
                )));
            }
        }

        let rows: Vec<Vec<bool>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|value| value == 1).collect())
            .collect();
        let shape = Self { rows };

        if shape.cell_count() == 0 {
            return Err(PackerError::MalformedShape(
                "shape has no occupied cell".to_string(),
            ));
        }

        let last_row = shape.height() - 1;
        let last_col = shape.width() - 1;
        let row_used = |row: usize| shape.rows[row].iter().any(|cell| *cell);
        let col_used = |col: usize| shape.rows.iter().any(|row| row[col]);
        if !row_used(0) || !row_used(last_row) || !col_used(0) || !col_used(last_col) {
            return Err(PackerError::MalformedShape(
                "shape has an empty border row or column".to_string(),
            ));
        }

        Ok(shape)
    }

    /// Solid `width x height` rectangle. Both sides must be at least 1.
    pub fn rectangle(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PackerError::MalformedShape(format!(
                "Rectangle must be at least 1x1, got {}x{}",
                width, height
            )));
        }

        Ok(Self {
            rows: vec![vec![true; width]; height],
        })
    }

    /// Builds a shape from a literal that is known to be valid.
    ///
    /// Only used for the built-in catalog, whose shapes are checked by tests.
    pub(crate) fn from_literal(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|value| *value == 1).collect())
                .collect(),
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Occupied cells as `(col, row)` offsets from the top-left corner, row-major.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(col, _)| (col, row))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().flatten().filter(|cell| **cell).count()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Shape {
    type Error = PackerError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Shape::new(rows)
    }
}

impl From<Shape> for Vec<Vec<u8>> {
    fn from(shape: Shape) -> Self {
        shape
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(u8::from).collect())
            .collect()
    }
}
