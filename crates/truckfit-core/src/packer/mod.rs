use crate::types::*;

mod grid;
mod load;
#[cfg(test)]
mod tests;

pub use grid::{Cell, Grid};
pub use load::LoadState;

/// Packs `items` onto the floor of a `size` truck, first-fit.
///
/// Items are placed in the given order, each at the first free spot found by
/// scanning rows top to bottom and columns left to right. There is no
/// rotation and no backtracking: if any item finds no spot, the whole attempt
/// fails and nothing is returned.
pub fn fit_items_in_truck(items: &[SelectedItem], size: TruckSize) -> FitResult {
    let dimension = size.dimension();
    let mut grid = Grid::new(dimension);
    let mut placements = Vec::with_capacity(items.len());

    for item in items {
        let Some(position) = find_first_fit(&grid, item) else {
            return FitResult::failed();
        };

        grid.place(item.shape(), position.x, position.y, &item.instance_id);
        placements.push(SelectedItem {
            position: Some(position),
            ..item.clone()
        });
    }

    FitResult {
        success: true,
        placements,
    }
}

/// First origin in row-major order where the item fits, if any.
fn find_first_fit(grid: &Grid, item: &SelectedItem) -> Option<Position> {
    let dimension = grid.dimension();
    (0..dimension)
        .flat_map(|y| (0..dimension).map(move |x| Position { x, y }))
        .find(|position| grid.can_place(item.shape(), position.x, position.y))
}
