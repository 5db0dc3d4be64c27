use super::*;
use crate::quote::Quote;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The working load of one planning session: the selected items in the order
/// they were added, and the truck they are currently packed into.
///
/// Operations never mutate in place. Each returns the next state, so a
/// rejected change simply leaves the caller holding the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadState {
    #[serde(default)]
    pub items: Vec<SelectedItem>,
    #[serde(default)]
    pub truck_size: TruckSize,
    /// Sequence number for the next instance id
    #[serde(default)]
    pub next_instance: u32,
}

impl LoadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one piece of `item` and repacks everything.
    ///
    /// The search starts at the current truck size (or S for an empty load)
    /// and only moves up, so adding never shrinks the truck.
    pub fn add_item(&self, item: &CatalogItem) -> Result<LoadState> {
        let next_instance = self.next_instance.checked_add(1).ok_or_else(|| {
            PackerError::InvalidInput("Instance counter exhausted, reset the load".to_string())
        })?;

        let mut candidates = self.items.clone();
        candidates.push(SelectedItem::new(item, self.next_instance));

        let start = if self.items.is_empty() {
            TruckSize::Small
        } else {
            self.truck_size
        };

        for size in start.and_larger() {
            let result = fit_items_in_truck(&candidates, size);
            if result.success {
                if size != self.truck_size {
                    debug!(
                        "Truck size {} -> {} after adding '{}'",
                        self.truck_size, size, item.id
                    );
                }
                return Ok(LoadState {
                    items: result.placements,
                    truck_size: size,
                    next_instance,
                });
            }
        }

        warn!(
            "Rejected '{}': {} items do not fit in any truck",
            item.id,
            candidates.len()
        );
        Err(PackerError::CapacityExceeded {
            item: item.id.clone(),
        })
    }

    /// Removes the item at `index` and repacks from the smallest truck up.
    pub fn remove_item(&self, index: usize) -> Result<LoadState> {
        if index >= self.items.len() {
            return Err(PackerError::InvalidInput(format!(
                "No item at index {} (load has {} items)",
                index,
                self.items.len()
            )));
        }

        let mut remaining = self.items.clone();
        let removed = remaining.remove(index);

        for size in TruckSize::ALL {
            let result = fit_items_in_truck(&remaining, size);
            if result.success {
                if size != self.truck_size {
                    debug!(
                        "Truck size {} -> {} after removing '{}'",
                        self.truck_size, size, removed.instance_id
                    );
                }
                return Ok(LoadState {
                    items: result.placements,
                    truck_size: size,
                    next_instance: self.next_instance,
                });
            }
        }

        // First-fit is not monotonic under removal. Keep the old positions,
        // but only if they really are disjoint and inside the truck.
        warn!(
            "Repacking after removing '{}' failed, keeping previous layout",
            removed.instance_id
        );
        let mut grid = Grid::new(self.truck_size.dimension());
        for selected in &remaining {
            let placed = selected
                .position
                .filter(|position| grid.can_place(selected.shape(), position.x, position.y));
            let Some(position) = placed else {
                return Err(PackerError::InvalidInput(format!(
                    "Item '{}' has no valid position in truck {}",
                    selected.instance_id, self.truck_size
                )));
            };
            grid.place(selected.shape(), position.x, position.y, &selected.instance_id);
        }

        Ok(LoadState {
            items: remaining,
            truck_size: self.truck_size,
            next_instance: self.next_instance,
        })
    }

    /// Empty load in the smallest truck.
    pub fn reset(&self) -> LoadState {
        LoadState::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_blocks(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, selected| total.saturating_add(selected.item.blocks))
    }

    /// Price for moving this load over `distance_km`.
    pub fn quote(&self, distance_km: u32) -> Quote {
        Quote::new(self.truck_size, self.total_blocks(), distance_km)
    }

    /// Rebuilds the floor grid from the recorded positions.
    pub fn grid(&self) -> Grid {
        let mut grid = Grid::new(self.truck_size.dimension());
        for selected in &self.items {
            if let Some(position) = selected.position {
                if grid.can_place(selected.shape(), position.x, position.y) {
                    grid.place(selected.shape(), position.x, position.y, &selected.instance_id);
                }
            }
        }
        grid
    }
}
