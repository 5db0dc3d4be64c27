use serde::{Deserialize, Serialize};

use crate::types::TruckSize;

/// Distance rate added on top of the truck base price
pub const PRICE_PER_KM: u64 = 1_500;

/// Price breakdown for one move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub truck_size: TruckSize,
    pub blocks: u32,
    pub distance_km: u32,
    pub base_price: u64,
    pub distance_price: u64,
    pub total_price: u64,
}

impl Quote {
    pub fn new(truck_size: TruckSize, blocks: u32, distance_km: u32) -> Self {
        let base_price = truck_size.base_price();
        let distance_price = u64::from(distance_km) * PRICE_PER_KM;
        Self {
            truck_size,
            blocks,
            distance_km,
            base_price,
            distance_price,
            total_price: base_price + distance_price,
        }
    }
}
