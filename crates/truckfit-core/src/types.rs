use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shape::Shape;

/// Truck size - each maps to a square floor grid and a base price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TruckSize {
    #[default]
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "XL")]
    ExtraLarge,
}

impl TruckSize {
    /// Every size, smallest first. Escalation always walks this order.
    pub const ALL: [TruckSize; 4] = [
        TruckSize::Small,
        TruckSize::Medium,
        TruckSize::Large,
        TruckSize::ExtraLarge,
    ];

    /// Side length of the floor grid in cells
    pub fn dimension(self) -> usize {
        match self {
            TruckSize::Small => 6,
            TruckSize::Medium => 8,
            TruckSize::Large => 10,
            TruckSize::ExtraLarge => 12,
        }
    }

    /// Floor capacity in blocks (one block per cell)
    pub fn capacity(self) -> u32 {
        let dimension = self.dimension() as u32;
        dimension * dimension
    }

    pub fn base_price(self) -> u64 {
        match self {
            TruckSize::Small => 45_000,
            TruckSize::Medium => 85_000,
            TruckSize::Large => 130_000,
            TruckSize::ExtraLarge => 180_000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TruckSize::Small => "S",
            TruckSize::Medium => "M",
            TruckSize::Large => "L",
            TruckSize::ExtraLarge => "XL",
        }
    }

    /// This size followed by every larger one.
    pub fn and_larger(self) -> impl Iterator<Item = TruckSize> {
        TruckSize::ALL.into_iter().filter(move |size| *size >= self)
    }

    /// Smallest truck whose block capacity covers `blocks`.
    ///
    /// This is only an estimate: the shape check decides whether a load
    /// really fits.
    pub fn smallest_for_blocks(blocks: u32) -> Option<TruckSize> {
        TruckSize::ALL
            .into_iter()
            .find(|size| blocks <= size.capacity())
    }
}

impl fmt::Display for TruckSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TruckSize {
    type Err = PackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(TruckSize::Small),
            "M" => Ok(TruckSize::Medium),
            "L" => Ok(TruckSize::Large),
            "XL" => Ok(TruckSize::ExtraLarge),
            other => Err(PackerError::InvalidInput(format!(
                "Unknown truck size '{}' (expected S, M, L or XL)",
                other
            ))),
        }
    }
}

/// Top-left grid coordinate of a placed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

/// Furniture type from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Informational unit count (50x50cm blocks), used for estimates and pricing only
    pub blocks: u32,
    pub shape: Shape,
}

/// A catalog item instance in the working load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    /// Distinguishes several pieces of the same catalog type
    pub instance_id: String,
    /// Set once the item has been packed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub color: String,
}

impl SelectedItem {
    /// Fixed palette of display colors, cycled by instance sequence number.
    pub const PALETTE: [&'static str; 16] = [
        "#f87171", "#fb923c", "#fbbf24", "#facc15", "#a3e635", "#4ade80", "#34d399", "#2dd4bf",
        "#22d3ee", "#38bdf8", "#60a5fa", "#818cf8", "#a78bfa", "#c084fc", "#e879f9", "#f472b6",
    ];

    /// Mints the `sequence`-th instance of a catalog item, not yet placed.
    pub fn new(item: &CatalogItem, sequence: u32) -> Self {
        let color = Self::PALETTE[sequence as usize % Self::PALETTE.len()];
        Self {
            item: item.clone(),
            instance_id: format!("{}-{}", item.id, sequence),
            position: None,
            color: color.to_string(),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.item.shape
    }
}

/// Outcome of packing one item list into one truck size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitResult {
    pub success: bool,
    /// Every item with its position, in input order. Empty on failure.
    pub placements: Vec<SelectedItem>,
}

impl FitResult {
    pub(crate) fn failed() -> Self {
        Self {
            success: false,
            placements: Vec::new(),
        }
    }
}

/// Error type for packing
#[derive(Debug, thiserror::Error)]
pub enum PackerError {
    #[error("Not enough space for '{item}', not even in the XL truck")]
    CapacityExceeded { item: String },

    #[error("Malformed shape: {0}")]
    MalformedShape(String),

    #[error("Unknown catalog item '{0}'")]
    UnknownItem(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PackerError>;
