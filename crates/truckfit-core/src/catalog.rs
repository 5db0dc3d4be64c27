use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::shape::Shape;
use crate::types::{CatalogItem, PackerError, Result};

/// Built-in furniture: id, display name, blocks, footprint.
const FURNITURE: &[(&str, &str, u32, &[&[u8]])] = &[
    ("box", "Standard Box", 1, &[&[1]]),
    ("nightstand", "Nightstand", 1, &[&[1]]),
    ("microwave", "Oven / Microwave", 1, &[&[1]]),
    ("chair", "Office Chair", 2, &[&[1], &[1]]),
    ("fridge", "Refrigerator", 2, &[&[1], &[1]]),
    ("washer", "Washing Machine", 3, &[&[1, 1], &[1, 0]]),
    ("bike", "Bicycle", 3, &[&[1, 1, 1]]),
    ("tv", "65\" Television", 3, &[&[1, 1, 1]]),
    ("desk", "Desk", 4, &[&[1, 1], &[1, 1]]),
    ("sofa", "3-Seat Sofa", 6, &[&[1, 1, 1], &[1, 1, 1]]),
    ("bed", "King Bed", 8, &[&[1, 1], &[1, 1], &[1, 1], &[1, 1]]),
    (
        "wardrobe",
        "Wardrobe",
        10,
        &[&[1, 1, 1, 1, 1], &[1, 1, 1, 1, 1]],
    ),
    (
        "dining",
        "Dining Set (Table + 6 Chairs)",
        12,
        &[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1], &[1, 1, 1]],
    ),
];

/// On-disk catalog layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    items: Vec<CatalogItem>,
}

/// Immutable furniture reference data, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Validates ids: at least one item, no blank or duplicate ids.
    /// Shapes are already valid by construction.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(PackerError::InvalidInput(
                "Catalog must contain at least one item".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(PackerError::InvalidInput(format!(
                    "Catalog item '{}' has an empty id",
                    item.name
                )));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(PackerError::InvalidInput(format!(
                    "Duplicate catalog id '{}'",
                    item.id
                )));
            }
        }

        Ok(Self { items })
    }

    /// The default furniture catalog.
    pub fn furniture() -> Self {
        let items = FURNITURE
            .iter()
            .map(|(id, name, blocks, rows)| CatalogItem {
                id: id.to_string(),
                name: name.to_string(),
                blocks: *blocks,
                shape: Shape::from_literal(rows),
            })
            .collect();
        Self { items }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| PackerError::InvalidInput(format!("Cannot parse catalog: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| PackerError::InvalidInput(format!("Cannot parse catalog: {}", e)))
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Like [`Catalog::get`], but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&CatalogItem> {
        self.get(id)
            .ok_or_else(|| PackerError::UnknownItem(id.to_string()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::furniture()
    }
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = PackerError;

    fn try_from(file: CatalogFile) -> Result<Self> {
        Catalog::new(file.items)
    }
}

impl From<Catalog> for CatalogFile {
    fn from(catalog: Catalog) -> Self {
        CatalogFile {
            items: catalog.items,
        }
    }
}
