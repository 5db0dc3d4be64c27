//! Truck packing engine for household moves.
//!
//! Furniture footprints are packed first-fit onto the square floor grid of a
//! truck, and the smallest truck that holds the whole load is picked. See
//! [`fit_items_in_truck`] for a single attempt and [`LoadState`] for the
//! add/remove/reset policy on top of it.

pub mod catalog;
pub mod packer;
pub mod quote;
pub mod render;
pub mod shape;
pub mod types;

pub use catalog::Catalog;
pub use packer::{fit_items_in_truck, Cell, Grid, LoadState};
pub use quote::{Quote, PRICE_PER_KM};
pub use render::render_svg;
pub use shape::Shape;
pub use types::*;
