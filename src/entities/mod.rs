//! Entity type definitions
//!
//! - [`InventoryItem`] - one component record stored at a location
//! - [`ItemDraft`] - field values for an item that is about to be added
//! - [`ItemUpdate`] - partial change to an existing item

pub mod item;

pub use item::{InventoryItem, ItemDraft, ItemUpdate};
