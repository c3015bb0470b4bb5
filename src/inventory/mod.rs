//! Inventory: item types, the UUID-keyed store, and the save/load boundary.

pub mod persistence;
pub mod store;
pub mod types;

pub use persistence::*;
pub use store::*;
pub use types::*;
