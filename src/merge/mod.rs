//! The Lucky Merge subsystem: success-rate and cost math, the attempt
//! orchestrator, and failure recovery.

pub mod cost;
pub mod orchestrator;
pub mod probability;
pub mod recovery;
pub mod types;

pub use cost::*;
pub use orchestrator::*;
pub use probability::*;
pub use types::*;
