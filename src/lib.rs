//! Lucky Merge - gamble/upgrade core for the focus city builder.
//!
//! The GUI earns the player credits for staying focused and spends them
//! here: [`merge::LuckyMerge::attempt_merge`] rolls a tiered upgrade on an
//! inventory item, and [`merge::LuckyMerge::resolve_failure`] settles a
//! failed roll via retry, claim, or salvage. All randomness is injected so
//! callers (and tests) control the dice.

pub mod inventory;
pub mod merge;
