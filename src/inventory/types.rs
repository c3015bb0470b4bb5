use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest reachable item tier.
pub const MAX_TIER: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Building,
    Decoration,
    Relic,
    LuckCharm,
    BlankParchment,
    Material,
}

impl ItemKind {
    /// Returns the display name for this item kind.
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Building => "Building",
            ItemKind::Decoration => "Decoration",
            ItemKind::Relic => "Relic",
            ItemKind::LuckCharm => "Luck Charm",
            ItemKind::BlankParchment => "Blank Parchment",
            ItemKind::Material => "Material",
        }
    }

    /// Stackable kinds share one inventory entry and count via `quantity`.
    pub fn is_stackable(&self) -> bool {
        matches!(
            self,
            ItemKind::LuckCharm | ItemKind::BlankParchment | ItemKind::Material
        )
    }
}

/// A single inventory entry. The id is stable for the item's whole life:
/// merges change `tier` but never the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub kind: ItemKind,
    pub tier: u8,
    pub quantity: u32,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self::with_tier(kind, 0)
    }

    pub fn with_tier(kind: ItemKind, tier: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            tier: tier.min(MAX_TIER),
            quantity: 1,
        }
    }
}
