use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::inventory::ItemKind;

// --- Balance tables ---
// Indexed by the item's current tier; attempts beyond the table clamp to
// the last entry.

pub const BASE_SUCCESS_RATES: [f64; 11] = [
    0.95, 0.90, 0.85, 0.78, 0.70, // tiers 0-4
    0.60, 0.50, 0.38, // tiers 5-7
    0.25, 0.12, 0.05, // tiers 8-10
];

pub const BASE_COSTS: [u64; 11] = [
    10, 15, 25, 40, 60, // tiers 0-4
    90, 140, 220, // tiers 5-7
    340, 520, 800, // tiers 8-10
];

/// Rate multiplier lost per Push Your Luck level.
pub const GAMBLE_RATE_PENALTY: f64 = 0.25;
pub const MAX_GAMBLE_LEVEL: u8 = 3;

pub const TESLA_COIL_RATE_BONUS: f64 = 0.10;
pub const LUCK_CHARM_RATE_BONUS: f64 = 0.05;

/// Retrying a failed attempt charges this fraction of the fresh cost.
pub const RETRY_COST_FACTOR: f64 = 0.5;
/// Claiming a failed attempt refunds this fraction of the cost paid.
pub const CLAIM_REFUND_FRACTION: f64 = 0.4;
/// Salvage credits per (tier_before + 1).
pub const SALVAGE_VALUE_PER_TIER: u64 = 15;

// --- Bonuses ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerkId {
    TeslaCoil,
}

impl PerkId {
    pub fn name(&self) -> &'static str {
        match self {
            PerkId::TeslaCoil => "Tesla Coil",
        }
    }

    /// Fixed additive success-rate effect of this perk.
    pub fn rate_bonus(&self) -> f64 {
        match self {
            PerkId::TeslaCoil => TESLA_COIL_RATE_BONUS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumableId {
    LuckCharm,
    BlankParchment,
}

impl ConsumableId {
    pub fn name(&self) -> &'static str {
        match self {
            ConsumableId::LuckCharm => "Luck Charm",
            ConsumableId::BlankParchment => "Blank Parchment",
        }
    }

    /// Inventory kind backing this consumable; one unit is burned per use.
    pub fn item_kind(&self) -> ItemKind {
        match self {
            ConsumableId::LuckCharm => ItemKind::LuckCharm,
            ConsumableId::BlankParchment => ItemKind::BlankParchment,
        }
    }

    pub fn rate_bonus(&self) -> f64 {
        match self {
            ConsumableId::LuckCharm => LUCK_CHARM_RATE_BONUS,
            // Parchment protects a failure; it never moves the rate.
            ConsumableId::BlankParchment => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BonusKind {
    Perk(PerkId),
    Consumable(ConsumableId),
    Discount,
}

/// A modifier applied to one attempt. Rate bonuses stack additively on the
/// base rate; discounts stack multiplicatively on cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub kind: BonusKind,
    pub magnitude: f64,
}

impl Bonus {
    pub fn perk(id: PerkId) -> Self {
        Self {
            kind: BonusKind::Perk(id),
            magnitude: id.rate_bonus(),
        }
    }

    pub fn consumable(id: ConsumableId) -> Self {
        Self {
            kind: BonusKind::Consumable(id),
            magnitude: id.rate_bonus(),
        }
    }

    /// A cost discount, e.g. `Bonus::discount(0.10)` for 10% off.
    pub fn discount(fraction: f64) -> Self {
        Self {
            kind: BonusKind::Discount,
            magnitude: fraction,
        }
    }

    /// Additive success-rate contribution of this bonus.
    pub fn rate_delta(&self) -> f64 {
        match self.kind {
            BonusKind::Perk(_) | BonusKind::Consumable(_) => self.magnitude,
            BonusKind::Discount => 0.0,
        }
    }

    /// Cost-discount fraction, if this bonus is a discount.
    pub fn discount_fraction(&self) -> Option<f64> {
        match self.kind {
            BonusKind::Discount => Some(self.magnitude),
            _ => None,
        }
    }

    pub fn is_parchment(&self) -> bool {
        matches!(
            self.kind,
            BonusKind::Consumable(ConsumableId::BlankParchment)
        )
    }
}

// --- Attempt records ---

/// Per-attempt state machine. The pre-charge state is the absence of a
/// record; a record is created once the cost is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    CostCharged,
    RolledSuccess,
    RolledFailure,
    Resolved,
}

/// Ephemeral record of one merge attempt. Kept only while a failure awaits
/// resolution; discarded afterwards.
#[derive(Debug, Clone)]
pub struct MergeAttempt {
    pub id: Uuid,
    pub item_id: Uuid,
    pub tier_before: u8,
    pub bonuses: Vec<Bonus>,
    pub gamble_level: u8,
    pub cost_paid: u64,
    pub rolled: f64,
    pub created_at: DateTime<Utc>,
    pub state: AttemptState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    Succeeded {
        item_id: Uuid,
        new_tier: u8,
        cost_paid: u64,
    },
    /// The roll failed but a Blank Parchment absorbed it: the parchment was
    /// burned, the cost refunded, and the tier left untouched.
    Protected { item_id: Uuid, tier: u8 },
    /// The roll failed; the attempt is parked for `resolve_failure`.
    Failed {
        attempt_id: Uuid,
        item_id: Uuid,
        tier: u8,
        cost_paid: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryAction {
    Retry,
    Claim,
    Salvage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Retried(MergeOutcome),
    Claimed { refund: u64 },
    Salvaged { item_id: Uuid, materials_value: u64 },
}

/// Lifetime counters, in the style of the city hall statistics board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    pub total_attempts: u32,
    pub total_successes: u32,
    pub total_failures: u32,
    pub highest_tier_reached: u8,
}

/// Fire-and-forget notifications for the GUI to map onto sounds and
/// animations. Drained from the orchestrator after each call.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent {
    MergeSucceeded { item_id: Uuid, new_tier: u8 },
    MergeFailed { item_id: Uuid, tier: u8 },
    ParchmentConsumed { item_id: Uuid },
    CreditsRefunded { amount: u64 },
    ItemSalvaged { item_id: Uuid, materials_value: u64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MergeError {
    #[error("insufficient credits: need {needed}, have {available}")]
    InsufficientResources { needed: u64, available: u64 },

    #[error("item {0} not found in inventory")]
    ItemNotFound(Uuid),

    #[error("item {0} already has a pending attempt")]
    ConflictingAttempt(Uuid),

    #[error("attempt {0} is already resolved")]
    AlreadyResolved(Uuid),

    #[error("invalid bonus combination: {0}")]
    InvalidBonusCombination(String),
}
