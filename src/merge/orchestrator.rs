use std::collections::HashMap;

use chrono::Utc;
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::inventory::{InventoryStore, ItemKind, MAX_TIER};

use super::cost::{compute_cost, retry_cost};
use super::probability::{compute_success_rate, gamble_tier_jump};
use super::types::{
    AttemptState, Bonus, BonusKind, ConsumableId, MergeAttempt, MergeError, MergeEvent,
    MergeOutcome, MergeStats,
};

/// The merge orchestrator. Owns the inventory, the pending failed attempts,
/// and the lifetime stats. One attempt runs `Idle -> CostCharged ->
/// RolledSuccess | RolledFailure -> Resolved`; the charge and the roll are
/// a single logical transaction, so no error path leaves a partial charge.
pub struct LuckyMerge {
    store: InventoryStore,
    pending: HashMap<Uuid, MergeAttempt>,
    stats: MergeStats,
    events: Vec<MergeEvent>,
}

impl LuckyMerge {
    pub fn new(store: InventoryStore) -> Self {
        Self {
            store,
            pending: HashMap::new(),
            stats: MergeStats::default(),
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut InventoryStore {
        &mut self.store
    }

    /// Hands the inventory back for the save boundary.
    pub fn into_store(self) -> InventoryStore {
        self.store
    }

    pub fn stats(&self) -> &MergeStats {
        &self.stats
    }

    pub fn pending_attempt(&self, attempt_id: &Uuid) -> Option<&MergeAttempt> {
        self.pending.get(attempt_id)
    }

    /// Drains queued sound/animation notifications for the GUI.
    pub fn drain_events(&mut self) -> Vec<MergeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rolls one upgrade attempt on `item_id`. On success the item advances
    /// by `1 + gamble_level` tiers (capped at [`MAX_TIER`]). On failure the
    /// tier is untouched and the attempt is parked for
    /// [`resolve_failure`](LuckyMerge::resolve_failure), unless a Blank
    /// Parchment among the bonuses absorbs it.
    pub fn attempt_merge<R: Rng>(
        &mut self,
        item_id: Uuid,
        bonuses: &[Bonus],
        gamble_level: u8,
        rng: &mut R,
    ) -> Result<MergeOutcome, MergeError> {
        self.run_attempt(item_id, bonuses, gamble_level, false, rng)
    }

    pub(super) fn run_attempt<R: Rng>(
        &mut self,
        item_id: Uuid,
        bonuses: &[Bonus],
        gamble_level: u8,
        is_retry: bool,
        rng: &mut R,
    ) -> Result<MergeOutcome, MergeError> {
        let tier = self
            .store
            .get(&item_id)
            .ok_or(MergeError::ItemNotFound(item_id))?
            .tier;
        if self.pending.values().any(|a| a.item_id == item_id) {
            return Err(MergeError::ConflictingAttempt(item_id));
        }
        self.validate_bonuses(bonuses)?;

        let cost = if is_retry {
            retry_cost(tier, bonuses)
        } else {
            compute_cost(tier, bonuses)
        };

        // Last precondition; charging is the first mutation.
        if !self.store.charge(cost) {
            return Err(MergeError::InsufficientResources {
                needed: cost,
                available: self.store.credits(),
            });
        }

        let rate = compute_success_rate(tier, bonuses, gamble_level);
        let rolled = rng.gen::<f64>();
        self.stats.total_attempts += 1;
        self.consume_rate_consumables(bonuses);

        let mut attempt = MergeAttempt {
            id: Uuid::new_v4(),
            item_id,
            tier_before: tier,
            bonuses: bonuses.to_vec(),
            gamble_level,
            cost_paid: cost,
            rolled,
            created_at: Utc::now(),
            state: AttemptState::CostCharged,
        };
        debug!(%item_id, tier, cost, rate, rolled, is_retry, "merge attempt rolled");

        if rolled < rate {
            attempt.state = AttemptState::Resolved;
            let new_tier = tier
                .saturating_add(gamble_tier_jump(gamble_level))
                .min(MAX_TIER);
            if let Some(item) = self.store.get_mut(&item_id) {
                item.tier = new_tier;
            }
            self.stats.total_successes += 1;
            self.stats.highest_tier_reached = self.stats.highest_tier_reached.max(new_tier);
            self.events.push(MergeEvent::MergeSucceeded { item_id, new_tier });
            Ok(MergeOutcome::Succeeded {
                item_id,
                new_tier,
                cost_paid: cost,
            })
        } else if bonuses.iter().any(|b| b.is_parchment()) {
            // Parchment absorbs the failure: burn it once, refund in full.
            attempt.state = AttemptState::Resolved;
            self.store.consume_stack(ItemKind::BlankParchment);
            self.store.deposit(cost);
            self.stats.total_failures += 1;
            self.events.push(MergeEvent::ParchmentConsumed { item_id });
            Ok(MergeOutcome::Protected { item_id, tier })
        } else {
            attempt.state = AttemptState::RolledFailure;
            let attempt_id = attempt.id;
            self.pending.insert(attempt_id, attempt);
            self.stats.total_failures += 1;
            self.events.push(MergeEvent::MergeFailed { item_id, tier });
            Ok(MergeOutcome::Failed {
                attempt_id,
                item_id,
                tier,
                cost_paid: cost,
            })
        }
    }

    pub(super) fn reinstate(&mut self, mut attempt: MergeAttempt) {
        attempt.state = AttemptState::RolledFailure;
        self.pending.insert(attempt.id, attempt);
    }

    pub(super) fn take_pending(&mut self, attempt_id: &Uuid) -> Option<MergeAttempt> {
        self.pending.remove(attempt_id)
    }

    pub(super) fn push_event(&mut self, event: MergeEvent) {
        self.events.push(event);
    }

    /// Luck charms and the like are spent on use, win or lose. Parchments
    /// are only burned when they absorb a failure.
    fn consume_rate_consumables(&mut self, bonuses: &[Bonus]) {
        for bonus in bonuses {
            if let BonusKind::Consumable(id) = bonus.kind {
                if id != ConsumableId::BlankParchment {
                    self.store.consume_stack(id.item_kind());
                }
            }
        }
    }

    fn validate_bonuses(&self, bonuses: &[Bonus]) -> Result<(), MergeError> {
        let mut seen_perks = Vec::new();
        for bonus in bonuses {
            match bonus.kind {
                BonusKind::Perk(id) => {
                    if seen_perks.contains(&id) {
                        return Err(MergeError::InvalidBonusCombination(format!(
                            "duplicate perk: {}",
                            id.name()
                        )));
                    }
                    seen_perks.push(id);
                }
                BonusKind::Discount => {
                    if bonus.magnitude <= 0.0 || bonus.magnitude > 1.0 {
                        return Err(MergeError::InvalidBonusCombination(format!(
                            "discount magnitude {} outside (0, 1]",
                            bonus.magnitude
                        )));
                    }
                }
                BonusKind::Consumable(_) => {}
            }
        }

        let parchments = bonuses.iter().filter(|b| b.is_parchment()).count();
        if parchments > 1 {
            return Err(MergeError::InvalidBonusCombination(
                "at most one Blank Parchment per attempt".to_string(),
            ));
        }

        for id in [ConsumableId::LuckCharm, ConsumableId::BlankParchment] {
            let used = bonuses
                .iter()
                .filter(|b| b.kind == BonusKind::Consumable(id))
                .count() as u32;
            if used > self.store.count(id.item_kind()) {
                return Err(MergeError::InvalidBonusCombination(format!(
                    "{} not available in inventory",
                    id.name()
                )));
            }
        }
        Ok(())
    }
}
