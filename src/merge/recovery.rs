//! Failure recovery: settling a parked failed attempt.

use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use crate::inventory::ItemKind;

use super::orchestrator::LuckyMerge;
use super::types::{
    MergeError, MergeEvent, RecoveryAction, Resolution, CLAIM_REFUND_FRACTION,
    SALVAGE_VALUE_PER_TIER,
};

impl LuckyMerge {
    /// Settles a failed attempt with one of the three terminal actions:
    ///
    /// - `Retry` runs a fresh merge cycle on the same item at the retry
    ///   cost; the new cycle may itself fail and park a new attempt.
    /// - `Claim` forfeits the upgrade for a partial refund of the cost.
    /// - `Salvage` destroys the item for materials scaled by its tier.
    ///
    /// Each attempt resolves at most once; a second call on the same id
    /// fails with [`MergeError::AlreadyResolved`]. A retry whose own
    /// preconditions fail (e.g. not enough credits for the retry cost)
    /// leaves the attempt pending so another action can still be chosen.
    pub fn resolve_failure<R: Rng>(
        &mut self,
        attempt_id: Uuid,
        action: RecoveryAction,
        rng: &mut R,
    ) -> Result<Resolution, MergeError> {
        let attempt = self
            .take_pending(&attempt_id)
            .ok_or(MergeError::AlreadyResolved(attempt_id))?;
        debug!(%attempt_id, item_id = %attempt.item_id, ?action, "resolving failed attempt");

        match action {
            RecoveryAction::Retry => {
                let bonuses = attempt.bonuses.clone();
                match self.run_attempt(attempt.item_id, &bonuses, attempt.gamble_level, true, rng)
                {
                    Ok(outcome) => Ok(Resolution::Retried(outcome)),
                    Err(err) => {
                        self.reinstate(attempt);
                        Err(err)
                    }
                }
            }
            RecoveryAction::Claim => {
                let refund = (attempt.cost_paid as f64 * CLAIM_REFUND_FRACTION).floor() as u64;
                self.store_mut().deposit(refund);
                self.push_event(MergeEvent::CreditsRefunded { amount: refund });
                Ok(Resolution::Claimed { refund })
            }
            RecoveryAction::Salvage => {
                let item_id = attempt.item_id;
                if self.store_mut().remove(&item_id).is_none() {
                    self.reinstate(attempt);
                    return Err(MergeError::ItemNotFound(item_id));
                }
                let materials = u32::from(attempt.tier_before) + 1;
                let materials_value = SALVAGE_VALUE_PER_TIER * u64::from(materials);
                self.store_mut().deposit(materials_value);
                self.store_mut().add_stack(ItemKind::Material, materials);
                self.push_event(MergeEvent::ItemSalvaged {
                    item_id,
                    materials_value,
                });
                Ok(Resolution::Salvaged {
                    item_id,
                    materials_value,
                })
            }
        }
    }
}
