//! Failure recovery tests: retry, claim, salvage, and resolve-once safety.

use lucky_merge::inventory::{InventoryStore, Item, ItemKind};
use lucky_merge::merge::{
    LuckyMerge, MergeError, MergeEvent, MergeOutcome, RecoveryAction, Resolution,
};
use rand::RngCore;
use uuid::Uuid;

struct FixedRoll(u64);

impl RngCore for FixedRoll {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }
    fn next_u64(&mut self) -> u64 {
        self.0
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

fn always_succeed() -> FixedRoll {
    FixedRoll(0)
}

fn always_fail() -> FixedRoll {
    FixedRoll(u64::MAX)
}

/// Runs one forced-failure attempt on a tier-5 Building and returns the
/// session plus ids and cost. Tier 5: cost 90, rate 0.60.
fn parked_failure(credits: u64) -> (LuckyMerge, Uuid, Uuid, u64) {
    let mut store = InventoryStore::new();
    let item_id = store.insert(Item::with_tier(ItemKind::Building, 5));
    store.deposit(credits);
    let mut session = LuckyMerge::new(store);
    let outcome = session
        .attempt_merge(item_id, &[], 0, &mut always_fail())
        .unwrap();
    let MergeOutcome::Failed {
        attempt_id,
        cost_paid,
        ..
    } = outcome
    else {
        panic!("expected a failed attempt");
    };
    (session, item_id, attempt_id, cost_paid)
}

// =========================================================================
// Claim
// =========================================================================

#[test]
fn test_claim_refunds_fixed_fraction() {
    let (mut session, item_id, attempt_id, cost_paid) = parked_failure(1000);
    assert_eq!(cost_paid, 90);
    assert_eq!(session.store().credits(), 910);

    let resolution = session
        .resolve_failure(attempt_id, RecoveryAction::Claim, &mut always_succeed())
        .unwrap();
    // 40% of the 90 paid: 36 back.
    assert_eq!(resolution, Resolution::Claimed { refund: 36 });
    assert_eq!(session.store().credits(), 946);
    assert_eq!(session.store().get(&item_id).unwrap().tier, 5);

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, MergeEvent::CreditsRefunded { amount: 36 })));
}

#[test]
fn test_claim_twice_fails_already_resolved() {
    let (mut session, _, attempt_id, _) = parked_failure(1000);
    session
        .resolve_failure(attempt_id, RecoveryAction::Claim, &mut always_succeed())
        .unwrap();
    let err = session
        .resolve_failure(attempt_id, RecoveryAction::Claim, &mut always_succeed())
        .unwrap_err();
    assert_eq!(err, MergeError::AlreadyResolved(attempt_id));
}

#[test]
fn test_item_free_for_new_attempts_after_claim() {
    let (mut session, item_id, attempt_id, _) = parked_failure(1000);
    session
        .resolve_failure(attempt_id, RecoveryAction::Claim, &mut always_succeed())
        .unwrap();
    let outcome = session
        .attempt_merge(item_id, &[], 0, &mut always_succeed())
        .unwrap();
    assert!(matches!(outcome, MergeOutcome::Succeeded { new_tier: 6, .. }));
}

// =========================================================================
// Salvage
// =========================================================================

#[test]
fn test_salvage_destroys_item_and_credits_materials() {
    let (mut session, item_id, attempt_id, _) = parked_failure(1000);
    let resolution = session
        .resolve_failure(attempt_id, RecoveryAction::Salvage, &mut always_succeed())
        .unwrap();
    // Tier 5 before the attempt: 6 materials at 15 credits each.
    assert_eq!(
        resolution,
        Resolution::Salvaged {
            item_id,
            materials_value: 90,
        }
    );
    assert!(session.store().get(&item_id).is_none());
    assert_eq!(session.store().credits(), 910 + 90);
    assert_eq!(session.store().count(ItemKind::Material), 6);

    let events = session.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, MergeEvent::ItemSalvaged { materials_value: 90, .. })));
}

#[test]
fn test_salvage_destroys_exactly_once() {
    let (mut session, _, attempt_id, _) = parked_failure(1000);
    session
        .resolve_failure(attempt_id, RecoveryAction::Salvage, &mut always_succeed())
        .unwrap();
    let err = session
        .resolve_failure(attempt_id, RecoveryAction::Salvage, &mut always_succeed())
        .unwrap_err();
    assert_eq!(err, MergeError::AlreadyResolved(attempt_id));
    // No double credit, no extra materials.
    assert_eq!(session.store().credits(), 1000);
    assert_eq!(session.store().count(ItemKind::Material), 6);
}

// =========================================================================
// Retry
// =========================================================================

#[test]
fn test_retry_success_charges_retry_cost_and_advances() {
    let (mut session, item_id, attempt_id, _) = parked_failure(1000);
    let resolution = session
        .resolve_failure(attempt_id, RecoveryAction::Retry, &mut always_succeed())
        .unwrap();
    assert_eq!(
        resolution,
        Resolution::Retried(MergeOutcome::Succeeded {
            item_id,
            new_tier: 6,
            cost_paid: 45,
        })
    );
    // 1000 - 90 (first attempt) - 45 (retry at half cost).
    assert_eq!(session.store().credits(), 865);
    assert_eq!(session.store().get(&item_id).unwrap().tier, 6);
}

#[test]
fn test_retry_failure_parks_a_new_attempt() {
    let (mut session, _, attempt_id, _) = parked_failure(1000);
    let resolution = session
        .resolve_failure(attempt_id, RecoveryAction::Retry, &mut always_fail())
        .unwrap();
    let Resolution::Retried(MergeOutcome::Failed {
        attempt_id: retry_attempt_id,
        cost_paid,
        ..
    }) = resolution
    else {
        panic!("expected the retry itself to fail");
    };
    assert_ne!(retry_attempt_id, attempt_id);
    assert_eq!(cost_paid, 45);

    // The original attempt is spent; the new one is live.
    let err = session
        .resolve_failure(attempt_id, RecoveryAction::Claim, &mut always_succeed())
        .unwrap_err();
    assert_eq!(err, MergeError::AlreadyResolved(attempt_id));
    let resolution = session
        .resolve_failure(retry_attempt_id, RecoveryAction::Claim, &mut always_succeed())
        .unwrap();
    // 40% of the 45 retry cost.
    assert_eq!(resolution, Resolution::Claimed { refund: 18 });
}

#[test]
fn test_retry_without_credits_leaves_attempt_pending() {
    // 90 credits: the first attempt drains the balance to zero, so the
    // 45-credit retry cannot be charged.
    let (mut session, _, attempt_id, _) = parked_failure(90);
    assert_eq!(session.store().credits(), 0);
    let err = session
        .resolve_failure(attempt_id, RecoveryAction::Retry, &mut always_succeed())
        .unwrap_err();
    assert_eq!(
        err,
        MergeError::InsufficientResources {
            needed: 45,
            available: 0,
        }
    );
    // Still pending: claim remains available.
    assert!(session.pending_attempt(&attempt_id).is_some());
    let resolution = session
        .resolve_failure(attempt_id, RecoveryAction::Claim, &mut always_succeed())
        .unwrap();
    assert_eq!(resolution, Resolution::Claimed { refund: 36 });
}

// =========================================================================
// Resolve-once safety
// =========================================================================

#[test]
fn test_unknown_attempt_id_is_already_resolved() {
    let (mut session, _, _, _) = parked_failure(1000);
    let unknown = Uuid::new_v4();
    let err = session
        .resolve_failure(unknown, RecoveryAction::Claim, &mut always_succeed())
        .unwrap_err();
    assert_eq!(err, MergeError::AlreadyResolved(unknown));
}

#[test]
fn test_stats_track_attempts_across_recovery() {
    let (mut session, _, attempt_id, _) = parked_failure(1000);
    session
        .resolve_failure(attempt_id, RecoveryAction::Retry, &mut always_succeed())
        .unwrap();
    let stats = session.stats();
    assert_eq!(stats.total_attempts, 2);
    assert_eq!(stats.total_failures, 1);
    assert_eq!(stats.total_successes, 1);
    assert_eq!(stats.highest_tier_reached, 6);
}
