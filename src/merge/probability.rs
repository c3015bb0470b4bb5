use super::types::{Bonus, BASE_SUCCESS_RATES, GAMBLE_RATE_PENALTY, MAX_GAMBLE_LEVEL};

/// Base success rate for upgrading an item currently at `tier`. Tiers past
/// the table clamp to the lowest defined rate.
pub fn base_rate(tier: u8) -> f64 {
    let idx = (tier as usize).min(BASE_SUCCESS_RATES.len() - 1);
    BASE_SUCCESS_RATES[idx]
}

/// Success probability for one attempt, in [0.0, 1.0]. Pure: the roll
/// itself happens in the orchestrator.
///
/// Rate bonuses stack additively on the base rate, then each Push Your
/// Luck level multiplies the result by `1 - GAMBLE_RATE_PENALTY`.
pub fn compute_success_rate(tier: u8, bonuses: &[Bonus], gamble_level: u8) -> f64 {
    let mut rate = base_rate(tier);
    for bonus in bonuses {
        rate += bonus.rate_delta();
    }
    for _ in 0..gamble_level.min(MAX_GAMBLE_LEVEL) {
        rate *= 1.0 - GAMBLE_RATE_PENALTY;
    }
    rate.clamp(0.0, 1.0)
}

/// Tiers gained on a successful attempt: 1, plus 1 per gamble level.
pub fn gamble_tier_jump(gamble_level: u8) -> u8 {
    1 + gamble_level.min(MAX_GAMBLE_LEVEL)
}
