use super::types::{Bonus, BASE_COSTS, RETRY_COST_FACTOR};

/// Base credit cost for upgrading an item currently at `tier`. Tiers past
/// the table clamp to the highest defined cost.
pub fn base_cost(tier: u8) -> u64 {
    let idx = (tier as usize).min(BASE_COSTS.len() - 1);
    BASE_COSTS[idx]
}

/// Credit cost of one attempt after discounts, floored to whole credits.
///
/// Discounts stack multiplicatively: two 10% discounts give a 0.9 * 0.9 =
/// 0.81 multiplier (19% off), not 20% off.
pub fn compute_cost(tier: u8, bonuses: &[Bonus]) -> u64 {
    discounted(base_cost(tier) as f64, bonuses)
}

/// Cost of retrying a failed attempt: the retry factor applies to the
/// fresh base cost before discounts.
pub fn retry_cost(tier: u8, bonuses: &[Bonus]) -> u64 {
    discounted(base_cost(tier) as f64 * RETRY_COST_FACTOR, bonuses)
}

fn discounted(base: f64, bonuses: &[Bonus]) -> u64 {
    let mut multiplier = 1.0;
    for bonus in bonuses {
        if let Some(fraction) = bonus.discount_fraction() {
            multiplier *= 1.0 - fraction.clamp(0.0, 1.0);
        }
    }
    (base * multiplier).floor().max(0.0) as u64
}
