//! Contract price reconciliation.

use crate::domain::foundation::Money;

use super::Variation;

/// Derives the current contract price from scratch.
///
/// Only approved variations count. Credits reduce the total with no floor.
/// The sum is exact; a total beyond [`Money::MAX_ABS_CENTS`] saturates.
pub fn reconcile_contract_price(contract_price: Money, variations: &[Variation]) -> Money {
    let approved: i128 = variations
        .iter()
        .filter(|v| v.status().counts_toward_price())
        .map(|v| i128::from(v.cost().cents()))
        .sum();
    Money::saturating_from_total(i128::from(contract_price.cents()) + approved)
}
