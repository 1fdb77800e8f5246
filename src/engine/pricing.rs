use crate::model::{Minutes, Price, Pricing};

/// Estimated price of `duration` minutes at an hourly rate, rounded half up
/// to the nearest cent.
pub fn estimate_price(pricing: &Pricing, duration: Minutes) -> Price {
    let cents = (pricing.hourly_rate_cents as u128 * duration as u128 + 30) / 60;
    Price {
        amount_cents: u64::try_from(cents).unwrap_or(u64::MAX),
        currency: pricing.currency.clone(),
    }
}
