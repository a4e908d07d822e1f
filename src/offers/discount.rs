//! Discount arithmetic.
//!
//! Results are never clamped at zero: a flat discount larger than the cart
//! yields a negative value. Products are taken in i128 and the final value
//! saturates to the i64 range.

use crate::offers::types::{Offer, OfferType};

/// Apply one discount to `cart_value`.
///
/// Percentage discounts subtract `cart_value * offer_value / 100`, truncated
/// toward zero.
pub fn apply_discount(offer_type: OfferType, offer_value: i64, cart_value: i64) -> i64 {
    match offer_type {
        OfferType::Flat => cart_value.saturating_sub(offer_value),
        OfferType::Percentage => {
            let discount = i128::from(cart_value) * i128::from(offer_value) / 100;
            saturate(i128::from(cart_value) - discount)
        }
    }
}

fn saturate(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

impl Offer {
    /// The cart value after this offer.
    pub fn apply(&self, cart_value: i64) -> i64 {
        apply_discount(self.offer_type, self.offer_value, cart_value)
    }
}
