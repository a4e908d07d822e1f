//! Offer types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::segment::Segment;

/// How an offer changes the cart value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferType {
    /// Subtract a fixed amount.
    #[serde(rename = "FLATX")]
    Flat,
    /// Subtract a percentage of the cart value.
    #[serde(rename = "PERCENTAGE")]
    Percentage,
}

impl OfferType {
    pub const FLAT_WIRE: &'static str = "FLATX";
    pub const PERCENTAGE_WIRE: &'static str = "PERCENTAGE";

    /// Parse the wire spelling.
    ///
    /// With `strict` off, anything that is not a flat offer is a percentage
    /// offer, matching legacy clients that send free-form types.
    pub fn parse(raw: &str, strict: bool) -> Result<Self, OfferError> {
        match raw {
            Self::FLAT_WIRE => Ok(OfferType::Flat),
            Self::PERCENTAGE_WIRE => Ok(OfferType::Percentage),
            _ if !strict => Ok(OfferType::Percentage),
            other => Err(OfferError::UnknownOfferType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OfferType::Flat => Self::FLAT_WIRE,
            OfferType::Percentage => Self::PERCENTAGE_WIRE,
        }
    }
}

/// A registered discount rule scoped to a restaurant and a set of segments.
///
/// Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Offer {
    pub restaurant_id: i64,
    pub offer_type: OfferType,
    pub offer_value: i64,
    pub customer_segments: Vec<Segment>,
}

impl Offer {
    /// Whether this offer targets `restaurant_id` for users in `segment`.
    pub fn matches(&self, restaurant_id: i64, segment: &Segment) -> bool {
        self.restaurant_id == restaurant_id && self.customer_segments.contains(segment)
    }
}

/// Registration payload as sent by clients.
///
/// `offer_type` stays a string here; it becomes an `OfferType` in
/// [`OfferRequest::into_offer`] so strictness can be configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRequest {
    pub restaurant_id: i64,
    pub offer_type: String,
    pub offer_value: i64,
    #[serde(alias = "customer_segment")]
    pub customer_segments: Vec<Segment>,
}

impl OfferRequest {
    pub fn into_offer(self, strict: bool) -> Result<Offer, OfferError> {
        Ok(Offer {
            restaurant_id: self.restaurant_id,
            offer_type: OfferType::parse(&self.offer_type, strict)?,
            offer_value: self.offer_value,
            customer_segments: self.customer_segments,
        })
    }
}

/// Errors raised while accepting an offer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfferError {
    #[error("unknown offer_type '{0}' (expected FLATX or PERCENTAGE)")]
    UnknownOfferType(String),
}
