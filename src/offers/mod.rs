//! Offer store and matcher.
//!
//! # Data Flow
//! ```text
//! Write path:
//!     OfferRequest → types.rs (parse offer_type) → registry.rs (append)
//!
//! Compute path:
//!     matcher.rs (resolve segment, first match in insertion order)
//!     → discount.rs (flat or percentage, unclamped)
//! ```
//!
//! # Design Decisions
//! - Append-only: no update or delete
//! - First match wins; at most one offer applied per request
//! - Segment failures degrade to "no match", never to an error

pub mod discount;
pub mod matcher;
pub mod registry;
pub mod types;

pub use discount::apply_discount;
pub use matcher::{CartOutcome, MatcherStatsSnapshot, OfferMatcher};
pub use registry::{OfferRegistry, OfferSnapshot};
pub use types::{Offer, OfferError, OfferRequest, OfferType};
