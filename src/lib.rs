//! Cart offer service library.
//!
//! Registers restaurant offers targeted at user segments and computes the
//! discounted cart value for a user: first matching offer wins, at most one
//! discount per cart.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod offers;
pub mod resilience;
pub mod segment;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use offers::{CartOutcome, Offer, OfferMatcher, OfferRegistry, OfferType};
pub use segment::{resolve_segment, Segment, SegmentResolver};
