//! Offer matching and cart computation.
//!
//! # Flow
//! ```text
//! (restaurant_id, cart_value, user_id)
//!     → SegmentResolver::resolve(user_id)
//!         → on error: WARN + fallback counter, segment = None
//!     → OfferRegistry::find_first(restaurant_id, segment)
//!     → Offer::apply(cart_value), or cart_value unchanged
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::observability::metrics;
use crate::offers::registry::OfferRegistry;
use crate::offers::types::Offer;
use crate::segment::{Segment, SegmentResolver};

/// Result of one cart computation.
#[derive(Debug, Clone)]
pub struct CartOutcome {
    /// Cart value after at most one discount.
    pub cart_value: i64,
    /// Segment the user resolved to, if resolution succeeded.
    pub segment: Option<Segment>,
    /// The offer that was applied, if any.
    pub offer: Option<Arc<Offer>>,
}

impl CartOutcome {
    pub fn applied(&self) -> bool {
        self.offer.is_some()
    }
}

/// Running counters for the admin API.
#[derive(Debug, Default)]
pub struct MatcherStats {
    computations: AtomicU64,
    applied: AtomicU64,
    segment_fallbacks: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatcherStatsSnapshot {
    pub computations: u64,
    pub applied: u64,
    pub segment_fallbacks: u64,
}

impl MatcherStats {
    pub fn snapshot(&self) -> MatcherStatsSnapshot {
        MatcherStatsSnapshot {
            computations: self.computations.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            segment_fallbacks: self.segment_fallbacks.load(Ordering::Relaxed),
        }
    }
}

/// Finds the offer for a request and applies it.
pub struct OfferMatcher {
    registry: Arc<OfferRegistry>,
    resolver: Arc<dyn SegmentResolver>,
    stats: MatcherStats,
}

impl OfferMatcher {
    pub fn new(registry: Arc<OfferRegistry>, resolver: Arc<dyn SegmentResolver>) -> Self {
        Self {
            registry,
            resolver,
            stats: MatcherStats::default(),
        }
    }

    pub fn registry(&self) -> &Arc<OfferRegistry> {
        &self.registry
    }

    pub fn resolver_name(&self) -> &'static str {
        self.resolver.name()
    }

    pub fn stats(&self) -> MatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Compute the cart value for `user_id` at `restaurant_id`.
    ///
    /// Never fails. If the segment cannot be resolved, no offer matches and
    /// the cart value comes back unchanged.
    pub async fn compute(&self, restaurant_id: i64, cart_value: i64, user_id: i64) -> CartOutcome {
        self.stats.computations.fetch_add(1, Ordering::Relaxed);

        let segment = self.resolve(user_id).await;
        let offer = segment
            .as_ref()
            .and_then(|segment| self.registry.find_first(restaurant_id, segment));

        let outcome = match offer {
            Some(offer) => {
                let discounted = offer.apply(cart_value);
                tracing::info!(
                    restaurant_id,
                    user_id,
                    segment = ?segment.as_ref().map(Segment::as_str),
                    offer_type = offer.offer_type.as_str(),
                    offer_value = offer.offer_value,
                    cart_value,
                    discounted,
                    "Offer applied"
                );
                CartOutcome {
                    cart_value: discounted,
                    segment,
                    offer: Some(offer),
                }
            }
            None => {
                tracing::debug!(
                    restaurant_id,
                    user_id,
                    segment = ?segment.as_ref().map(Segment::as_str),
                    cart_value,
                    "No matching offer"
                );
                CartOutcome {
                    cart_value,
                    segment,
                    offer: None,
                }
            }
        };

        if outcome.applied() {
            self.stats.applied.fetch_add(1, Ordering::Relaxed);
            metrics::record_computation("applied");
        } else {
            metrics::record_computation("unmatched");
        }

        outcome
    }

    async fn resolve(&self, user_id: i64) -> Option<Segment> {
        let start = Instant::now();
        let result = self.resolver.resolve(user_id).await;
        metrics::record_segment_resolution(self.resolver.name(), start);

        match result {
            Ok(segment) => Some(segment),
            Err(e) => {
                self.stats.segment_fallbacks.fetch_add(1, Ordering::Relaxed);
                metrics::record_segment_fallback(e.reason());
                tracing::warn!(
                    user_id,
                    resolver = self.resolver.name(),
                    error = %e,
                    "Segment resolution failed, continuing without a segment"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::types::OfferType;
    use crate::segment::{LocalSegmentResolver, SegmentError, SegmentResult};
    use async_trait::async_trait;

    struct FailingResolver;

    #[async_trait]
    impl SegmentResolver for FailingResolver {
        async fn resolve(&self, _user_id: i64) -> SegmentResult<Segment> {
            Err(SegmentError::Timeout(500))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    /// Resolves every user to the same segment.
    struct FixedResolver(&'static str);

    #[async_trait]
    impl SegmentResolver for FixedResolver {
        async fn resolve(&self, _user_id: i64) -> SegmentResult<Segment> {
            Ok(Segment::from(self.0))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn offer(restaurant_id: i64, offer_type: OfferType, value: i64, segments: &[&str]) -> Offer {
        Offer {
            restaurant_id,
            offer_type,
            offer_value: value,
            customer_segments: segments.iter().map(|s| Segment::from(*s)).collect(),
        }
    }

    fn local_matcher() -> OfferMatcher {
        OfferMatcher::new(Arc::new(OfferRegistry::new()), Arc::new(LocalSegmentResolver))
    }

    #[tokio::test]
    async fn test_reference_scenarios() {
        let matcher = local_matcher();
        let registry = matcher.registry().clone();
        registry.register(offer(1, OfferType::Flat, 10, &["p1"]));
        registry.register(offer(2, OfferType::Percentage, 10, &["p2"]));
        registry.register(offer(3, OfferType::Flat, 50, &["p1"]));
        registry.register(offer(6, OfferType::Flat, 250, &["p3"]));
        registry.register(offer(8, OfferType::Flat, 10, &["p1"]));

        assert_eq!(matcher.compute(1, 200, 1).await.cart_value, 190);
        assert_eq!(matcher.compute(2, 200, 2).await.cart_value, 180);
        assert_eq!(matcher.compute(3, 200, 2).await.cart_value, 200);
        assert_eq!(matcher.compute(6, 200, 3).await.cart_value, -50);
        assert_eq!(matcher.compute(999, 200, 1).await.cart_value, 200);
        assert_eq!(matcher.compute(8, 0, 1).await.cart_value, -10);
    }

    #[tokio::test]
    async fn test_first_registered_offer_wins() {
        let matcher = local_matcher();
        matcher.registry().register(offer(5, OfferType::Flat, 20, &["p1"]));
        matcher.registry().register(offer(5, OfferType::Percentage, 50, &["p1"]));

        let outcome = matcher.compute(5, 200, 1).await;
        assert_eq!(outcome.cart_value, 180);
        assert_eq!(outcome.offer.unwrap().offer_type, OfferType::Flat);
    }

    #[tokio::test]
    async fn test_outcome_reports_segment_and_offer() {
        let matcher = local_matcher();
        matcher.registry().register(offer(4, OfferType::Flat, 30, &["p1", "p2"]));

        let hit = matcher.compute(4, 200, 2).await;
        assert!(hit.applied());
        assert_eq!(hit.segment, Some(Segment::from("p2")));

        let miss = matcher.compute(4, 200, 3).await;
        assert!(!miss.applied());
        assert_eq!(miss.segment, Some(Segment::from("p3")));
        assert_eq!(miss.cart_value, 200);

        let stats = matcher.stats();
        assert_eq!(stats.computations, 2);
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.segment_fallbacks, 0);
    }

    #[tokio::test]
    async fn test_resolver_failure_falls_back_to_no_match() {
        let registry = Arc::new(OfferRegistry::new());
        registry.register(offer(1, OfferType::Flat, 10, &["p1", "p2", "p3"]));
        let matcher = OfferMatcher::new(registry, Arc::new(FailingResolver));

        let outcome = matcher.compute(1, 200, 1).await;
        assert_eq!(outcome.cart_value, 200);
        assert!(outcome.segment.is_none());
        assert!(outcome.offer.is_none());
        assert_eq!(matcher.stats().segment_fallbacks, 1);
    }

    #[tokio::test]
    async fn test_uses_injected_resolver() {
        let registry = Arc::new(OfferRegistry::new());
        registry.register(offer(7, OfferType::Percentage, 25, &["gold"]));
        let matcher = OfferMatcher::new(registry, Arc::new(FixedResolver("gold")));

        assert_eq!(matcher.compute(7, 100, 1).await.cart_value, 75);
        assert_eq!(matcher.compute(7, 1000, 2).await.cart_value, 750);
        assert_eq!(matcher.resolver_name(), "fixed");
    }

    #[tokio::test]
    async fn test_compute_during_concurrent_registration() {
        let matcher = Arc::new(local_matcher());
        matcher.registry().register(offer(1, OfferType::Flat, 10, &["p1"]));

        let writer = {
            let matcher = matcher.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    matcher.registry().register(offer(1, OfferType::Flat, 1000 + i, &["p1"]));
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let matcher = matcher.clone();
                tokio::spawn(async move {
                    for _ in 0..200 {
                        assert_eq!(matcher.compute(1, 200, 1).await.cart_value, 190);
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
        assert_eq!(matcher.registry().len(), 201);
    }
}
