//! In-memory offer store.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::offers::types::Offer;
use crate::segment::Segment;

/// An immutable, ordered view of all offers at one point in time.
pub type OfferSnapshot = Arc<Vec<Arc<Offer>>>;

/// Append-only, insertion-ordered offer collection.
///
/// Writers publish a fresh vector with the new offer appended; readers scan
/// whichever vector was current when they loaded it, so a reader never sees a
/// half-registered offer and never blocks a writer.
pub struct OfferRegistry {
    offers: ArcSwap<Vec<Arc<Offer>>>,
}

impl OfferRegistry {
    pub fn new() -> Self {
        Self {
            offers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Append an offer. Returns the number of offers held afterwards.
    pub fn register(&self, offer: Offer) -> usize {
        let offer = Arc::new(offer);
        let mut size = 0;

        self.offers.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(offer.clone());
            size = next.len();
            next
        });

        tracing::debug!(
            restaurant_id = offer.restaurant_id,
            offer_type = offer.offer_type.as_str(),
            offer_value = offer.offer_value,
            segments = ?offer.customer_segments,
            registry_size = size,
            "Offer registered"
        );
        metrics::record_offer_registered(size);

        size
    }

    /// The first registered offer for `restaurant_id` that targets `segment`.
    pub fn find_first(&self, restaurant_id: i64, segment: &Segment) -> Option<Arc<Offer>> {
        self.offers
            .load()
            .iter()
            .find(|offer| offer.matches(restaurant_id, segment))
            .cloned()
    }

    pub fn snapshot(&self) -> OfferSnapshot {
        self.offers.load_full()
    }

    pub fn len(&self) -> usize {
        self.offers.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for OfferRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::types::OfferType;

    fn offer(restaurant_id: i64, value: i64, segments: &[&str]) -> Offer {
        Offer {
            restaurant_id,
            offer_type: OfferType::Flat,
            offer_value: value,
            customer_segments: segments.iter().map(|s| Segment::from(*s)).collect(),
        }
    }

    #[test]
    fn test_register_appends_in_order() {
        let registry = OfferRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.register(offer(1, 10, &["p1"])), 1);
        assert_eq!(registry.register(offer(2, 20, &["p2"])), 2);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].restaurant_id, 1);
        assert_eq!(snapshot[1].restaurant_id, 2);
    }

    #[test]
    fn test_first_match_wins() {
        let registry = OfferRegistry::new();
        registry.register(offer(5, 10, &["p1"]));
        registry.register(offer(5, 99, &["p1", "p2"]));

        let p1 = registry.find_first(5, &Segment::from("p1")).unwrap();
        assert_eq!(p1.offer_value, 10);

        let p2 = registry.find_first(5, &Segment::from("p2")).unwrap();
        assert_eq!(p2.offer_value, 99);

        assert!(registry.find_first(5, &Segment::from("p3")).is_none());
        assert!(registry.find_first(6, &Segment::from("p1")).is_none());
    }

    #[test]
    fn test_snapshot_is_stable_across_later_writes() {
        let registry = OfferRegistry::new();
        registry.register(offer(1, 10, &["p1"]));

        let before = registry.snapshot();
        registry.register(offer(1, 20, &["p1"]));

        assert_eq!(before.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_registration_loses_nothing() {
        let registry = Arc::new(OfferRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        registry.register(offer(t, i, &["p1"]));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 400);
        // Per-writer order is preserved.
        for t in 0..8 {
            let values: Vec<i64> = registry
                .snapshot()
                .iter()
                .filter(|o| o.restaurant_id == t)
                .map(|o| o.offer_value)
                .collect();
            assert_eq!(values, (0..50).collect::<Vec<_>>());
        }
    }
}
