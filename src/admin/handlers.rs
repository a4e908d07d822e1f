use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::offers::{MatcherStatsSnapshot, Offer};

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
    pub resolver: &'static str,
    pub offers: usize,
    pub stats: MatcherStatsSnapshot,
}

/// One registered offer with its position in match order.
#[derive(Debug, Serialize)]
pub struct OfferListing {
    pub position: usize,
    #[serde(flatten)]
    pub offer: Offer,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        uptime_secs: state.started_at.elapsed().as_secs(),
        resolver: state.matcher.resolver_name(),
        offers: state.matcher.registry().len(),
        stats: state.matcher.stats(),
    })
}

pub async fn list_offers(State(state): State<AppState>) -> Json<Vec<OfferListing>> {
    let snapshot = state.matcher.registry().snapshot();
    let listings = snapshot
        .iter()
        .enumerate()
        .map(|(position, offer)| OfferListing {
            position,
            offer: Offer::clone(offer),
        })
        .collect();
    Json(listings)
}
