//! Offer and cart endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::offers::OfferRequest;

/// Acknowledgement returned by write endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub response_msg: String,
}

impl ApiResponse {
    pub fn success() -> Self {
        Self {
            response_msg: "success".to_string(),
        }
    }
}

/// Cart computation request. All three fields are required integers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOfferRequest {
    pub cart_value: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOfferResponse {
    pub cart_value: i64,
}

/// `POST /api/v1/offer`
pub async fn register_offer(
    State(state): State<AppState>,
    payload: Result<Json<OfferRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(request) = payload?;
    let offer = request.into_offer(state.config.offers.strict_offer_types)?;

    state.matcher.registry().register(offer);
    Ok(Json(ApiResponse::success()))
}

/// `POST /api/v1/cart/apply_offer`
pub async fn apply_offer(
    State(state): State<AppState>,
    payload: Result<Json<ApplyOfferRequest>, JsonRejection>,
) -> Result<Json<ApplyOfferResponse>, ApiError> {
    let Json(request) = payload?;

    let outcome = state
        .matcher
        .compute(request.restaurant_id, request.cart_value, request.user_id)
        .await;

    Ok(Json(ApplyOfferResponse {
        cart_value: outcome.cart_value,
    }))
}
