//! Segment endpoint, served so this process can act as a segment service.

use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::segment::{resolve_segment, SegmentResponse};

#[derive(Debug, Deserialize)]
pub struct SegmentQuery {
    pub user_id: i64,
}

/// `GET /api/v1/user_segment?user_id=N` (also `/segment`)
pub async fn get_segment(
    query: Result<Query<SegmentQuery>, QueryRejection>,
) -> Result<Json<SegmentResponse>, ApiError> {
    let Query(SegmentQuery { user_id }) = query?;
    let segment = resolve_segment(user_id);

    tracing::debug!(user_id, segment = %segment, "Returning segment");
    Ok(Json(SegmentResponse {
        segment: Some(segment),
    }))
}
