//! Challenge endpoints
//!
//! - `POST /api/challenge`
//! - `GET /api/challenge/active`
//! - `POST /api/challenge/complete-day`
//! - `GET /api/challenge/logs?challenge_id=`
//! - `DELETE /api/challenge/{id}`

use bytes::Bytes;
use chrono::Utc;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use crate::routes::{deleted_response, parse_query, result_response};
use crate::server::AppState;
use crate::services::{CompleteDay, CreateChallenge, LogParams};
use crate::types::Result;

pub async fn create_challenge(state: &AppState, request: CreateChallenge) -> Response<Full<Bytes>> {
    result_response(
        StatusCode::CREATED,
        state.challenge.create(request, Utc::now()).await,
    )
}

/// The active challenge, or JSON `null`
pub async fn active_challenge(state: &AppState) -> Response<Full<Bytes>> {
    result_response(StatusCode::OK, state.challenge.active(Utc::now()).await)
}

pub async fn complete_day(state: &AppState, request: CompleteDay) -> Response<Full<Bytes>> {
    result_response(
        StatusCode::OK,
        state.challenge.complete_day(request, Utc::now()).await,
    )
}

pub async fn list_logs(state: &AppState, query: Option<&str>) -> Response<Full<Bytes>> {
    let result: Result<_> = async {
        let params: LogParams = parse_query(query)?;
        state.challenge.logs(params).await
    }
    .await;
    result_response(StatusCode::OK, result)
}

pub async fn delete_challenge(state: &AppState, id: &str) -> Response<Full<Bytes>> {
    deleted_response(state.challenge.delete(id).await)
}
