//! Static content endpoints
//!
//! - `GET /api/`
//! - `GET /api/introduction`
//! - `GET /api/conclusion`

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::json_response;
use crate::server::AppState;

#[derive(Serialize)]
struct RootMessage {
    message: &'static str,
}

pub fn root() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &RootMessage {
            message: "AI-Powered Mind API",
        },
    )
}

pub fn introduction(state: &AppState) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &state.content.introduction)
}

pub fn conclusion(state: &AppState) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &state.content.conclusion)
}
