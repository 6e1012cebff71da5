//! Catalog endpoints
//!
//! - `GET /api/sections`
//! - `GET /api/models?section=&search=&limit=`
//! - `GET /api/models/{section_slug}/{model_index}`
//! - `GET /api/models/{section_slug}/{model_index}/related`
//! - `GET /api/daily`

use bytes::Bytes;
use chrono::Utc;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use crate::routes::{parse_model_index, parse_query, result_response};
use crate::server::AppState;
use crate::services::ModelListParams;
use crate::types::Result;

pub async fn list_sections(state: &AppState) -> Response<Full<Bytes>> {
    result_response(StatusCode::OK, state.catalog.sections().await)
}

pub async fn list_models(state: &AppState, query: Option<&str>) -> Response<Full<Bytes>> {
    let result: Result<_> = async {
        let params: ModelListParams = parse_query(query)?;
        state.catalog.models(params).await
    }
    .await;
    result_response(StatusCode::OK, result)
}

pub async fn get_model(state: &AppState, section_slug: &str, model_index: &str) -> Response<Full<Bytes>> {
    let result: Result<_> = async {
        let index = parse_model_index(model_index)?;
        state.catalog.model(section_slug, index).await
    }
    .await;
    result_response(StatusCode::OK, result)
}

pub async fn related_models(
    state: &AppState,
    section_slug: &str,
    model_index: &str,
) -> Response<Full<Bytes>> {
    let result: Result<_> = async {
        let index = parse_model_index(model_index)?;
        state.catalog.related(section_slug, index).await
    }
    .await;
    result_response(StatusCode::OK, result)
}

/// Model of the day for the current UTC date
pub async fn daily_model(state: &AppState) -> Response<Full<Bytes>> {
    let today = Utc::now().date_naive();
    result_response(StatusCode::OK, state.catalog.daily(today).await)
}
