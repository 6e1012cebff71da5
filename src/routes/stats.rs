//! `GET /api/stats`

use bytes::Bytes;
use chrono::Utc;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use crate::routes::result_response;
use crate::server::AppState;
use crate::services::stats;

pub async fn stats_summary(state: &AppState) -> Response<Full<Bytes>> {
    result_response(
        StatusCode::OK,
        stats::collect(state.store.as_ref(), Utc::now()).await,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body_json, seeded_state};

    #[tokio::test]
    async fn test_stats_shape() {
        let state = seeded_state().await;
        let body = body_json(stats_summary(&state).await).await;
        assert_eq!(body["total_sections"], 6);
        assert_eq!(body["total_models"], 30);
        assert_eq!(body["journal_entries"], 0);
        assert!(body["active_challenge"].is_null());
    }
}
