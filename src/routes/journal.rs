//! Journal endpoints
//!
//! - `GET /api/journal`
//! - `POST /api/journal`
//! - `DELETE /api/journal/{id}`

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

use crate::routes::{deleted_response, result_response};
use crate::server::AppState;
use crate::services::CreateJournalEntry;

pub async fn list_entries(state: &AppState) -> Response<Full<Bytes>> {
    result_response(StatusCode::OK, state.journal.list().await)
}

pub async fn create_entry(state: &AppState, request: CreateJournalEntry) -> Response<Full<Bytes>> {
    result_response(StatusCode::CREATED, state.journal.create(request).await)
}

pub async fn delete_entry(state: &AppState, id: &str) -> Response<Full<Bytes>> {
    deleted_response(state.journal.delete(id).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body_json, seeded_state};

    #[tokio::test]
    async fn test_create_list_delete() {
        let state = seeded_state().await;

        let response = create_entry(
            &state,
            CreateJournalEntry {
                content: "Used inversion on the roadmap".into(),
                model_title: Some("Inversion".into()),
                section_slug: Some("thinking-smarter".into()),
            },
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let listed = body_json(list_entries(&state).await).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let response = delete_entry(&state, &id).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "deleted");

        let response = delete_entry(&state, &id).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Entry not found");
    }
}
