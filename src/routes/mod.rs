//! HTTP routes for lattice
//!
//! Handlers build `Response<Full<Bytes>>` values; CORS headers are added by
//! the server after dispatch. Path matching lives in [`Endpoint::parse`].

pub mod catalog;
pub mod challenge;
pub mod content;
pub mod health;
pub mod journal;
pub mod stats;

pub use health::{health_check, readiness_check, version_info};

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{LatticeError, Result};

/// Largest request body accepted
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Every path the API serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    Root,
    Sections,
    Models,
    Model { section_slug: &'a str, model_index: &'a str },
    RelatedModels { section_slug: &'a str, model_index: &'a str },
    Daily,
    Introduction,
    Conclusion,
    Journal,
    JournalEntry(&'a str),
    Challenge,
    ActiveChallenge,
    CompleteDay,
    ChallengeLogs,
    ChallengeById(&'a str),
    Stats,
    Health,
    Ready,
    Version,
}

impl<'a> Endpoint<'a> {
    /// Match a request path; `None` for unknown paths
    pub fn parse(path: &'a str) -> Option<Self> {
        match path {
            "/health" | "/healthz" => return Some(Self::Health),
            "/ready" | "/readyz" => return Some(Self::Ready),
            "/version" => return Some(Self::Version),
            _ => {}
        }

        let rest = path.strip_prefix("/api")?;
        let rest = rest.trim_end_matches('/');
        let segments: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.trim_start_matches('/').split('/').collect()
        };

        let endpoint = match segments[..] {
            [] => Self::Root,
            ["sections"] => Self::Sections,
            ["models"] => Self::Models,
            ["models", slug, index] => Self::Model {
                section_slug: slug,
                model_index: index,
            },
            ["models", slug, index, "related"] => Self::RelatedModels {
                section_slug: slug,
                model_index: index,
            },
            ["daily"] => Self::Daily,
            ["introduction"] => Self::Introduction,
            ["conclusion"] => Self::Conclusion,
            ["journal"] => Self::Journal,
            ["journal", id] => Self::JournalEntry(id),
            ["challenge"] => Self::Challenge,
            ["challenge", "active"] => Self::ActiveChallenge,
            ["challenge", "complete-day"] => Self::CompleteDay,
            ["challenge", "logs"] => Self::ChallengeLogs,
            ["challenge", id] => Self::ChallengeById(id),
            ["stats"] => Self::Stats,
            _ => return None,
        };

        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(endpoint)
    }
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

/// `{"status":"deleted"}`
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

/// Serialize `data` as a JSON response with the given status
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(data) {
        Ok(body) => Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .header("Cache-Control", "no-cache")
            .body(Full::new(Bytes::from(body)))
            .unwrap_or_else(|_| fallback_response()),
        Err(e) => error_response(&LatticeError::Internal(format!("Serialization failed: {}", e))),
    }
}

/// JSON error response for a `LatticeError`
pub fn error_response(err: &LatticeError) -> Response<Full<Bytes>> {
    let status = err.status_code();
    if status.is_server_error() {
        warn!(code = err.code(), "Request failed: {}", err);
    }

    let body = ApiError {
        error: err.to_string(),
        code: err.code().to_string(),
    };
    let body = serde_json::to_vec(&body).unwrap_or_default();

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| fallback_response())
}

/// Unknown path
pub fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    error_response(&LatticeError::NotFound(format!("No route for {}", path)))
}

/// Known path, wrong method
pub fn method_not_allowed_response() -> Response<Full<Bytes>> {
    let body = ApiError {
        error: "Method not allowed".to_string(),
        code: "METHOD_NOT_ALLOWED".to_string(),
    };
    json_response(StatusCode::METHOD_NOT_ALLOWED, &body)
}

/// Map a service result to a JSON response
pub fn result_response<T: Serialize>(status: StatusCode, result: Result<T>) -> Response<Full<Bytes>> {
    match result {
        Ok(data) => json_response(status, &data),
        Err(e) => error_response(&e),
    }
}

/// `{"status":"deleted"}` on success
pub fn deleted_response(result: Result<()>) -> Response<Full<Bytes>> {
    result_response(StatusCode::OK, result.map(|_| StatusBody { status: "deleted" }))
}

fn fallback_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(
        br#"{"error":"Internal error","code":"INTERNAL"}"#,
    )));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}

/// Deserialize query parameters; a missing query string yields the defaults
pub fn parse_query<T: DeserializeOwned>(query: Option<&str>) -> Result<T> {
    serde_urlencoded::from_str(query.unwrap_or(""))
        .map_err(|e| LatticeError::InvalidInput(format!("Invalid query parameters: {}", e)))
}

/// Collect a request body and deserialize it as JSON
///
/// Reading stops as soon as the body grows past [`MAX_BODY_BYTES`].
pub async fn read_json<T, B>(body: B) -> Result<T>
where
    T: DeserializeOwned,
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let bytes = Limited::new(body, MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                LatticeError::InvalidInput(format!(
                    "Request body exceeds {} bytes",
                    MAX_BODY_BYTES
                ))
            } else {
                LatticeError::InvalidInput(format!("Failed to read body: {}", e))
            }
        })?
        .to_bytes();

    Ok(serde_json::from_slice(&bytes)?)
}

/// Parse the `{model_index}` path segment
pub fn parse_model_index(raw: &str) -> Result<i32> {
    raw.parse()
        .map_err(|_| LatticeError::InvalidInput(format!("Invalid model index '{}'", raw)))
}
