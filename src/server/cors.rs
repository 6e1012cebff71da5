//! CORS handling
//!
//! With `*` configured every origin is allowed and credentials are not.
//! With an explicit list, a listed request `Origin` is echoed back together
//! with `Vary: Origin` and `Access-Control-Allow-Credentials: true`; any
//! other origin gets no CORS headers at all.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Response, StatusCode};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const PREFLIGHT_MAX_AGE: &str = "600";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    AnyOrigin,
    Origins(Vec<String>),
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

impl CorsPolicy {
    /// Build from the configured origin list; `*` anywhere allows all
    pub fn from_origins(origins: &[String]) -> Self {
        if origins.iter().any(|o| o.trim() == "*") {
            Self::AnyOrigin
        } else {
            Self::Origins(origins.iter().map(|o| normalize(o).to_string()).collect())
        }
    }

    /// Value for `Access-Control-Allow-Origin`, if this origin is allowed
    pub fn allow_origin(&self, request_origin: Option<&str>) -> Option<HeaderValue> {
        match self {
            Self::AnyOrigin => Some(HeaderValue::from_static("*")),
            Self::Origins(allowed) => {
                let origin = request_origin?;
                if allowed.iter().any(|a| a == normalize(origin)) {
                    HeaderValue::from_str(origin).ok()
                } else {
                    None
                }
            }
        }
    }

    /// Add CORS headers to a response
    pub fn apply(&self, request_origin: Option<&str>, headers: &mut HeaderMap) {
        let Some(value) = self.allow_origin(request_origin) else {
            return;
        };
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);

        if let Self::Origins(_) = self {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
    }

    /// Response to an OPTIONS preflight
    ///
    /// Requested headers are echoed; `*` is not a wildcard once credentials
    /// are allowed.
    pub fn preflight(
        &self,
        request_origin: Option<&str>,
        requested_headers: Option<&HeaderValue>,
    ) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::NO_CONTENT;

        let headers = response.headers_mut();
        self.apply(request_origin, headers);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            requested_headers
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("*")),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );

        response
    }
}
