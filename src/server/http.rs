//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo; each connection is served on its own
//! tokio task against the shared `AppState`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::header;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Args;
use crate::content::SeedContent;
use crate::routes::{self, Endpoint};
use crate::server::CorsPolicy;
use crate::services::{CatalogService, ChallengeService, JournalService};
use crate::store::Store;
use crate::types::LatticeError;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Store handle shared by every service
    pub store: Arc<dyn Store>,
    pub catalog: CatalogService,
    pub journal: JournalService,
    pub challenge: ChallengeService,
    /// Introduction and conclusion served as-is
    pub content: SeedContent,
    pub cors: CorsPolicy,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(args: Args, store: Arc<dyn Store>, content: SeedContent) -> Self {
        let cors = CorsPolicy::from_origins(&args.cors_origin_list());
        Self {
            catalog: CatalogService::new(Arc::clone(&store)),
            journal: JournalService::new(Arc::clone(&store)),
            challenge: ChallengeService::new(Arc::clone(&store)),
            store,
            content,
            cors,
            args,
            started_at: Instant::now(),
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), LatticeError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Lattice listening on {} (store: {})",
        state.args.listen,
        state.store.backend()
    );

    if state.args.dev_mode {
        warn!("Development mode enabled");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { dispatch(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .preserve_header_case(true)
                        .title_case_headers(true)
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route one request and attach CORS headers
pub async fn dispatch<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    info!("[{}] {} {}", addr, method, path);

    if method == Method::OPTIONS {
        return Ok(state.cors.preflight(
            origin.as_deref(),
            req.headers().get(header::ACCESS_CONTROL_REQUEST_HEADERS),
        ));
    }

    let mut response = handle_request(&state, req).await;
    debug!(status = %response.status(), "{} {}", method, path);

    state.cors.apply(origin.as_deref(), response.headers_mut());
    Ok(response)
}

async fn handle_request<B>(state: &AppState, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let query = query.as_deref();

    let Some(endpoint) = Endpoint::parse(&path) else {
        return routes::not_found_response(&path);
    };

    match (endpoint, method) {
        (Endpoint::Health, Method::GET) => routes::health_check(state),
        (Endpoint::Ready, Method::GET) => routes::readiness_check(state).await,
        (Endpoint::Version, Method::GET) => routes::version_info(),

        (Endpoint::Root, Method::GET) => routes::content::root(),
        (Endpoint::Introduction, Method::GET) => routes::content::introduction(state),
        (Endpoint::Conclusion, Method::GET) => routes::content::conclusion(state),

        (Endpoint::Sections, Method::GET) => routes::catalog::list_sections(state).await,
        (Endpoint::Models, Method::GET) => routes::catalog::list_models(state, query).await,
        (
            Endpoint::Model {
                section_slug,
                model_index,
            },
            Method::GET,
        ) => routes::catalog::get_model(state, section_slug, model_index).await,
        (
            Endpoint::RelatedModels {
                section_slug,
                model_index,
            },
            Method::GET,
        ) => routes::catalog::related_models(state, section_slug, model_index).await,
        (Endpoint::Daily, Method::GET) => routes::catalog::daily_model(state).await,

        (Endpoint::Journal, Method::GET) => routes::journal::list_entries(state).await,
        (Endpoint::Journal, Method::POST) => match routes::read_json(req.into_body()).await {
            Ok(body) => routes::journal::create_entry(state, body).await,
            Err(e) => routes::error_response(&e),
        },
        (Endpoint::JournalEntry(id), Method::DELETE) => {
            routes::journal::delete_entry(state, id).await
        }

        (Endpoint::Challenge, Method::POST) => match routes::read_json(req.into_body()).await {
            Ok(body) => routes::challenge::create_challenge(state, body).await,
            Err(e) => routes::error_response(&e),
        },
        (Endpoint::ActiveChallenge, Method::GET) => {
            routes::challenge::active_challenge(state).await
        }
        (Endpoint::CompleteDay, Method::POST) => match routes::read_json(req.into_body()).await {
            Ok(body) => routes::challenge::complete_day(state, body).await,
            Err(e) => routes::error_response(&e),
        },
        (Endpoint::ChallengeLogs, Method::GET) => routes::challenge::list_logs(state, query).await,
        (Endpoint::ChallengeById(id), Method::DELETE) => {
            routes::challenge::delete_challenge(state, id).await
        }

        (Endpoint::Stats, Method::GET) => routes::stats::stats_summary(state).await,

        _ => routes::method_not_allowed_response(),
    }
}
