use super::error::ApiError;
use super::handlers;
use crate::config::ApiConfig;
use crate::semaphore::SemaphoreService;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use semaphore_types::{GatewayError, GatewayResult};
use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

#[derive(Clone)]
pub struct AppState {
    pub service: SemaphoreService,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: SemaphoreService) -> Self {
        Self {
            service,
            started_at: Instant::now(),
        }
    }
}

fn semaphore_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/groups", post(handlers::create_group))
        .route("/groups/counter", get(handlers::group_counter))
        .route("/groups/:groupId", get(handlers::group_info))
        .route("/groups/:groupId/accept-admin", post(handlers::accept_group_admin))
        .route("/groups/:groupId/admin", put(handlers::update_group_admin))
        .route(
            "/groups/:groupId/merkle-tree-duration",
            put(handlers::update_merkle_tree_duration),
        )
        .route(
            "/members",
            post(handlers::add_member)
                .delete(handlers::remove_member)
                .put(handlers::update_member),
        )
        .route("/members/batch", post(handlers::add_members))
        .route("/members/check", get(handlers::has_member))
        .route("/members/index", get(handlers::index_of))
        .route("/proofs/validate", post(handlers::validate_proof))
        .route("/proofs/verify", post(handlers::verify_proof))
        .route("/verifier", get(handlers::verifier))
        .route("/account", get(handlers::account))
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins = if config.cors_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .cors_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

const REJECTION_TEXT_LIMIT: usize = 1024;

/// Rewraps error responses produced outside the handlers (body limit,
/// method mismatch, path decoding, request timeout) into the JSON envelope.
async fn envelope_rejections(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map_or(false, |v| v.as_bytes().starts_with(b"application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let text = axum::body::to_bytes(response.into_body(), REJECTION_TEXT_LIMIT)
        .await
        .ok()
        .and_then(|bytes| String::from_utf8(bytes.to_vec()).ok())
        .filter(|text| !text.trim().is_empty());

    let err = match status {
        StatusCode::REQUEST_TIMEOUT => GatewayError::Timeout("Request timed out".into()),
        StatusCode::METHOD_NOT_ALLOWED => GatewayError::domain(405, "Method not allowed"),
        StatusCode::PAYLOAD_TOO_LARGE => GatewayError::domain(413, "Request body too large"),
        s if s.is_server_error() => GatewayError::Internal(text.unwrap_or_else(|| s.to_string())),
        s => GatewayError::domain(
            s.as_u16(),
            text.unwrap_or_else(|| s.canonical_reason().unwrap_or("Request rejected").to_string()),
        ),
    };

    let mut response = ApiError(err).into_response();
    if let Some(allow) = allow {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}

/// Full HTTP surface: the API under `base_path`, `/health` at the root and a 404 fallback.
pub fn router(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .nest(&config.base_path, semaphore_routes())
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(DefaultBodyLimit::disable())
        .layer(map_response(envelope_rejections));

    if config.cors_enabled {
        router = router.layer(cors_layer(config));
    }

    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info_span!(
                "http",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

pub struct ApiServer {
    addr: SocketAddr,
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiConfig, service: SemaphoreService) -> Self {
        Self {
            addr: SocketAddr::new(config.bind_address, config.port),
            config,
            state: AppState::new(service),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn serve<F>(self, shutdown: F) -> GatewayResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to bind {}: {}", self.addr, e)))?;

        info!("API listening on http://{}{}", self.addr, self.config.base_path);

        let app = router(self.state, &self.config);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| GatewayError::Internal(format!("API server error: {}", e)))?;

        info!("API server stopped");
        Ok(())
    }
}
