// src/server.rs

use crate::{
    auth::api_key_auth,
    backend::BackendClient,
    config::{Config, ServerConfig},
    error::ValidationError,
    registry::{LanguageInfo, LanguageRegistry},
    request::ValidatedRequest,
    request_id::RequestId,
    validator::Validator,
};

use anyhow::Context;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Shared by every handler. Nothing in here is mutable.
#[derive(Debug, Clone)]
pub struct AppState {
    pub validator: Arc<Validator>,
    pub backend: Option<Arc<BackendClient>>,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let registry = LanguageRegistry::from_config(cfg)?;

        Ok(Self {
            validator: Arc::new(Validator::new(registry)),
            backend: cfg
                .backend
                .as_ref()
                .map(|b| Arc::new(BackendClient::new(b))),
        })
    }
}

/* ---------------- server ---------------- */

pub async fn serve(cfg: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&cfg)?;
    let app = router(state.clone(), &cfg.server);

    let socket: SocketAddr = cfg
        .server
        .addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", cfg.server.addr))?;
    let listener = TcpListener::bind(socket)
        .await
        .with_context(|| format!("Failed to bind {}", socket))?;

    tracing::info!(
        languages = state.validator.registry().len(),
        backend = state.backend.as_ref().map(|b| b.url()).unwrap_or("none"),
        "scriptgate listening on http://{}",
        socket
    );

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let mut protected = Router::new()
        .route("/languages", get(languages))
        .route("/validate", post(validate))
        .route("/execute", post(execute))
        // The bundled web client posts `{language, script}` to the root.
        .route("/", post(execute));

    if server.require_api_key {
        protected = protected.layer(middleware::from_fn(api_key_auth));
    }

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        request_id = %RequestId::new(),
                        method = %req.method(),
                        path = %req.uri().path(),
                    )
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::info!(
                        status = res.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "request completed"
                    );
                }),
        )
}

/* ---------------- endpoints ---------------- */

async fn health() -> &'static str {
    "ok"
}

async fn languages(State(state): State<AppState>) -> Json<Vec<LanguageInfo>> {
    Json(state.validator.registry().languages())
}

async fn validate(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match admit(&state, body).await {
        Ok(validated) => (StatusCode::OK, Json(validated)).into_response(),
        Err(response) => response,
    }
}

async fn execute(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let validated = match admit(&state, body).await {
        Ok(v) => v,
        Err(response) => return response,
    };

    let Some(backend) = state.backend.as_ref() else {
        return transport_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "No execution backend configured",
        );
    };

    match backend.run(&validated).await {
        Ok(output) => (StatusCode::OK, Json(output)).into_response(),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "execution backend call failed");
            transport_error(StatusCode::BAD_GATEWAY, format!("{e:#}"))
        }
    }
}

/// Decode the body and run the validator off the async executor; scripts
/// may be many megabytes.
async fn admit(
    state: &AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<ValidatedRequest, Response> {
    let Json(body) = body.map_err(|rejection| {
        transport_error(rejection.status(), rejection.body_text())
    })?;

    let validator = Arc::clone(&state.validator);
    match tokio::task::spawn_blocking(move || validator.validate_value(body)).await {
        Ok(result) => result.map_err(IntoResponse::into_response),
        Err(e) => Err(transport_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Validation task failed: {e}"),
        )),
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

fn transport_error(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({
            "ok": false,
            "error": error.into(),
        })),
    )
        .into_response()
}
