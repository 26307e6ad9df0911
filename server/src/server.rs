//! axum server wiring.
//!
//! The service exposes:
//! - `/healthz`
//! - `POST /process-single`: sorts the batch with [`Strategy::Sequential`]
//! - `POST /process-concurrent`: sorts the batch with [`Strategy::Concurrent`]

use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::oneshot;
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{
    client::{run_self_test, SortClient},
    config::ServiceConfig,
    processing::Strategy,
    wire::{decode_request, SortResponse},
};

#[derive(Clone)]
/// Per-listener context handed to every handler.
pub struct AppState {
    max_body_bytes: usize,
}

impl AppState {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    pub fn from_config(cfg: &ServiceConfig) -> Self {
        Self::new(cfg.max_body_bytes)
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route(Strategy::Sequential.route(), post(process_single))
        .route(Strategy::Concurrent.route(), post(process_concurrent))
        .with_state(state)
}

/// Bind `cfg.listen_addr` and serve until Ctrl-C.
pub async fn run(cfg: ServiceConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(cfg.listen_addr)
        .await
        .with_context(|| format!("bind {}", cfg.listen_addr))?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "listening");

    // The listener is already bound, so the self-test connection waits in the accept backlog
    // until the server loop picks it up.
    if cfg.self_test {
        let client = SortClient::new(loopback_base_url(local_addr))?;
        tokio::spawn(async move {
            if let Err(err) = run_self_test(&client).await {
                tracing::warn!(event = "self_test_failed", error = %err, "self-test failed");
            }
        });
    }

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown requested");
                let _ = shutdown_tx.send(());
            }
            Err(err) => {
                // Keep the sender alive; dropping it would stop the server.
                tracing::warn!(error = %err, "ctrl-c handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    });

    serve_listener(listener, AppState::from_config(&cfg), shutdown_rx).await
}

pub async fn serve_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: oneshot::Receiver<()>,
) -> anyhow::Result<()> {
    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.await;
        })
        .await?;
    Ok(())
}

/// Base URL for reaching a listener bound to `addr` from the same host.
fn loopback_base_url(addr: SocketAddr) -> String {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("http://{}", SocketAddr::new(ip, addr.port()))
}

async fn process_single(State(state): State<AppState>, req: Request<Body>) -> Response {
    handle_sort(&state, Strategy::Sequential, req).await
}

async fn process_concurrent(State(state): State<AppState>, req: Request<Body>) -> Response {
    handle_sort(&state, Strategy::Concurrent, req).await
}

async fn handle_sort(state: &AppState, strategy: Strategy, req: Request<Body>) -> Response {
    let request_id = format!("r-{}", Uuid::new_v4());
    let span = tracing::debug_span!("sort", request_id = %request_id, strategy = %strategy);
    sort_body(state, strategy, req.into_body())
        .instrument(span)
        .await
}

async fn sort_body(state: &AppState, strategy: Strategy, body: Body) -> Response {
    let body = match to_bytes(body, state.max_body_bytes).await {
        Ok(b) => b,
        Err(_) => return (StatusCode::PAYLOAD_TOO_LARGE, "body too large").into_response(),
    };

    let payload = match decode_request(&body) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(event = "decode_rejected", error = %err, "request rejected");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    // Timing starts inside the strategy, after decoding; encoding happens after it returns.
    let arrays = payload.to_sort.len();
    match strategy.run(Arc::new(payload.to_sort)).await {
        Ok(processed) => {
            let resp = SortResponse::from(processed);
            tracing::debug!(
                event = "batch_sorted",
                arrays,
                time_ns = resp.time_ns,
                "batch sorted"
            );
            Json(resp).into_response()
        }
        Err(err) => {
            tracing::error!(event = "sort_failed", arrays, error = %err, "sort task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "sort failed").into_response()
        }
    }
}
