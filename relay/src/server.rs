use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::policy;
use crate::settlement::{build_add_stakes, Settlement};
use crate::wire::{HealthResponse, SubmitRequest, SubmitResponse};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub settlement: Arc<dyn Settlement>,
}

impl AppState {
    pub fn new(config: RelayConfig, settlement: Arc<dyn Settlement>) -> Self {
        Self {
            config: Arc::new(config),
            settlement,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(submit))
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        relayer: state.settlement.relayer().to_string(),
        chain_id: state.config.network_id,
        target: state.config.target.to_string(),
    })
}

async fn submit(State(state): State<AppState>, body: axum::body::Bytes) -> impl IntoResponse {
    match submit_impl(&state, &body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "submission rejected");
            let details = json!({
                "message": err.to_string(),
                "relayer": state.settlement.relayer().to_string(),
                "chainId": state.config.network_id,
            });
            (
                err.status(),
                Json(SubmitResponse::rejected(err.kind(), details)),
            )
                .into_response()
        }
    }
}

/// Validate, build and submit one delegated staking request.
pub async fn submit_impl(state: &AppState, body: &[u8]) -> Result<SubmitResponse, RelayError> {
    let request: SubmitRequest = serde_json::from_slice(body)
        .map_err(|err| RelayError::MalformedRequest(err.to_string()))?;

    let submission = policy::validate(&state.config, &request)?;
    let relayer = state.settlement.relayer();
    let details = submission.details(&relayer, state.config.network_id);

    let instructions = build_add_stakes(&state.config, &relayer, &submission)?;
    let tx_hash = state.settlement.submit(instructions).await?;

    tracing::info!(
        eoa = %details.eoa,
        wallet = %details.wallet,
        nonce = submission.authorization.nonce,
        total = submission.total,
        tx = %tx_hash,
        "delegated stake submitted"
    );
    Ok(SubmitResponse::accepted(tx_hash, &details))
}

