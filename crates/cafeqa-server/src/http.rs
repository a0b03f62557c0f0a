//! Axum router and handlers for the chat API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cafeqa_chain::{QaOutcome, QaService};
use cafeqa_core::types::ErrorDetail;
use cafeqa_core::{ApiToken, ChatRequest, ChatResponse};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Result, ServerError};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub const INVALID_TOKEN: &str = "Token inválido.";

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub qa: QaService,
    pub token: ApiToken,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C or SIGTERM.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    tracing::info!(addr = %addr, "cafeqa listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("cafeqa stopped");
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(ErrorDetail::new(rejection.body_text())),
            )
                .into_response()
        }
    };

    if !state.token.verify(&request.token) {
        return (StatusCode::UNAUTHORIZED, Json(ErrorDetail::new(INVALID_TOKEN))).into_response();
    }

    let request_id = Uuid::new_v4();
    let outcome = state
        .qa
        .ask(&request.message)
        .instrument(tracing::info_span!("chat", %request_id))
        .await;

    let body = match &outcome {
        QaOutcome::Answered(answer) => ChatResponse::answered(answer.answer.clone()),
        QaOutcome::Failed(error) => ChatResponse::failed(outcome.answer_text(), error.to_string()),
    };
    (StatusCode::OK, Json(body)).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
