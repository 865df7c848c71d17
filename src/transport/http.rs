//! HTTP API built on `axum`.
//!
//! `POST /send-message` is an alternative entry into the same pipeline the
//! WebSocket channel uses. `POST /contact` takes website contact forms.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::contact::{ContactDesk, ContactForm};
use crate::pipeline::Pipeline;
use crate::transport::message::null_as_empty;
use crate::utils::error::{ChatError, ValidationError};

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub contacts: ContactDesk,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sender: String,
    #[serde(default, alias = "message", deserialize_with = "null_as_empty")]
    pub body: String,
}

impl From<JsonRejection> for ChatError {
    fn from(rejection: JsonRejection) -> Self {
        ChatError::Validation(ValidationError::Malformed(rejection.body_text()))
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ChatError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            // Log the detail, keep it out of the response.
            ChatError::StoreUnavailable(detail) => {
                error!(target: "http", %detail, "store unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/send-message", post(send_message))
        .route("/contact", post(submit_contact))
        .with_state(state)
}

/// Bind `addr` and serve the API until the server stops.
pub async fn start_http_server(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(target: "http", "HTTP server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the chat relay backend!" }))
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "Backend is running!" }))
}

async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<Value>, ChatError> {
    let Json(req) = payload?;
    state.pipeline.ingest(&req.sender, &req.body).await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<Value>, ChatError> {
    let Json(form) = payload?;
    state.contacts.submit(form)?;
    Ok(Json(json!({ "message": "Message sent successfully!" })))
}
