use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::adapters::discord::interactions::{Interaction, respond};
use crate::web::AppState;

const SIGNATURE_HEADER: &str = "x-signature-ed25519";
const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// `POST /interactions`: Discord's outgoing webhook for slash commands.
pub async fn handle(State(state): State<Arc<AppState>>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(verifier) = &state.verifier else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let signature = header_str(&headers, SIGNATURE_HEADER);
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    if let Err(e) = verifier.verify(signature, timestamp, &body) {
        warn!(error = %e, "rejected interaction");
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(e) => {
            debug!(error = %e, "malformed interaction body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match respond(&state.commands, &interaction) {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::BAD_REQUEST.into_response(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
