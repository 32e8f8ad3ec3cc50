//! Request guards for the two login steps.
//!
//! Page routes redirect to the step that is missing. API routes answer
//! `401 {ok:false,msg}` instead and never reach the handler.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};

use crate::core::errors::ShopkeeperError;
use crate::core::models::actor::Actor;
use crate::web::AppState;
use crate::web::session::{Session, token_from_headers};

fn session_of(parts: &Parts, state: &AppState) -> Option<(String, Session)> {
    let token = token_from_headers(&parts.headers)?;
    let session = state.sessions.get(&token)?;
    Some((token, session))
}

/// Passed the username/password step.
pub struct AdminSession {
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match session_of(parts, state) {
            Some((token, session)) if session.admin => Ok(Self { token }),
            _ => Err(Redirect::to("/login")),
        }
    }
}

/// Passed both steps; used by HTML pages.
pub struct DashboardUser {
    pub actor: Actor,
}

impl FromRequestParts<Arc<AppState>> for DashboardUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match session_of(parts, state) {
            Some((_, Session { admin: true, user: Some(actor), .. })) => Ok(Self { actor }),
            Some((_, Session { admin: true, .. })) => Err(Redirect::to("/auth/login")),
            _ => Err(Redirect::to("/login")),
        }
    }
}

/// Passed both steps; used by `/api/*`.
pub struct ApiUser {
    pub actor: Actor,
}

pub struct ApiRejection;

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        ShopkeeperError::Unauthorized.into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for ApiUser {
    type Rejection = ApiRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match session_of(parts, state) {
            Some((_, Session { admin: true, user: Some(actor), .. })) => Ok(Self { actor }),
            _ => Err(ApiRejection),
        }
    }
}
