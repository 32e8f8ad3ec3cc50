use std::sync::Arc;

use axum::Form;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::web::AppState;
use crate::web::auth::{AdminSession, DashboardUser};
use crate::web::session::{expired_cookie, session_cookie, token_from_headers};

static LOGIN_HTML: &str = include_str!("../../assets/login.html");
static DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");
static DASHBOARD_JS: &str = include_str!("../../assets/dashboard.js");

pub async fn index() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    if !state.admin.matches(&form.username, &form.password) {
        warn!("rejected dashboard login");
        return (StatusCode::UNAUTHORIZED, "❌ بيانات الدخول غير صحيحة").into_response();
    }

    // Never reuse a token that existed before authentication
    if let Some(old) = token_from_headers(&headers) {
        state.sessions.remove(&old);
    }
    let token = state.sessions.create_admin();
    let cookie = session_cookie(&token, state.sessions.ttl());

    (
        [(header::SET_COOKIE, cookie)],
        Redirect::to("/auth/login"),
    )
        .into_response()
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = token_from_headers(&headers) {
        state.sessions.remove(&token);
    }
    ([(header::SET_COOKIE, expired_cookie())], Redirect::to("/login")).into_response()
}

pub async fn auth_login(State(state): State<Arc<AppState>>, admin: AdminSession) -> Redirect {
    match state.sessions.begin_oauth(&admin.token) {
        Some(oauth_state) => Redirect::to(&state.identity.authorize_url(&oauth_state)),
        None => Redirect::to("/login"),
    }
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

pub async fn auth_callback(
    State(state): State<Arc<AppState>>,
    admin: AdminSession,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "❌ لا يوجد كود OAuth2").into_response();
    };
    let returned = query.state.unwrap_or_default();
    if !state.sessions.finish_oauth(&admin.token, &returned) {
        warn!("oauth callback with unknown state");
        return (StatusCode::BAD_REQUEST, "❌ طلب OAuth2 غير صالح").into_response();
    }

    match state.identity.exchange_code(&code).await {
        Ok(actor) => {
            info!(user = %actor, "dashboard sign-in");
            if !state.sessions.set_user(&admin.token, actor) {
                return Redirect::to("/login").into_response();
            }
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            warn!(error = %e, "oauth code exchange failed");
            (e.status(), e.user_message()).into_response()
        }
    }
}

pub async fn dashboard(user: DashboardUser) -> Html<String> {
    Html(DASHBOARD_HTML.replace("{{user}}", &escape_html(&user.actor.name)))
}

pub async fn dashboard_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        DASHBOARD_JS,
    )
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
