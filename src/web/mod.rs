//! Dashboard, JSON API and Discord interactions endpoint.

pub mod api;
pub mod auth;
pub mod interactions;
pub mod pages;
pub mod response;
pub mod session;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sha2::{Digest, Sha256};
use subtle::{Choice, ConstantTimeEq};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::adapters::discord::interactions::InteractionVerifier;
use crate::bot::CommandRouter;
use crate::core::errors::{Result, ShopkeeperError};
use crate::core::services::shop_service::ShopService;
use crate::core::traits::identity::IdentityProvider;
use session::SessionStore;

/// Username and password for the first login step.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    /// Constant-time over fixed-length digests, so neither the first
    /// differing byte nor the length of the secret shows in the timing.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = digest_eq(username, &self.username);
        let pass_ok = digest_eq(password, &self.password);
        (user_ok & pass_ok).into()
    }
}

fn digest_eq(given: &str, expected: &str) -> Choice {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given.as_slice().ct_eq(expected.as_slice())
}

/// Everything the handlers share.
pub struct AppState {
    pub shops: ShopService,
    pub sessions: SessionStore,
    pub identity: Arc<dyn IdentityProvider>,
    pub commands: CommandRouter,
    /// `None` disables `/interactions`.
    pub verifier: Option<InteractionVerifier>,
    pub admin: AdminCredentials,
    pub dashboard_limit: usize,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/login", get(pages::login_page).post(pages::login_submit))
        .route("/logout", get(pages::logout))
        .route("/auth/login", get(pages::auth_login))
        .route("/auth/callback", get(pages::auth_callback))
        .route("/dashboard", get(pages::dashboard))
        .route("/assets/dashboard.js", get(pages::dashboard_js))
        .route("/health", get(pages::health))
        .route("/api/stores", get(api::list_stores))
        .route("/api/logs", get(api::list_logs))
        .route("/api/store", post(api::store_action))
        .route("/interactions", post(interactions::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(state: Arc<AppState>, address: &str) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| ShopkeeperError::InvalidConfig {
            detail: format!("cannot bind {address}: {e}"),
        })?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
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
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::adapters::audit::memory_audit_logger::MemoryAuditLogger;
    use crate::adapters::store::memory_shop_store::MemoryShopStore;
    use crate::core::models::actor::Actor;
    use crate::core::services::shop_service::QuotaRules;

    /// Identity provider that accepts the code "good" as user 42.
    pub struct FakeIdentity;

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        fn authorize_url(&self, state: &str) -> String {
            format!("https://id.example/authorize?state={state}")
        }

        async fn exchange_code(&self, code: &str) -> Result<Actor> {
            if code == "good" {
                Ok(Actor::new("42", "tester"))
            } else {
                Err(ShopkeeperError::UpstreamFailure {
                    service: "Discord".into(),
                    reason: "bad code".into(),
                })
            }
        }
    }

    pub fn state(verifier: Option<InteractionVerifier>) -> Arc<AppState> {
        Arc::new(AppState {
            shops: ShopService::new(
                Arc::new(MemoryShopStore::new()),
                Arc::new(MemoryAuditLogger::new()),
                QuotaRules::default(),
            ),
            sessions: SessionStore::new(Duration::from_secs(3600)),
            identity: Arc::new(FakeIdentity),
            commands: CommandRouter::default(),
            verifier,
            admin: AdminCredentials {
                username: "admin".into(),
                password: "hunter2".into(),
            },
            dashboard_limit: 50,
        })
    }

    /// Cookie header for a session that passed both login steps.
    pub fn signed_in(state: &AppState) -> String {
        let token = state.sessions.create_admin();
        state.sessions.set_user(&token, Actor::new("42", "tester"));
        format!("{}={token}", session::SESSION_COOKIE)
    }
}
