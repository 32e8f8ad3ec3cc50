use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::adapters::audit::memory_audit_logger::MemoryAuditLogger;
use crate::adapters::discord::commands;
use crate::adapters::discord::interactions::InteractionVerifier;
use crate::adapters::discord::oauth::{DiscordOAuth, OAuthSettings};
use crate::adapters::store::memory_shop_store::MemoryShopStore;
use crate::bot::CommandRouter;
use crate::cli::{ServeArgs, context};
use crate::config::app_config::AppConfig;
use crate::core::errors::{Result, ShopkeeperError};
use crate::core::services::shop_service::ShopService;
use crate::web::session::SessionStore;
use crate::web::{self, AdminCredentials, AppState};

/// Execute `shopkeeper serve`.
///
/// Fails before binding anything when the admin credentials or OAuth2
/// settings are missing.
pub fn execute(args: &ServeArgs) -> Result<()> {
    let config = AppConfig::load(context::data_dir())?;

    let admin = AdminCredentials {
        username: require(&args.admin_user, "ADMIN_USER")?,
        password: require(&args.admin_pass, "ADMIN_PASS")?,
    };
    let oauth = OAuthSettings {
        client_id: require(&args.client_id, "CLIENT_ID")?,
        client_secret: require(&args.client_secret, "DISCORD_CLIENT_SECRET")?,
        redirect_uri: require(&args.redirect_uri, "REDIRECT_URI")?,
    };
    let verifier = args
        .public_key
        .as_deref()
        .map(InteractionVerifier::from_hex)
        .transpose()?;

    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    let port = args.port.unwrap_or(config.server.port);
    let address = format!("{bind}:{port}");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        if let Some(token) = &args.bot_token {
            match commands::register(&oauth.client_id, token).await {
                Ok(count) => info!(count, "slash commands registered"),
                Err(e) => warn!(error = %e, "slash command registration failed"),
            }
        }
        if verifier.is_none() {
            warn!("DISCORD_PUBLIC_KEY not set, /interactions is disabled");
        }

        let shops = if args.ephemeral {
            info!("ephemeral mode, nothing is written to disk");
            ShopService::new(
                Arc::new(MemoryShopStore::new()),
                Arc::new(MemoryAuditLogger::new()),
                config.quota_rules(),
            )
        } else {
            info!(data_dir = %context::data_dir().display(), "using file storage");
            context::file_service(&config)
        };

        info!(ceiling = shops.rules().ceiling, "quota rules loaded");

        let state = Arc::new(AppState {
            shops,
            sessions: SessionStore::new(Duration::from_secs(config.server.session_ttl_secs)),
            identity: Arc::new(DiscordOAuth::new(oauth)?),
            commands: CommandRouter::default(),
            verifier,
            admin,
            dashboard_limit: config.audit.dashboard_limit,
        });

        web::serve(state, &address).await
    })
}

fn require(value: &Option<String>, name: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ShopkeeperError::InvalidConfig {
            detail: format!("{name} is not set"),
        }),
    }
}
