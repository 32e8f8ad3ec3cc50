use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::adapters::discord::{DISCORD_API, build_client, upstream};
use crate::core::errors::Result;
use crate::core::models::actor::Actor;
use crate::core::traits::identity::IdentityProvider;

const AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";

/// OAuth2 application settings.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Signs dashboard users in with their Discord account (`identify` scope).
pub struct DiscordOAuth {
    settings: OAuthSettings,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    global_name: Option<String>,
}

impl DiscordOAuth {
    pub fn new(settings: OAuthSettings) -> Result<Self> {
        Ok(Self {
            settings,
            http: build_client()?,
        })
    }
}

#[async_trait]
impl IdentityProvider for DiscordOAuth {
    fn authorize_url(&self, state: &str) -> String {
        let params = [
            ("client_id", self.settings.client_id.as_str()),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "identify"),
            ("state", state),
        ];
        match Url::parse_with_params(AUTHORIZE_URL, &params) {
            Ok(url) => url.into(),
            Err(e) => {
                // AUTHORIZE_URL is a constant, so this only fires on a broken build
                warn!(error = %e, "could not build authorize URL");
                AUTHORIZE_URL.to_string()
            }
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<Actor> {
        let form = [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
        ];

        let resp = self
            .http
            .post(format!("{DISCORD_API}/oauth2/token"))
            .form(&form)
            .send()
            .await
            .map_err(|e| upstream(format!("token request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(upstream(format!(
                "token endpoint returned status {}",
                resp.status()
            )));
        }
        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| upstream(format!("failed to parse token response: {e}")))?;

        let resp = self
            .http
            .get(format!("{DISCORD_API}/users/@me"))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| upstream(format!("user request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(upstream(format!(
                "user endpoint returned status {}",
                resp.status()
            )));
        }
        let user: DiscordUser = resp
            .json()
            .await
            .map_err(|e| upstream(format!("failed to parse user response: {e}")))?;

        debug!(user_id = %user.id, "discord login");
        Ok(Actor::new(user.id, user.global_name.unwrap_or(user.username)))
    }
}
