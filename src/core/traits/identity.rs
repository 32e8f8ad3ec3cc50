use async_trait::async_trait;

use crate::core::errors::Result;
use crate::core::models::actor::Actor;

/// Port for the OAuth2 identity provider that signs dashboard users in.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Where to send the browser to start the authorization flow. `state`
    /// comes back unchanged on the callback.
    fn authorize_url(&self, state: &str) -> String;

    /// Trade an authorization code for the signed-in user.
    async fn exchange_code(&self, code: &str) -> Result<Actor>;
}
