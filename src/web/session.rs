use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, HeaderValue, header};
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::core::models::actor::Actor;

pub const SESSION_COOKIE: &str = "shopkeeper_session";

/// Server-side state behind a session cookie.
#[derive(Debug, Clone)]
pub struct Session {
    /// Passed the username/password step.
    pub admin: bool,
    /// Discord account, set after the OAuth2 callback.
    pub user: Option<Actor>,
    /// Pending OAuth2 `state`, single use.
    oauth_state: Option<String>,
    expires_at: Instant,
}

/// In-memory session table keyed by the SHA-256 of the cookie token, so a
/// dump of the table cannot be replayed as cookies.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a fresh admin session and return its cookie token.
    pub fn create_admin(&self) -> String {
        let token = random_hex();

        let now = Instant::now();
        let session = Session {
            admin: true,
            user: None,
            oauth_state: None,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(digest(&token), session);
        token
    }

    /// Look up a live session.
    pub fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(&digest(token))
            .filter(|s| s.expires_at > Instant::now())
            .cloned()
    }

    /// Attach the signed-in Discord user. Returns `false` if the session
    /// is gone or expired.
    pub fn set_user(&self, token: &str, user: Actor) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        match sessions.get_mut(&digest(token)) {
            Some(s) if s.expires_at > Instant::now() => {
                s.user = Some(user);
                true
            }
            _ => false,
        }
    }

    /// Start an OAuth2 round trip: store a fresh `state` on the session and
    /// return it. `None` if the session is gone or expired.
    pub fn begin_oauth(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let session = sessions
            .get_mut(&digest(token))
            .filter(|s| s.expires_at > Instant::now())?;
        let state = random_hex();
        session.oauth_state = Some(state.clone());
        Some(state)
    }

    /// Check the `state` returned on the callback against the pending one.
    /// The pending value is consumed whether or not it matches.
    pub fn finish_oauth(&self, token: &str, returned: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let Some(expected) = sessions
            .get_mut(&digest(token))
            .and_then(|s| s.oauth_state.take())
        else {
            return false;
        };
        expected.as_bytes().ct_eq(returned.as_bytes()).into()
    }

    pub fn remove(&self, token: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(&digest(token));
    }
}

fn random_hex() -> String {
    let mut raw = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut raw);
    hex::encode(raw)
}

fn digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Extract the session token from the `Cookie` header(s).
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value for a new session.
pub fn session_cookie(token: &str, ttl: Duration) -> HeaderValue {
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    );
    // hex token and fixed attributes are always valid header characters
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// `Set-Cookie` value that removes the session cookie.
pub fn expired_cookie() -> HeaderValue {
    HeaderValue::from_static("shopkeeper_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_get_and_set_user() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create_admin();

        let session = store.get(&token).unwrap();
        assert!(session.admin);
        assert!(session.user.is_none());

        assert!(store.set_user(&token, Actor::new("1", "alice")));
        assert_eq!(store.get(&token).unwrap().user.unwrap().name, "alice");
    }

    #[test]
    fn oauth_state_is_single_use() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create_admin();
        assert!(!store.finish_oauth(&token, ""));

        let state = store.begin_oauth(&token).unwrap();
        assert_eq!(state.len(), 64);
        assert!(store.finish_oauth(&token, &state));
        assert!(!store.finish_oauth(&token, &state));

        let state = store.begin_oauth(&token).unwrap();
        assert!(!store.finish_oauth(&token, "forged"));
        assert!(!store.finish_oauth(&token, &state));

        assert!(store.begin_oauth("nope").is_none());
    }

    #[test]
    fn unknown_and_removed_tokens() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(store.get("nope").is_none());
        assert!(!store.set_user("nope", Actor::new("1", "a")));

        let token = store.create_admin();
        store.remove(&token);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn expired_sessions_are_invisible() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create_admin();
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn tokens_are_stored_hashed() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create_admin();
        let sessions = store.sessions.read().unwrap();
        assert!(!sessions.contains_key(&token));
        assert!(sessions.contains_key(&digest(&token)));
    }

    #[test]
    fn cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; shopkeeper_session=abc123; other=1"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc123"));

        let empty = HeaderMap::new();
        assert!(token_from_headers(&empty).is_none());
    }
}
