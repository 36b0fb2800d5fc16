//! Session management for the meal-ordering client
//!
//! The session owns the access token, the optional refresh token and the
//! authenticated user profile. It is an explicitly constructed, cheaply
//! cloneable handle that gets injected into the HTTP layer and the
//! commands; there is no process-global store.
//!
//! The one concurrency-control concern lives here: at most one token
//! refresh may be in flight. Concurrent callers share the pending refresh
//! through a memoized [`Shared`] future and all observe the same outcome.

pub mod jwt;
pub mod store;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use crate::api::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserProfile,
};
use crate::api::{decode_response, ApiError};
use crate::config::MensaConfig;
use store::SessionStore;

type RefreshFuture = Shared<BoxFuture<'static, Result<String, ApiError>>>;

/// In-memory session state
#[derive(Debug, Default, Clone)]
pub struct SessionData {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

struct Inner {
    base: Url,
    http: reqwest::Client,
    store: SessionStore,
    state: Mutex<SessionData>,
    inflight: tokio::sync::Mutex<Option<RefreshFuture>>,
}

/// Handle on the authentication session
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

impl Session {
    /// Open the session at the default persisted location
    ///
    /// Restores tokens and profile from a previous run when the session
    /// file exists.
    pub fn open(config: &MensaConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_store(
            config.base_url()?,
            http,
            SessionStore::default_location()?,
        ))
    }

    /// Open a session against an explicit store (tests)
    pub fn with_store(base: Url, http: reqwest::Client, store: SessionStore) -> Self {
        let state = store
            .load()
            .map(|stored| SessionData {
                token: stored.token,
                refresh_token: stored.refresh_token,
                user: stored.user,
            })
            .unwrap_or_default();

        Self {
            inner: Arc::new(Inner {
                base,
                http,
                store,
                state: Mutex::new(state),
                inflight: tokio::sync::Mutex::new(None),
            }),
        }
    }

    /// Snapshot of the current session state
    pub fn snapshot(&self) -> SessionData {
        self.inner.state.lock().expect("session state poisoned").clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.lock().expect("session state poisoned").token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.lock().expect("session state poisoned").user.clone()
    }

    /// A held access token means "considered authenticated"; validity is
    /// checked lazily when requests go out.
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.lock().expect("session state poisoned").token.is_some()
    }

    /// Whether a refresh is currently in flight
    pub async fn is_refreshing(&self) -> bool {
        self.inner.inflight.lock().await.is_some()
    }

    /// Authenticate against the backend and persist the session
    ///
    /// On success the access token, the optional refresh token and the
    /// freshly fetched user profile (with role) replace the session state.
    /// On failure any prior session is left untouched; an HTTP 400 carries
    /// the backend's message.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<UserProfile, ApiError> {
        let url = self.endpoint("api/auth/local")?;
        let resp = self
            .inner
            .http
            .post(url)
            .json(&LoginRequest {
                identifier: identifier.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(ApiError::transport)?;

        let login: LoginResponse = decode_response(resp, "Login failed").await?;
        let profile = self.fetch_profile(&login.jwt).await?;

        {
            let mut state = self.inner.state.lock().expect("session state poisoned");
            state.token = Some(login.jwt);
            state.refresh_token = login.refresh_token;
            state.user = Some(profile.clone());
        }
        self.persist();

        tracing::info!(user = %profile.username, "logged in");
        Ok(profile)
    }

    /// Return a token that is safe to attach to a request
    ///
    /// The current token is returned unchanged while its `exp` claim is
    /// more than 60 seconds away. An expired or undecodable token delegates
    /// to [`Self::refresh_access_token`]. `None` means no token is held or
    /// the refresh failed; callers fall back to unauthenticated behavior.
    pub async fn ensure_valid_token(&self) -> Option<String> {
        let token = self.token()?;

        if !jwt::is_expired(&token) {
            return Some(token);
        }

        match self.refresh_access_token().await {
            Ok(token) => Some(token),
            Err(err) => {
                tracing::warn!("failed to refresh token: {}", err);
                None
            }
        }
    }

    /// Obtain a fresh access token, coalescing concurrent callers
    ///
    /// If a refresh is already in flight every caller awaits the same
    /// shared future; only one network round trip happens. On success the
    /// access token (and the refresh token, when rotated) is replaced and
    /// persisted. On failure the entire session is cleared and the error is
    /// re-raised. The in-flight slot is cleared when the refresh settles,
    /// regardless of outcome.
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let fut = {
            let mut slot = self.inner.inflight.lock().await;
            match slot.as_ref() {
                Some(fut) => fut.clone(),
                None => {
                    let session = self.clone();
                    let fut = async move { session.run_refresh().await }.boxed().shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };

        fut.await
    }

    async fn run_refresh(&self) -> Result<String, ApiError> {
        let result = self.perform_refresh().await;

        // Settled: drop the in-flight handle before surfacing the result
        *self.inner.inflight.lock().await = None;

        if result.is_err() {
            self.logout();
        }
        result
    }

    async fn perform_refresh(&self) -> Result<String, ApiError> {
        let refresh_token = {
            let state = self.inner.state.lock().expect("session state poisoned");
            state.refresh_token.clone()
        };
        let Some(refresh_token) = refresh_token else {
            return Err(ApiError::SessionExpired);
        };

        let url = self.endpoint("api/auth/local/refresh")?;
        let resp = self
            .inner
            .http
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(ApiError::transport)?;

        let refreshed: RefreshResponse = decode_response(resp, "Token refresh failed").await?;

        {
            let mut state = self.inner.state.lock().expect("session state poisoned");
            state.token = Some(refreshed.jwt.clone());
            if let Some(rotated) = refreshed.refresh_token {
                state.refresh_token = Some(rotated);
            }
        }
        self.persist();

        tracing::debug!("access token refreshed");
        Ok(refreshed.jwt)
    }

    /// Clear tokens and profile unconditionally; never fails
    pub fn logout(&self) {
        {
            let mut state = self.inner.state.lock().expect("session state poisoned");
            *state = SessionData::default();
        }
        self.inner.store.clear();
        tracing::info!("session cleared");
    }

    /// Refetch the user profile with the held token and store it
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        let token = self.token().ok_or(ApiError::Unauthorized)?;
        let profile = self.fetch_profile(&token).await?;
        {
            let mut state = self.inner.state.lock().expect("session state poisoned");
            state.user = Some(profile.clone());
        }
        self.persist();
        Ok(profile)
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ApiError> {
        let url = self.endpoint("api/users/me")?;
        let resp = self
            .inner
            .http
            .get(url)
            .query(&[("populate", "role")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(ApiError::transport)?;

        decode_response(resp, "Failed to load user profile").await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {}: {}", path, e)))
    }

    fn persist(&self) {
        let state = self.snapshot();
        if let Err(e) = self.inner.store.save(
            state.token.as_deref(),
            state.refresh_token.as_deref(),
            state.user.as_ref(),
        ) {
            tracing::warn!("failed to persist session: {}", e);
        }
    }

    /// Seed session state directly (tests)
    #[doc(hidden)]
    pub fn set_tokens(&self, token: Option<String>, refresh_token: Option<String>) {
        {
            let mut state = self.inner.state.lock().expect("session state poisoned");
            state.token = token;
            state.refresh_token = refresh_token;
        }
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_session(temp: &TempDir) -> Session {
        Session::with_store(
            Url::parse("http://127.0.0.1:9/").unwrap(),
            reqwest::Client::new(),
            SessionStore::at(temp.path().join("session.json")),
        )
    }

    #[tokio::test]
    async fn test_fresh_token_returned_without_network() {
        let temp = TempDir::new().unwrap();
        let session = test_session(&temp);
        // Base URL points at a closed port: any network call would error
        let token = jwt::make_token(chrono::Utc::now().timestamp() + 3600);
        session.set_tokens(Some(token.clone()), None);

        assert_eq!(session.ensure_valid_token().await, Some(token));
    }

    #[tokio::test]
    async fn test_no_token_yields_none() {
        let temp = TempDir::new().unwrap();
        let session = test_session(&temp);
        assert_eq!(session.ensure_valid_token().await, None);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let temp = TempDir::new().unwrap();
        let session = test_session(&temp);
        session.set_tokens(Some("tok".into()), Some("refresh".into()));
        assert!(session.is_authenticated());

        session.logout();
        let state = session.snapshot();
        assert!(state.token.is_none());
        assert!(state.refresh_token.is_none());
        assert!(state.user.is_none());
        assert!(!temp.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_session_restored_from_store() {
        let temp = TempDir::new().unwrap();
        {
            let session = test_session(&temp);
            session.set_tokens(Some("tok".into()), Some("refresh".into()));
        }
        let restored = test_session(&temp);
        assert_eq!(restored.token().as_deref(), Some("tok"));
        assert_eq!(restored.snapshot().refresh_token.as_deref(), Some("refresh"));
        // Transient refresh state never survives a restart
        assert!(!restored.is_refreshing().await);
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_clears_session() {
        let temp = TempDir::new().unwrap();
        let session = test_session(&temp);
        session.set_tokens(Some("expired".into()), None);

        let err = session.refresh_access_token().await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));
        assert!(!session.is_authenticated());
        assert!(!session.is_refreshing().await);
    }
}
