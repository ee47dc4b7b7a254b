//! auth::session
//!
//! SessionManager - sole owner of [`TokenState`] and sole caller of the
//! [`SecretStore`].
//!
//! # Operations
//!
//! - [`bootstrap`](SessionManager::bootstrap): load the stored pair once
//! - [`login`](SessionManager::login): obtain, persist, and adopt a pair
//! - [`refresh`](SessionManager::refresh): mint a new access token, or log out
//! - [`logout`](SessionManager::logout): clear memory and storage
//!
//! # Concurrency
//!
//! Every operation takes the transition lock for its whole duration,
//! including awaited network and storage calls, so operations never
//! interleave. Refresh additionally follows the lock-then-recheck pattern:
//!
//! 1. Note the access token the caller saw
//! 2. Acquire the transition lock
//! 3. If the access token has changed, another transition already ran and
//!    the refresh is skipped ([`RefreshOutcome::Coalesced`])
//! 4. Otherwise perform the refresh
//!
//! Any number of callers that hit a 401 with the same token therefore spend
//! the refresh token exactly once.
//!
//! # Refresh is binary
//!
//! After `refresh()` the session either holds a fresh access token backed
//! by an unexpired refresh token, or it is logged out. No error escapes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::claims;
use super::endpoints::{AuthEndpoints, TokenPair};
use super::errors::AuthError;
use super::token_state::{AuthStatus, TokenState};
use crate::secrets::SecretStore;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Result of a refresh attempt. Never an error; failures end in logout.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// A new access token is held and the refresh token is still valid.
    Refreshed,
    /// Another transition changed the access token while this caller
    /// waited; no request was made.
    Coalesced,
    /// The session was cleared. Carries the reason.
    LoggedOut(AuthError),
}

impl RefreshOutcome {
    /// Whether the refresh ended the session.
    pub fn is_logged_out(&self) -> bool {
        matches!(self, RefreshOutcome::LoggedOut(_))
    }
}

/// Owns the session and every transition of it.
pub struct SessionManager {
    endpoints: AuthEndpoints,
    store: Arc<dyn SecretStore>,
    state: watch::Sender<TokenState>,
    transitions: Mutex<()>,
    bootstrapped: AtomicBool,
}

impl SessionManager {
    /// Create a manager with an empty, unauthenticated state.
    ///
    /// Call [`bootstrap`](Self::bootstrap) before issuing protected requests.
    pub fn new(endpoints: AuthEndpoints, store: Arc<dyn SecretStore>) -> Self {
        let (state, _) = watch::channel(TokenState::empty());
        Self {
            endpoints,
            store,
            state,
            transitions: Mutex::new(()),
            bootstrapped: AtomicBool::new(false),
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> TokenState {
        self.state.borrow().clone()
    }

    /// The current authentication status.
    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status()
    }

    /// The access token in effect right now.
    pub fn access_token(&self) -> Option<String> {
        self.state.borrow().access_token().map(str::to_owned)
    }

    /// Subscribe to state changes. The receiver sees every transition.
    pub fn subscribe(&self) -> watch::Receiver<TokenState> {
        self.state.subscribe()
    }

    /// Decoded expiry of the held refresh token, if it has one.
    pub fn refresh_token_expires_at(&self) -> Option<DateTime<Utc>> {
        let refresh = self.state.borrow().refresh_token().map(str::to_owned)?;
        claims::decode_expiry(&refresh).ok()
    }

    /// Load the stored credential pair into memory.
    ///
    /// Runs once; later calls return the current status without touching
    /// storage. Storage errors are logged and treated as an absent pair.
    pub async fn bootstrap(&self) -> AuthStatus {
        let _guard = self.transitions.lock().await;
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return self.status();
        }

        let access = self.read_or_absent(ACCESS_TOKEN_KEY).await;
        let refresh = self.read_or_absent(REFRESH_TOKEN_KEY).await;
        let loaded = TokenState::from_pair(access, refresh);

        if loaded.is_authenticated() {
            info!("restored stored session");
            self.state.send_replace(loaded);
        } else {
            debug!("no complete stored session");
        }
        self.status()
    }

    /// Exchange credentials for a session.
    ///
    /// On success both tokens are persisted and adopted. On any failure the
    /// current state, including a prior session, is left untouched.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AuthFailure`] when the server rejects the login or
    ///   answers with an incomplete body
    /// - [`AuthError::Network`] on transport failure
    /// - [`AuthError::Storage`] when the pair could not be persisted
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<(), AuthError> {
        let _guard = self.transitions.lock().await;

        let pair = self
            .endpoints
            .obtain_pair(identifier, secret)
            .await
            .inspect_err(|e| warn!(error = %e, "login failed"))?;

        self.persist_pair(&pair)
            .await
            .inspect_err(|e| warn!(error = %e, "login succeeded but tokens could not be stored"))?;

        self.state
            .send_replace(TokenState::from_pair(Some(pair.access), Some(pair.refresh)));
        self.bootstrapped.store(true, Ordering::SeqCst);
        info!("login succeeded");
        Ok(())
    }

    /// Refresh the access token.
    ///
    /// Coalesces with any refresh or other transition that completes while
    /// this call waits for the lock.
    pub async fn refresh(&self) -> RefreshOutcome {
        let observed = self.access_token();
        self.refresh_if_current(observed.as_deref()).await
    }

    /// Refresh unless the access token is no longer `observed`.
    ///
    /// `observed` is the token a caller used when it was told the token is
    /// bad. If it has since been replaced (or the session cleared), there
    /// is nothing left to refresh for that caller.
    pub async fn refresh_if_current(&self, observed: Option<&str>) -> RefreshOutcome {
        let _guard = self.transitions.lock().await;

        let current = self.access_token();
        if current.as_deref() != observed {
            debug!("access token changed while waiting; skipping refresh");
            return RefreshOutcome::Coalesced;
        }

        self.refresh_locked().await
    }

    /// Clear the session from memory and storage.
    ///
    /// Idempotent. Each key is deleted independently; a failure on one is
    /// logged and does not stop the other.
    pub async fn logout(&self) {
        let _guard = self.transitions.lock().await;
        self.logout_locked().await;
    }

    async fn refresh_locked(&self) -> RefreshOutcome {
        let refresh_token = self.state.borrow().refresh_token().map(str::to_owned);
        let Some(refresh_token) = refresh_token else {
            return self.force_logout(AuthError::NotAuthenticated).await;
        };

        let access = match self.endpoints.refresh_access(&refresh_token).await {
            Ok(access) => access,
            Err(e) => return self.force_logout(e).await,
        };

        if let Err(e) = self.store.set(ACCESS_TOKEN_KEY, &access).await {
            warn!(error = %e, "failed to persist refreshed access token");
        }
        self.state
            .send_modify(|state| *state = state.with_access_token(access));

        // A refresh token past its expiry cannot serve the next refresh.
        match claims::seconds_remaining(&refresh_token, Utc::now()) {
            Ok(remaining) if remaining > 0 => {
                info!(refresh_valid_for_secs = remaining, "access token refreshed");
                RefreshOutcome::Refreshed
            }
            Ok(_) => self.force_logout(AuthError::Expired).await,
            Err(e) => self.force_logout(e).await,
        }
    }

    async fn force_logout(&self, reason: AuthError) -> RefreshOutcome {
        warn!(reason = %reason, "refresh failed; logging out");
        self.logout_locked().await;
        RefreshOutcome::LoggedOut(reason)
    }

    async fn logout_locked(&self) {
        // Memory first so no request picks up a token being deleted.
        self.state.send_replace(TokenState::empty());

        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.store.delete(key).await {
                warn!(key, error = %e, "failed to delete stored token");
            }
        }
        info!("session cleared");
    }

    /// Write both tokens, or neither.
    ///
    /// If the refresh token cannot be written, the access token slot is put
    /// back to what it held before so storage never pairs a new access token
    /// with an old refresh token.
    async fn persist_pair(&self, pair: &TokenPair) -> Result<(), AuthError> {
        let previous_access = self.store.get(ACCESS_TOKEN_KEY).await?;
        self.store.set(ACCESS_TOKEN_KEY, &pair.access).await?;

        if let Err(e) = self.store.set(REFRESH_TOKEN_KEY, &pair.refresh).await {
            let restored = match previous_access.as_deref() {
                Some(access) => self.store.set(ACCESS_TOKEN_KEY, access).await,
                None => self.store.delete(ACCESS_TOKEN_KEY).await,
            };
            if let Err(rollback) = restored {
                warn!(error = %rollback, "failed to roll back stored access token");
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn read_or_absent(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read stored token; treating as absent");
                None
            }
        }
    }
}

// Custom Debug to avoid exposing tokens
impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("endpoints", &self.endpoints)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
