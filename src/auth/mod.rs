//! auth
//!
//! Session lifecycle: the token state, the manager that owns it, and the
//! client for the authentication endpoints.
//!
//! # Architecture
//!
//! - Tokens live in a single [`TokenState`] owned by a [`SessionManager`]
//! - The manager is the only writer of that state and the only caller of
//!   the [`SecretStore`](crate::secrets::SecretStore)
//! - Everyone else reads snapshots, subscribes to changes, or goes through
//!   the [`TokenProvider`] seam used by the request gateway
//! - Tokens never appear in logs, errors, or `Debug` output
//!
//! # Components
//!
//! - [`TokenState`] / [`AuthStatus`] - in-memory session record
//! - [`SessionManager`] - bootstrap, login, refresh, logout
//! - [`AuthEndpoints`] - HTTP client for the token endpoints
//! - [`claims`] - expiry decoding for JWT-style tokens
//!
//! # Example
//!
//! ```ignore
//! use triage_client::auth::{AuthEndpoints, SessionManager};
//! use triage_client::secrets;
//!
//! let store = secrets::create_store(secrets::DEFAULT_PROVIDER, None)?;
//! let session = SessionManager::new(AuthEndpoints::new(http, &config.server), store);
//!
//! session.bootstrap().await;
//! if !session.status().is_authenticated() {
//!     session.login("a@b.com", "pw").await?;
//! }
//! ```

pub mod claims;
mod endpoints;
mod errors;
mod session;
mod token_state;

pub use endpoints::{AuthEndpoints, TokenPair};
pub use errors::AuthError;
pub use session::{RefreshOutcome, SessionManager, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use token_state::{AuthStatus, TokenState};

/// Source of bearer tokens for outbound requests.
///
/// # Implementation Notes
///
/// Implementors must:
/// - Return the token in effect at call time, not a cached copy
/// - Coalesce refreshes: when `rejected` is no longer the current token,
///   return [`RefreshOutcome::Coalesced`] without contacting the server
/// - Never log or expose token values
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// The access token to attach right now, if any.
    fn current_token(&self) -> Option<String>;

    /// React to the server rejecting `rejected`.
    async fn refresh_after_rejection(&self, rejected: Option<&str>) -> RefreshOutcome;
}

#[async_trait::async_trait]
impl TokenProvider for SessionManager {
    fn current_token(&self) -> Option<String> {
        self.access_token()
    }

    async fn refresh_after_rejection(&self, rejected: Option<&str>) -> RefreshOutcome {
        self.refresh_if_current(rejected).await
    }
}
