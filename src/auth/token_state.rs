//! auth::token_state
//!
//! In-memory authentication record.
//!
//! # Invariants
//!
//! - The state is authenticated iff both tokens are present and non-empty.
//!   Authentication status is derived from the tokens, never stored
//!   separately, so the two cannot disagree.
//! - Only the session manager mutates a `TokenState`; everyone else gets
//!   clones through [`crate::auth::SessionManager::state`].
//!
//! # Security
//!
//! `Debug` is implemented by hand and redacts token values.

use std::fmt;

/// Authentication status derived from [`TokenState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// No usable session.
    Unauthenticated,
    /// Both tokens are held.
    Authenticated,
}

impl AuthStatus {
    /// Whether this status is [`AuthStatus::Authenticated`].
    pub fn is_authenticated(self) -> bool {
        self == AuthStatus::Authenticated
    }
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatus::Unauthenticated => write!(f, "not_authenticated"),
            AuthStatus::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// The authoritative in-memory record of the session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl TokenState {
    /// An unauthenticated state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a state from a credential pair.
    ///
    /// Empty strings are treated as absent, so a pair with an empty half
    /// yields an unauthenticated state.
    pub(crate) fn from_pair(access: Option<String>, refresh: Option<String>) -> Self {
        match (non_empty(access), non_empty(refresh)) {
            (Some(access), Some(refresh)) => Self {
                access_token: Some(access),
                refresh_token: Some(refresh),
            },
            _ => Self::empty(),
        }
    }

    /// Whether both tokens are held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    /// The derived status.
    pub fn status(&self) -> AuthStatus {
        if self.is_authenticated() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The current refresh token, if any.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Replace only the access token, keeping the refresh token.
    ///
    /// Ignored when there is no session to attach it to or the new token is
    /// empty; both would break the invariant.
    pub(crate) fn with_access_token(&self, access: String) -> Self {
        if !self.is_authenticated() || access.is_empty() {
            return self.clone();
        }
        Self {
            access_token: Some(access),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// Custom Debug to avoid exposing tokens
impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field("is_authenticated", &self.is_authenticated())
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
