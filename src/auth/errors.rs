//! auth::errors
//!
//! Error taxonomy for the session lifecycle.
//!
//! # Design
//!
//! The four domain failures map to how the session reacts:
//!
//! - [`AuthError::Storage`]: secure storage failed; always recovered locally
//! - [`AuthError::AuthFailure`]: login rejected or malformed; the caller
//!   stays unauthenticated and sees a failed login
//! - [`AuthError::RefreshFailure`]: any refresh problem; converted into a
//!   forced logout, never raised out of `refresh()`
//! - [`AuthError::Network`]: transport failure; behaves like the domain
//!   failure of the endpoint it happened on
//!
//! Error messages MUST NOT contain tokens or passwords.
//!
//! # Example
//!
//! ```
//! use triage_client::auth::AuthError;
//!
//! let err = AuthError::AuthFailure("server returned 400".to_string());
//! assert!(err.needs_reauth());
//! ```

use thiserror::Error;

/// Errors from authentication operations.
///
/// # Security
///
/// Error messages intentionally do not include token values.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No session exists.
    #[error("not authenticated. Run 'triage login'.")]
    NotAuthenticated,

    /// Login was rejected by the server or the response was malformed.
    #[error("login failed: {0}")]
    AuthFailure(String),

    /// Refresh was rejected by the server or the response was malformed.
    #[error("token refresh failed: {0}")]
    RefreshFailure(String),

    /// The refresh token has passed its embedded expiry.
    #[error("refresh token expired. Run 'triage login' again.")]
    Expired,

    /// A token could not be decoded.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Error from secret storage.
    #[error("secret store error: {0}")]
    Storage(String),

    /// Network error talking to the authentication endpoints.
    #[error("network error: {0}")]
    Network(String),
}

impl AuthError {
    /// Check if this error can only be resolved by logging in again.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated
                | AuthError::AuthFailure(_)
                | AuthError::RefreshFailure(_)
                | AuthError::Expired
                | AuthError::InvalidToken(_)
        )
    }

    /// Check if this error indicates a transient failure that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::Network(_) | AuthError::Storage(_))
    }
}

impl From<crate::secrets::SecretError> for AuthError {
    fn from(err: crate::secrets::SecretError) -> Self {
        AuthError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL; it is harmless here but keeps messages short.
        AuthError::Network(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::SecretError;

    #[test]
    fn not_authenticated_suggests_login() {
        let msg = AuthError::NotAuthenticated.to_string();
        assert!(msg.contains("triage login"));
    }

    #[test]
    fn needs_reauth_classification() {
        assert!(AuthError::NotAuthenticated.needs_reauth());
        assert!(AuthError::AuthFailure("400".into()).needs_reauth());
        assert!(AuthError::RefreshFailure("401".into()).needs_reauth());
        assert!(AuthError::Expired.needs_reauth());

        assert!(!AuthError::Network("reset".into()).needs_reauth());
        assert!(!AuthError::Storage("io".into()).needs_reauth());
    }

    #[test]
    fn is_transient_classification() {
        assert!(AuthError::Network("err".into()).is_transient());
        assert!(AuthError::Storage("err".into()).is_transient());

        assert!(!AuthError::Expired.is_transient());
        assert!(!AuthError::AuthFailure("x".into()).is_transient());
    }

    #[test]
    fn secret_error_converts_to_storage() {
        let err: AuthError = SecretError::WriteError("disk full".into()).into();
        assert!(matches!(err, AuthError::Storage(ref m) if m.contains("disk full")));
    }
}
