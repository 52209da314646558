//! Driven port for the hosted authentication service.
//!
//! In hexagonal terms this is a *driven* port: the session gate calls it to
//! authenticate credentials without knowing (or importing) the backing
//! service's SDK. Tests substitute a mock so gate behaviour stays
//! deterministic.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{Credentials, EmailAddress};

/// The identity the auth service reports after a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: EmailAddress,
}

impl AuthenticatedUser {
    /// Wrap a verified email address.
    pub fn new(email: EmailAddress) -> Self {
        Self { email }
    }
}

/// Failure kinds reported by the auth service.
///
/// These mirror the hosted service's error codes; [`crate::domain::AuthError`]
/// maps them onto user-facing messages per operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthBackendError {
    #[error("auth backend rejected the email address")]
    InvalidEmail,
    #[error("account is disabled")]
    UserDisabled,
    #[error("no account exists for this email")]
    UserNotFound,
    #[error("password did not match")]
    WrongPassword,
    #[error("an account already exists for this email")]
    EmailAlreadyInUse,
    #[error("email/password accounts are not enabled")]
    OperationNotAllowed,
    #[error("auth backend failure: {message}")]
    Failure { message: String },
}

impl AuthBackendError {
    /// Build the catch-all failure variant.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

/// Continuous auth-state subscription, the equivalent of the SDK's
/// `onAuthStateChanged` callback. `None` means signed out.
pub type AuthStateReceiver = watch::Receiver<Option<AuthenticatedUser>>;

/// Driven port wrapping the hosted auth service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Verify credentials and establish a backend session.
    async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticatedUser, AuthBackendError>;

    /// Create a new account. Does not establish a session.
    async fn create_account(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticatedUser, AuthBackendError>;

    /// Revoke the current backend session.
    async fn sign_out(&self) -> Result<(), AuthBackendError>;

    /// Subscribe to auth-state changes.
    fn auth_state(&self) -> AuthStateReceiver;
}
