//! In-memory auth backend used until the hosted service is wired.
//!
//! Preserves the development behaviour: a small set of seeded accounts
//! authenticates with fixed passwords, and the auth-state stream reflects the
//! most recent sign-in/sign-out.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::ports::{
    AuthBackend, AuthBackendError, AuthStateReceiver, AuthenticatedUser,
};
use crate::domain::Credentials;

/// Fixture accounts plus a broadcastable auth state.
pub struct FixtureAuthBackend {
    accounts: Mutex<HashMap<String, String>>,
    state_tx: watch::Sender<Option<AuthenticatedUser>>,
}

impl FixtureAuthBackend {
    /// Seed the demo officials plus any extra accounts.
    pub fn demo() -> Self {
        Self::with_accounts([
            ("admin@citypulse.com", "password123"),
            ("official@citypulse.com", "password123"),
        ])
    }

    /// Build a backend with explicit email/password pairs.
    pub fn with_accounts<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let accounts = accounts
            .into_iter()
            .map(|(email, password)| (email.into(), password.into()))
            .collect();
        let (state_tx, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(accounts),
            state_tx,
        }
    }

    /// The identity the backend currently reports, if any.
    pub fn current_user(&self) -> Option<AuthenticatedUser> {
        self.state_tx.borrow().clone()
    }

    fn lock_accounts(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AuthBackendError> {
        self.accounts
            .lock()
            .map_err(|_| AuthBackendError::failure("fixture account table poisoned"))
    }
}

#[async_trait]
impl AuthBackend for FixtureAuthBackend {
    async fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticatedUser, AuthBackendError> {
        let accounts = self.lock_accounts()?;
        let Some(stored) = accounts.get(credentials.email().as_str()) else {
            return Err(AuthBackendError::UserNotFound);
        };
        if stored != credentials.password() {
            return Err(AuthBackendError::WrongPassword);
        }
        let user = AuthenticatedUser::new(credentials.email().clone());
        // send_replace keeps the state current even with no observer yet.
        self.state_tx.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn create_account(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthenticatedUser, AuthBackendError> {
        let mut accounts = self.lock_accounts()?;
        let email = credentials.email().as_str().to_owned();
        if accounts.contains_key(&email) {
            return Err(AuthBackendError::EmailAlreadyInUse);
        }
        accounts.insert(email, credentials.password().to_owned());
        Ok(AuthenticatedUser::new(credentials.email().clone()))
    }

    async fn sign_out(&self) -> Result<(), AuthBackendError> {
        self.state_tx.send_replace(None);
        Ok(())
    }

    fn auth_state(&self) -> AuthStateReceiver {
        self.state_tx.subscribe()
    }
}
