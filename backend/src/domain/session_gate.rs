//! Session gate: tracks the authenticated identity and gates the officials
//! dashboard behind the authorization policy.
//!
//! The gate drives two ports: the hosted auth backend for credential checks
//! and the [`AuthorizationPolicy`] for privilege derivation. Valid
//! credentials with a non-authorized email are treated as an authorization
//! error, never a silent success: the backend session is forcibly revoked.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::ports::{AuthBackend, AuthorizationPolicy};
use crate::domain::{AuthError, Credentials, Identity, SignUpForm, SignUpValidationError};

/// Which top-level view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    /// Public live map, always available.
    #[default]
    Citizen,
    /// Privileged dashboard, reachable only while an identity is privileged.
    Officials,
}

/// Gate states. `Authenticating` covers the in-flight credential check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Privileged(Identity),
}

/// Account-creation failures: local validation or a backend rejection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignUpError {
    #[error(transparent)]
    Invalid(#[from] SignUpValidationError),
    #[error(transparent)]
    Backend(#[from] AuthError),
}

struct GateState {
    session: SessionState,
    active_view: ActiveView,
}

/// Session gate over the auth backend and authorization policy.
pub struct SessionGate {
    backend: Arc<dyn AuthBackend>,
    policy: Arc<dyn AuthorizationPolicy>,
    state: RwLock<GateState>,
}

impl SessionGate {
    /// Wire the gate to its ports. The initial state is anonymous on the
    /// citizen view.
    pub fn new(backend: Arc<dyn AuthBackend>, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        Self {
            backend,
            policy,
            state: RwLock::new(GateState {
                session: SessionState::default(),
                active_view: ActiveView::default(),
            }),
        }
    }

    /// Current gate state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.session.clone()
    }

    /// Currently active top-level view.
    pub async fn active_view(&self) -> ActiveView {
        self.state.read().await.active_view
    }

    /// The privileged identity, if one is retained.
    pub async fn identity(&self) -> Option<Identity> {
        match &self.state.read().await.session {
            SessionState::Privileged(identity) => Some(identity.clone()),
            _ => None,
        }
    }

    /// Re-check an email against the policy; used wherever privilege must be
    /// derived at read time rather than trusted from an earlier decision.
    pub fn is_authorized(&self, email: &crate::domain::EmailAddress) -> bool {
        self.policy.is_authorized(email)
    }

    /// Switch the active view. The officials view requires a privileged
    /// identity and is refused otherwise.
    pub async fn set_active_view(&self, view: ActiveView) -> Result<(), AuthError> {
        let mut state = self.state.write().await;
        if view == ActiveView::Officials
            && !matches!(state.session, SessionState::Privileged(_))
        {
            return Err(AuthError::Unauthorized);
        }
        state.active_view = view;
        Ok(())
    }

    /// Authenticate and derive privilege.
    ///
    /// On success with an authorized email the gate becomes privileged and
    /// the officials view activates. Valid credentials for an email outside
    /// the policy sign the backend session straight back out and surface
    /// [`AuthError::Unauthorized`].
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        self.state.write().await.session = SessionState::Authenticating;

        let user = match self.backend.sign_in(credentials).await {
            Ok(user) => user,
            Err(err) => {
                self.state.write().await.session = SessionState::Anonymous;
                return Err(AuthError::from_sign_in(err));
            }
        };

        let identity = Identity::derive(user.email, self.policy.as_ref());
        if !identity.is_privileged {
            warn!(email = %identity.email, "sign-in by non-authorized email; revoking session");
            self.revoke_backend_session().await;
            self.state.write().await.session = SessionState::Anonymous;
            return Err(AuthError::Unauthorized);
        }

        info!(email = %identity.email, "official signed in");
        let mut state = self.state.write().await;
        state.session = SessionState::Privileged(identity.clone());
        state.active_view = ActiveView::Officials;
        Ok(identity)
    }

    /// Create an account. Local validation runs first; the backend is not
    /// contacted when it fails. Success does not authenticate.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<(), SignUpError> {
        let credentials = form.validate()?;
        let user = self
            .backend
            .create_account(&credentials)
            .await
            .map_err(AuthError::from_sign_up)?;
        info!(email = %user.email, "account created");
        Ok(())
    }

    /// Revoke the session and return to the citizen view.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.revoke_backend_session().await;
        let mut state = self.state.write().await;
        state.session = SessionState::Anonymous;
        state.active_view = ActiveView::Citizen;
        info!("signed out");
        Ok(())
    }

    /// Apply an externally observed auth-state change.
    ///
    /// Privilege is re-derived from the policy on every change; an identity
    /// that no longer passes is silently signed out.
    pub async fn apply_auth_state(
        &self,
        user: Option<crate::domain::ports::AuthenticatedUser>,
    ) {
        match user {
            Some(user) => {
                let identity = Identity::derive(user.email, self.policy.as_ref());
                if identity.is_privileged {
                    self.state.write().await.session = SessionState::Privileged(identity);
                } else {
                    warn!(email = %identity.email, "auth state holds non-authorized email; signing out");
                    self.revoke_backend_session().await;
                    let mut state = self.state.write().await;
                    state.session = SessionState::Anonymous;
                    state.active_view = ActiveView::Citizen;
                }
            }
            None => {
                let mut state = self.state.write().await;
                if !matches!(state.session, SessionState::Anonymous) {
                    state.session = SessionState::Anonymous;
                    state.active_view = ActiveView::Citizen;
                }
            }
        }
    }

    async fn revoke_backend_session(&self) {
        if let Err(err) = self.backend.sign_out().await {
            // The local session is cleared regardless; the backend session
            // expires on its own.
            warn!(error = %err, "backend sign-out failed");
        }
    }
}

/// Run the passive auth-state subscription until the backend closes it.
///
/// The returned handle should be aborted (or awaited) on shutdown.
pub fn run_auth_observer(gate: Arc<SessionGate>) -> JoinHandle<()> {
    let mut receiver = gate.backend.auth_state();
    tokio::spawn(async move {
        loop {
            let current = receiver.borrow_and_update().clone();
            gate.apply_auth_state(current).await;
            if receiver.changed().await.is_err() {
                break;
            }
        }
    })
}
