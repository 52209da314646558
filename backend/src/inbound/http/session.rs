//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the signed-in
//! email. Privilege is never stored: it is re-derived from the authorization
//! policy on every privileged request.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{EmailAddress, Error};

pub(crate) const IDENTITY_EMAIL_KEY: &str = "identity_email";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in email in the session cookie.
    pub fn persist_email(&self, email: &EmailAddress) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_EMAIL_KEY, email.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the signed-in email from the session, if present.
    pub fn email(&self) -> Result<Option<EmailAddress>, Error> {
        let raw = self
            .0
            .get::<String>(IDENTITY_EMAIL_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match EmailAddress::new(&raw) {
                Ok(email) => Ok(Some(email)),
                Err(error) => {
                    tracing::warn!("invalid email in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require a signed-in email or return `401 Unauthorized`.
    pub fn require_email(&self) -> Result<EmailAddress, Error> {
        self.email()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop all session state.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
