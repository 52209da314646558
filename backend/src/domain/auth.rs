//! Authentication primitives: email addresses, credentials, and sign-up forms.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::AuthBackendError;
use crate::domain::{Error, ErrorCode};

/// Minimum password length enforced before the auth backend is contacted.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing, blank once trimmed, or not an address shape.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a non-empty address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// A trimmed, minimally validated email address.
///
/// ## Invariants
/// - Non-empty after trimming.
/// - Contains exactly one `@` with non-empty local and domain parts.
///
/// # Examples
/// ```
/// use citypulse::domain::EmailAddress;
///
/// let email = EmailAddress::new("admin@citypulse.com").unwrap();
/// assert_eq!(email.as_str(), "admin@citypulse.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Construct an address from raw input.
    pub fn new(raw: &str) -> Result<Self, CredentialsValidationError> {
        let trimmed = raw.trim();
        let mut parts = trimmed.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(CredentialsValidationError::InvalidEmail),
        }
    }

    /// Address string suitable for allow-list lookups.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = CredentialsValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validated sign-in credentials used by the session gate.
///
/// The password retains caller-provided whitespace to avoid surprising
/// credential comparisons, and is zeroized on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for backend lookups and policy checks.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for the account-creation form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignUpValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password should be at least {minimum} characters")]
    PasswordTooShort { minimum: usize },
    #[error(transparent)]
    Credentials(#[from] CredentialsValidationError),
}

/// Account-creation form with local validation rules.
///
/// Validation runs before the auth backend is contacted: passwords must
/// match and meet [`MIN_PASSWORD_LENGTH`].
#[derive(Debug, Clone)]
pub struct SignUpForm {
    email: String,
    password: String,
    confirm_password: String,
}

impl SignUpForm {
    /// Build a form from raw inputs; validation happens in [`Self::validate`].
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Run the local checks and produce backend-ready credentials.
    pub fn validate(&self) -> Result<Credentials, SignUpValidationError> {
        if self.password != self.confirm_password {
            return Err(SignUpValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(SignUpValidationError::PasswordTooShort {
                minimum: MIN_PASSWORD_LENGTH,
            });
        }
        Ok(Credentials::try_from_parts(&self.email, &self.password)?)
    }
}

/// Authentication failures surfaced to callers of the session gate.
///
/// Messages mirror what citizens and officials see inline under the
/// relevant form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("User account has been disabled")]
    DisabledAccount,
    #[error("No user found with this email")]
    UnknownAccount,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("This email is already registered")]
    EmailInUse,
    #[error("Email/password accounts are not enabled")]
    AccountCreationDisabled,
    #[error("Access restricted to authorized officials only")]
    Unauthorized,
    #[error("{message}")]
    Generic { message: String },
}

impl AuthError {
    /// Map a sign-in failure reported by the auth backend.
    pub fn from_sign_in(error: AuthBackendError) -> Self {
        match error {
            AuthBackendError::InvalidEmail => Self::InvalidEmail,
            AuthBackendError::UserDisabled => Self::DisabledAccount,
            AuthBackendError::UserNotFound => Self::UnknownAccount,
            AuthBackendError::WrongPassword => Self::WrongPassword,
            _ => Self::Generic {
                message: "Failed to sign in. Please try again.".to_owned(),
            },
        }
    }

    /// Map an account-creation failure reported by the auth backend.
    pub fn from_sign_up(error: AuthBackendError) -> Self {
        match error {
            AuthBackendError::EmailAlreadyInUse => Self::EmailInUse,
            AuthBackendError::InvalidEmail => Self::InvalidEmail,
            AuthBackendError::OperationNotAllowed => Self::AccountCreationDisabled,
            _ => Self::Generic {
                message: "Failed to create account. Please try again.".to_owned(),
            },
        }
    }
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        let code = match value {
            AuthError::InvalidEmail => ErrorCode::InvalidRequest,
            AuthError::DisabledAccount | AuthError::AccountCreationDisabled => ErrorCode::Forbidden,
            AuthError::UnknownAccount | AuthError::WrongPassword => ErrorCode::Unauthorized,
            AuthError::EmailInUse => ErrorCode::Conflict,
            AuthError::Unauthorized => ErrorCode::Forbidden,
            AuthError::Generic { .. } => ErrorCode::Unauthorized,
        };
        Self::new(code, value.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("no-at-sign")]
    #[case("@missing-local.com")]
    #[case("missing-domain@")]
    #[case("two@at@signs")]
    fn rejects_malformed_emails(#[case] raw: &str) {
        let err = EmailAddress::new(raw).expect_err("malformed email must fail");
        assert_eq!(err, CredentialsValidationError::InvalidEmail);
    }

    #[rstest]
    #[case("  admin@citypulse.com  ", "admin@citypulse.com")]
    #[case("official@citypulse.com", "official@citypulse.com")]
    fn trims_valid_emails(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    fn credentials_require_a_password() {
        let err = Credentials::try_from_parts("admin@citypulse.com", "")
            .expect_err("empty password must fail");
        assert_eq!(err, CredentialsValidationError::EmptyPassword);
    }

    #[rstest]
    #[case("password123", "different", SignUpValidationError::PasswordMismatch)]
    #[case("short", "short", SignUpValidationError::PasswordTooShort { minimum: 6 })]
    fn sign_up_form_rejects_weak_input(
        #[case] password: &str,
        #[case] confirm: &str,
        #[case] expected: SignUpValidationError,
    ) {
        let form = SignUpForm::new("official@citypulse.com", password, confirm);
        let err = form.validate().expect_err("validation must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn sign_up_form_accepts_matching_passwords() {
        let form = SignUpForm::new("official@citypulse.com", "password123", "password123");
        let creds = form.validate().expect("valid form");
        assert_eq!(creds.email().as_str(), "official@citypulse.com");
    }

    #[rstest]
    #[case(AuthBackendError::InvalidEmail, AuthError::InvalidEmail)]
    #[case(AuthBackendError::UserDisabled, AuthError::DisabledAccount)]
    #[case(AuthBackendError::UserNotFound, AuthError::UnknownAccount)]
    #[case(AuthBackendError::WrongPassword, AuthError::WrongPassword)]
    fn maps_sign_in_failures(#[case] backend: AuthBackendError, #[case] expected: AuthError) {
        assert_eq!(AuthError::from_sign_in(backend), expected);
    }

    #[rstest]
    fn unexpected_sign_in_failures_fall_back_to_generic() {
        let err = AuthError::from_sign_in(AuthBackendError::failure("socket closed"));
        assert_eq!(err.to_string(), "Failed to sign in. Please try again.");
    }

    #[rstest]
    #[case(AuthBackendError::EmailAlreadyInUse, AuthError::EmailInUse)]
    #[case(AuthBackendError::InvalidEmail, AuthError::InvalidEmail)]
    #[case(
        AuthBackendError::OperationNotAllowed,
        AuthError::AccountCreationDisabled
    )]
    fn maps_sign_up_failures(#[case] backend: AuthBackendError, #[case] expected: AuthError) {
        assert_eq!(AuthError::from_sign_up(backend), expected);
    }
}
