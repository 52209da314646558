//! Capability deciding which identities may use the officials dashboard.
//!
//! The session gate depends on this trait rather than a hardcoded list, so a
//! real role/claims lookup can replace [`StaticAllowList`] without changing
//! the gate's contract.

use std::collections::BTreeSet;

use crate::domain::EmailAddress;

/// Decides whether an email belongs to an authorized official.
pub trait AuthorizationPolicy: Send + Sync {
    /// Membership is evaluated at call time, never cached by callers.
    fn is_authorized(&self, email: &EmailAddress) -> bool;
}

/// Static allow-list of official email addresses.
#[derive(Debug, Clone, Default)]
pub struct StaticAllowList {
    emails: BTreeSet<String>,
}

impl StaticAllowList {
    /// Build a policy from explicit addresses.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// The demo allow-list used until a directory-backed policy exists.
    pub fn demo() -> Self {
        Self::new([
            "admin@citypulse.com",
            "official@citypulse.com",
            "rajeevtiktok01@gmail.com",
        ])
    }
}

impl AuthorizationPolicy for StaticAllowList {
    fn is_authorized(&self, email: &EmailAddress) -> bool {
        self.emails.contains(email.as_str())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin@citypulse.com", true)]
    #[case("official@citypulse.com", true)]
    #[case("random@x.com", false)]
    fn demo_list_membership(#[case] email: &str, #[case] expected: bool) {
        let policy = StaticAllowList::demo();
        let email = EmailAddress::new(email).expect("valid email");
        assert_eq!(policy.is_authorized(&email), expected);
    }

    #[rstest]
    fn empty_list_authorizes_nobody() {
        let policy = StaticAllowList::default();
        let email = EmailAddress::new("admin@citypulse.com").expect("valid email");
        assert!(!policy.is_authorized(&email));
    }
}
