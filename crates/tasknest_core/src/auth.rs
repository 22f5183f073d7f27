//! Caller identity resolution.
//!
//! # Responsibility
//! - Turn the ambient identity supplied by the session provider into a
//!   `UserId` before any storage access.
//!
//! # Invariants
//! - A missing or blank identity always fails with `Unauthenticated`.
//! - Resolution never touches storage.

use crate::model::user::UserId;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Source of the authenticated caller for one request.
///
/// Implemented by the identity/session collaborator.
pub trait IdentityProvider {
    /// Returns the raw caller token, or `None` when nobody is signed in.
    fn authenticated_user(&self) -> Option<String>;
}

impl<P: IdentityProvider + ?Sized> IdentityProvider for &P {
    fn authenticated_user(&self) -> Option<String> {
        (**self).authenticated_user()
    }
}

/// Fixed identity, for embedding hosts that resolve sessions up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    user: Option<String>,
}

impl StaticIdentity {
    pub fn user(token: impl Into<String>) -> Self {
        Self {
            user: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn authenticated_user(&self) -> Option<String> {
        self.user.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    Unauthenticated,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not authenticated"),
        }
    }
}

impl Error for AuthError {}

/// Resolves the caller for the current request.
pub fn resolve_caller(provider: &impl IdentityProvider) -> Result<UserId, AuthError> {
    let token = provider.authenticated_user();
    match token.and_then(|token| UserId::parse(token)) {
        Some(user) => Ok(user),
        None => {
            debug!("event=auth_resolve module=auth status=rejected error_code=unauthenticated");
            Err(AuthError::Unauthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_caller, AuthError, IdentityProvider, StaticIdentity};

    struct BlankSession;

    impl IdentityProvider for BlankSession {
        fn authenticated_user(&self) -> Option<String> {
            Some("   ".to_string())
        }
    }

    #[test]
    fn resolves_signed_in_user() {
        let caller = resolve_caller(&StaticIdentity::user("alice")).expect("caller resolves");
        assert_eq!(caller.as_str(), "alice");
    }

    #[test]
    fn anonymous_caller_is_rejected() {
        let err = resolve_caller(&StaticIdentity::anonymous()).expect_err("must fail");
        assert_eq!(err, AuthError::Unauthenticated);
    }

    #[test]
    fn blank_token_is_rejected() {
        let err = resolve_caller(&BlankSession).expect_err("blank token must fail");
        assert_eq!(err, AuthError::Unauthenticated);
    }

    #[test]
    fn provider_references_resolve_through() {
        let identity = StaticIdentity::user("bob");
        let caller = resolve_caller(&&identity).expect("reference provider resolves");
        assert_eq!(caller.as_str(), "bob");
    }
}
