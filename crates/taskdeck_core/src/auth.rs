//! Session identity checks guarding every domain operation.
//!
//! # Responsibility
//! - Decide whether an incoming session may touch domain data.
//! - Hand out [`AuthorizedSession`] proofs that services require.
//! - Describe where unauthenticated callers should be sent.
//!
//! # Invariants
//! - [`AuthorizedSession`] can only be obtained through
//!   [`AccessGate::authorize`]; holding one proves the check ran.
//! - The gate itself never inspects tokens; that stays behind the
//!   [`IdentityProvider`] seam so hosts can plug in their own scheme.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Where unauthenticated callers are redirected when no provider
/// overrides it.
pub const DEFAULT_LOGIN_URL: &str = "/accounts/login/";

/// An incoming caller identity, before any check has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Pluggable identity backend consulted by the gate.
pub trait IdentityProvider: Send + Sync {
    fn is_authenticated(&self, session: &Session) -> bool;

    fn login_redirect_url(&self) -> String {
        DEFAULT_LOGIN_URL.to_string()
    }
}

/// Outcome of a failed check: send the caller to the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub location: String,
}

impl Display for LoginRedirect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "authentication required, redirect to {}", self.location)
    }
}

impl Error for LoginRedirect {}

/// Proof that a session passed the gate.
///
/// There is no public constructor; services accept this type so an
/// unchecked session cannot reach them by mistake.
#[derive(Debug, Clone)]
pub struct AuthorizedSession {
    session: Session,
}

impl AuthorizedSession {
    pub fn session(&self) -> &Session {
        &self.session
    }
}

/// Front door for every domain operation.
pub struct AccessGate {
    provider: Arc<dyn IdentityProvider>,
}

impl AccessGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Checks the session and either grants a proof or names the login
    /// location to redirect to.
    pub fn authorize(&self, session: &Session) -> Result<AuthorizedSession, LoginRedirect> {
        if self.provider.is_authenticated(session) {
            Ok(AuthorizedSession {
                session: session.clone(),
            })
        } else {
            Err(LoginRedirect {
                location: self.provider.login_redirect_url(),
            })
        }
    }

    pub fn login_redirect_url(&self) -> String {
        self.provider.login_redirect_url()
    }
}

/// Development provider that accepts exactly one bearer token.
pub struct FixedTokenProvider {
    token: String,
    login_url: String,
}

impl FixedTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
        }
    }

    pub fn with_login_url(token: impl Into<String>, login_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            login_url: login_url.into(),
        }
    }
}

impl IdentityProvider for FixedTokenProvider {
    fn is_authenticated(&self, session: &Session) -> bool {
        session.token().is_some_and(|token| token == self.token)
    }

    fn login_redirect_url(&self) -> String {
        self.login_url.clone()
    }
}
