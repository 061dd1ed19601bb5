//! Host collaborators supplying identity and key material.

use crate::nonce::token::Identity;
use std::fmt;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Supplies the acting principal and the site secret to a nonce engine.
///
/// The engine asks for the user id and session token on every create and
/// verify call, so implementations should answer from whatever request-scoped
/// state the host keeps. The secret salt is read once when the engine is
/// built.
///
/// # Example
///
/// ```rust
/// use action_nonce::ContextProvider;
///
/// struct RequestContext {
///     user_id: u64,
///     session: String,
/// }
///
/// impl ContextProvider for RequestContext {
///     fn current_user_id(&self) -> u64 {
///         self.user_id
///     }
///
///     fn session_token(&self) -> String {
///         self.session.clone()
///     }
///
///     fn secret_salt(&self) -> String {
///         std::env::var("SITE_NONCE_SALT").unwrap_or_default()
///     }
/// }
/// ```
pub trait ContextProvider: Send + Sync {
    /// Identity of the acting principal.
    fn current_user_id(&self) -> u64;

    /// Session-bound value distinguishing concurrent sessions of one user.
    fn session_token(&self) -> String;

    /// Process-wide secret used as the HMAC key.
    fn secret_salt(&self) -> String;

    /// Snapshot of the current identity.
    fn identity(&self) -> Identity {
        Identity::new(self.current_user_id(), self.session_token())
    }
}

/// A context provider holding fixed values.
///
/// Useful for tests, command-line tools and single-user hosts. The user id and
/// session token can be swapped at runtime; the salt cannot.
pub struct StaticContext {
    user_id: AtomicU64,
    session_token: RwLock<String>,
    salt: String,
}

impl StaticContext {
    /// Creates a context for the given user, session and salt.
    pub fn new(user_id: u64, session_token: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            user_id: AtomicU64::new(user_id),
            session_token: RwLock::new(session_token.into()),
            salt: salt.into(),
        }
    }

    /// Switches the acting user.
    pub fn set_user_id(&self, user_id: u64) {
        self.user_id.store(user_id, Ordering::SeqCst);
    }

    /// Switches the session token.
    pub fn set_session_token(&self, session_token: impl Into<String>) {
        let mut guard = self
            .session_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = session_token.into();
    }
}

impl ContextProvider for StaticContext {
    fn current_user_id(&self) -> u64 {
        self.user_id.load(Ordering::SeqCst)
    }

    fn session_token(&self) -> String {
        self.session_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn secret_salt(&self) -> String {
        self.salt.clone()
    }
}

impl fmt::Debug for StaticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticContext")
            .field("user_id", &self.current_user_id())
            .field("session_token", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_context_values() {
        let context = StaticContext::new(9999, "tok", "s3cr3t");
        assert_eq!(context.current_user_id(), 9999);
        assert_eq!(context.session_token(), "tok");
        assert_eq!(context.secret_salt(), "s3cr3t");
        assert_eq!(context.identity(), Identity::new(9999, "tok"));
    }

    #[test]
    fn test_static_context_updates() {
        let context = StaticContext::new(9999, "tok", "s3cr3t");
        context.set_user_id(7777);
        context.set_session_token("other");
        assert_eq!(context.identity(), Identity::new(7777, "other"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let context = StaticContext::new(1, "session-value", "salt-value");
        let debug = format!("{context:?}");
        assert!(!debug.contains("salt-value"));
        assert!(!debug.contains("session-value"));
        assert!(debug.contains("user_id: 1"));
    }
}
