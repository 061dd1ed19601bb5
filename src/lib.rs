//! # Action Nonce
//!
//! Short-lived, action-scoped tokens for protecting state-changing requests
//! against cross-site request forgery.
//!
//! A token is a keyed hash over a coarse time bucket (the *tick*), the action
//! being protected, the acting user id and the user's session token. It is
//! never stored: verification simply recomputes the tokens for the current
//! and the previous tick and compares them in constant time.
//!
//! ## Features
//!
//! - **Tick-based expiry**: tokens verify for at most one lifetime (24 hours by default)
//! - **Fresh/stale outcomes**: callers can tell a token from the current tick
//!   apart from one that is about to expire
//! - **Action and identity scoping**: a token for one action, user or session
//!   does not verify for another
//! - **Timing-safe comparison** of presented tokens
//! - **Pluggable hash**: HMAC-SHA256 by default, HMAC-MD5 for the legacy token format
//! - **Stateless**: `Send + Sync`, no storage, no I/O
//!
//! ## Quick Start
//!
//! ```rust
//! use action_nonce::{NonceEngine, StaticContext, Verification};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), action_nonce::NonceError> {
//! // The host supplies user id, session token and site salt.
//! let context = Arc::new(StaticContext::new(9999, "tok", "s3cr3t"));
//! let engine = NonceEngine::builder(context.clone()).build()?;
//!
//! let token = engine.create_token("action-1");
//! assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Fresh);
//! assert_eq!(engine.verify_token(token.as_str(), "action-2"), Verification::Invalid);
//!
//! // A different user cannot reuse the token.
//! context.set_user_id(7777);
//! assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Invalid);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! The lifetime can be set through the `NONCE_LIFETIME` environment variable
//! (seconds), a [`ConfigPreset`], or explicitly on the builder:
//!
//! ```bash
//! export NONCE_LIFETIME=3600
//! ```
//!
//! ## Architecture
//!
//! - **[`NonceEngine`]**: token creation and verification
//! - **[`ContextProvider`]**: host hook supplying identity and the secret salt
//! - **[`NonceConfig`]**: lifetime configuration and presets
//! - **[`Verification`]**: the `Invalid | Fresh | Stale` outcome
//! - **[`NonceError`]**: setup and request-check errors

pub mod nonce;

// Re-export commonly used types
pub use nonce::{
    Action, ConfigPreset, ContextProvider, DigestAlgorithm, Identity, NonceConfig, NonceEngine,
    NonceEngineBuilder, NonceError, RequestParams, StaticContext, TOKEN_LENGTH, Token,
    TokenHasher, Verification, constant_time_eq,
};
pub use nonce::{request, signature};

#[cfg(feature = "metrics")]
pub use nonce::metrics;
