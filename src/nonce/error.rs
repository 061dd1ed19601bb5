use thiserror::Error;

/// Error types that can occur around nonce creation and verification.
///
/// Token derivation itself never fails and verification reports its outcome
/// through [`Verification`](crate::Verification). Errors only appear at the
/// edges: building an engine, and the request-check helpers that turn an
/// invalid outcome into a rejection.
///
/// # Error Categories
///
/// - **Setup Errors**: `InvalidConfig`, `CryptoError`
/// - **Request Errors**: `MissingToken`, `InvalidToken`
///
/// # Example
///
/// ```rust
/// use action_nonce::{NonceEngine, NonceError, StaticContext};
/// use std::collections::HashMap;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), NonceError> {
/// let engine = NonceEngine::builder(Arc::new(StaticContext::new(1, "session", "salt"))).build()?;
/// let params: HashMap<String, String> = HashMap::new();
///
/// match engine.check_admin_request(&params, "delete-post", None) {
///     Ok(outcome) => println!("Request accepted: {outcome:?}"),
///     Err(NonceError::MissingToken(name)) => println!("No `{name}` parameter"),
///     Err(NonceError::InvalidToken) => println!("Link expired"),
///     Err(e) => println!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum NonceError {
    /// The engine configuration cannot produce a usable tick.
    ///
    /// Raised by [`NonceEngineBuilder::build`](crate::NonceEngineBuilder::build)
    /// when the lifetime is zero, which would make the bucket width zero.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The secret salt could not be turned into a MAC key.
    ///
    /// HMAC accepts keys of any length, so this only surfaces from custom
    /// [`TokenHasher`](crate::signature::TokenHasher) implementations.
    #[error("Crypto error: {0}")]
    CryptoError(String),

    /// A request did not carry the named token parameter.
    #[error("Missing token parameter: {0}")]
    MissingToken(String),

    /// A request carried a token that verified as invalid.
    ///
    /// # When This Occurs
    ///
    /// - The token is older than two ticks
    /// - The token was issued for a different action
    /// - The user or session changed since the token was issued
    /// - The token was forged or mangled in transit
    ///
    /// # Resolution
    ///
    /// Reload the page or form to obtain a fresh token.
    #[error("Invalid token")]
    InvalidToken,
}
