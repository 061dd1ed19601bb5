use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters in a derived token.
pub const TOKEN_LENGTH: usize = 10;

/// Sentinel action used when the caller does not scope a token.
pub const DEFAULT_ACTION: i64 = -1;

/// The operation a token is scoped to.
///
/// Actions can be strings (`"delete-post_42"`) or integers. Both are rendered
/// with their plain string form inside the hashed message, so `Action::from(5)`
/// and `Action::from("5")` produce the same token.
///
/// The default is the integer sentinel `-1`. Relying on the default makes
/// tokens interchangeable across every unscoped form, so scoping each
/// operation is strongly recommended.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// A textual action name.
    Named(String),
    /// A numeric action id.
    Id(i64),
}

impl Default for Action {
    fn default() -> Self {
        Action::Id(DEFAULT_ACTION)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Named(name) => f.write_str(name),
            Action::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Action::Named(name.to_string())
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Action::Named(name)
    }
}

impl From<&String> for Action {
    fn from(name: &String) -> Self {
        Action::Named(name.clone())
    }
}

impl From<i64> for Action {
    fn from(id: i64) -> Self {
        Action::Id(id)
    }
}

impl From<i32> for Action {
    fn from(id: i32) -> Self {
        Action::Id(i64::from(id))
    }
}

impl From<u32> for Action {
    fn from(id: u32) -> Self {
        Action::Id(i64::from(id))
    }
}

impl From<&Action> for Action {
    fn from(action: &Action) -> Self {
        action.clone()
    }
}

/// The acting principal a token is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Numeric user id; `0` conventionally means an anonymous visitor.
    pub user_id: u64,
    /// Token distinguishing concurrent sessions of the same user.
    pub session_token: String,
}

impl Identity {
    /// Creates an identity from its parts.
    pub fn new(user_id: u64, session_token: impl Into<String>) -> Self {
        Self {
            user_id,
            session_token: session_token.into(),
        }
    }
}

/// A derived, short-lived token.
///
/// Serializes as a bare string so it can be embedded in JSON payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of verifying a presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    /// The token does not match either accepted tick.
    Invalid,
    /// The token was derived from the current tick.
    Fresh,
    /// The token was derived from the previous tick.
    Stale,
}

impl Verification {
    /// Whether the token should be accepted.
    pub fn is_valid(self) -> bool {
        !matches!(self, Verification::Invalid)
    }

    /// Legacy numeric code: `Some(1)` for fresh, `Some(2)` for stale,
    /// `None` for invalid.
    pub fn code(self) -> Option<u8> {
        match self {
            Verification::Invalid => None,
            Verification::Fresh => Some(1),
            Verification::Stale => Some(2),
        }
    }
}

/// Builds the pipe-delimited message that gets hashed.
pub(crate) fn compose_message(tick: i64, action: &Action, identity: &Identity) -> String {
    format!(
        "{tick}|{action}|{}|{}",
        identity.user_id, identity.session_token
    )
}

/// Cuts a hex digest down to the token window.
///
/// Takes the ten characters that end two characters before the end of the
/// digest. Digests shorter than twelve characters start the window at zero.
pub(crate) fn truncate_digest(digest: &str) -> &str {
    let len = digest.len();
    let start = len.saturating_sub(TOKEN_LENGTH + 2);
    let end = (start + TOKEN_LENGTH).min(len);
    digest.get(start..end).unwrap_or_default()
}
