use crate::nonce::compare::constant_time_eq;
use crate::nonce::context::ContextProvider;
use crate::nonce::engine_builder::{NonceEngineBuilder, TimeProviderFn};
use crate::nonce::signature::TokenHasher;
use crate::nonce::time_utils::{tick_at, tick_start};
use crate::nonce::token::{Action, Identity, Token, Verification, compose_message, truncate_digest};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::nonce::metrics::{MetricEvent, MetricsCollector, MetricsTimer};

/// Issues and verifies time-windowed, action-scoped tokens.
///
/// A token is a keyed hash over the current tick, the action, the user id and
/// the session token. It verifies as [`Verification::Fresh`] during the tick
/// it was created in and as [`Verification::Stale`] during the following one.
/// Tick boundaries are fixed, so a token created just before a boundary turns
/// stale almost at once and the total acceptance window is at most the
/// configured lifetime.
///
/// The engine keeps no token state. It is `Send + Sync` and can be shared
/// across threads with `Arc<NonceEngine>`.
///
/// # Example
///
/// ```rust
/// use action_nonce::{NonceEngine, StaticContext, Verification};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), action_nonce::NonceError> {
/// let context = Arc::new(StaticContext::new(42, "session-token", "site-salt"));
/// let engine = NonceEngine::builder(context).build()?;
///
/// let token = engine.create_token("delete-post_7");
/// assert_eq!(engine.verify_token(token.as_str(), "delete-post_7"), Verification::Fresh);
/// assert_eq!(engine.verify_token(token.as_str(), "delete-post_8"), Verification::Invalid);
/// # Ok(())
/// # }
/// ```
pub struct NonceEngine {
    pub(crate) provider: Arc<dyn ContextProvider>,
    pub(crate) hasher: Box<dyn TokenHasher>,
    pub(crate) lifetime_secs: u64,
    pub(crate) time_provider: TimeProviderFn,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: Option<Arc<dyn MetricsCollector>>,
}

impl NonceEngine {
    /// Starts building an engine around a context provider.
    ///
    /// The provider's secret salt is read once, in
    /// [`NonceEngineBuilder::build`].
    pub fn builder(provider: Arc<dyn ContextProvider>) -> NonceEngineBuilder {
        NonceEngineBuilder::new(provider)
    }

    /// Maximum acceptance window for a token.
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs)
    }

    /// Name of the keyed hash in use.
    pub fn algorithm(&self) -> &'static str {
        self.hasher.name()
    }

    /// Current tick: `ceil(now / (lifetime / 2))`.
    pub fn tick(&self) -> i64 {
        let now = (self.time_provider)();
        let tick = tick_at(now, self.lifetime_secs);
        tracing::trace!(now, tick, "computed nonce tick");
        tick
    }

    /// Unix second at which tokens derived from `tick` stop verifying.
    pub fn expires_at(&self, tick: i64) -> u64 {
        tick_start(tick.saturating_add(2), self.lifetime_secs)
    }

    /// Creates a token for `action` bound to the provider's current identity.
    ///
    /// Pass [`Action::default()`] for an unscoped token.
    pub fn create_token(&self, action: impl Into<Action>) -> Token {
        #[cfg(feature = "metrics")]
        let timer = MetricsTimer::start();

        let action = action.into();
        let identity = self.provider.identity();
        let tick = self.tick();
        let token = self.derive_with_tick(tick, &action, &identity);

        tracing::debug!(
            action = %action,
            user_id = identity.user_id,
            tick,
            algorithm = self.hasher.name(),
            "created nonce token"
        );

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_event(MetricEvent::TokenCreated {
                duration: timer.elapsed(),
            });
        }

        token
    }

    /// Derives the token for an explicit tick and identity.
    ///
    /// Deterministic: the same tick, action, identity and key always yield
    /// the same token. Never fails.
    pub fn derive_with_tick(&self, tick: i64, action: &Action, identity: &Identity) -> Token {
        let message = compose_message(tick, action, identity);
        let digest = self.hasher.hex_digest(message.as_bytes());
        Token::new(truncate_digest(&digest).to_string())
    }

    /// Verifies `token` for `action` against the provider's current identity.
    ///
    /// Returns [`Verification::Fresh`] for a token from the current tick,
    /// [`Verification::Stale`] for one from the previous tick, and
    /// [`Verification::Invalid`] otherwise, including for an empty token.
    pub fn verify_token(&self, token: &str, action: impl Into<Action>) -> Verification {
        #[cfg(feature = "metrics")]
        let timer = MetricsTimer::start();

        let action = action.into();
        let identity = self.provider.identity();
        let tick = self.tick();
        let outcome = self.verify_at(token, &action, &identity, tick);

        tracing::debug!(
            action = %action,
            user_id = identity.user_id,
            tick,
            outcome = ?outcome,
            "verified nonce token"
        );

        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_event(MetricEvent::TokenVerified {
                outcome,
                duration: timer.elapsed(),
            });
        }

        outcome
    }

    /// Verifies `token` as if the current tick were `tick`.
    pub fn verify_at(
        &self,
        token: &str,
        action: &Action,
        identity: &Identity,
        tick: i64,
    ) -> Verification {
        if token.is_empty() {
            return Verification::Invalid;
        }

        let expected = self.derive_with_tick(tick, action, identity);
        if constant_time_eq(expected.as_str(), token) {
            return Verification::Fresh;
        }

        let expected = self.derive_with_tick(tick.saturating_sub(1), action, identity);
        if constant_time_eq(expected.as_str(), token) {
            return Verification::Stale;
        }

        Verification::Invalid
    }
}

impl fmt::Debug for NonceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonceEngine")
            .field("algorithm", &self.hasher.name())
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticContext;
    use crate::nonce::time_utils::tick_start;
    use std::sync::atomic::{AtomicU64, Ordering};

    const NOW: u64 = 1_700_000_000;

    fn engine_at(context: Arc<StaticContext>, now: u64) -> NonceEngine {
        NonceEngine::builder(context)
            .with_lifetime(Duration::from_secs(86_400))
            .with_time_provider(move || now)
            .build()
            .unwrap()
    }

    fn scenario_context() -> Arc<StaticContext> {
        Arc::new(StaticContext::new(9999, "tok", "s3cr3t"))
    }

    #[test]
    fn test_token_shape() {
        let engine = engine_at(scenario_context(), NOW);
        let token = engine.create_token("action-1");
        assert_eq!(token.as_str().len(), crate::TOKEN_LENGTH);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_determinism() {
        let engine = engine_at(scenario_context(), NOW);
        let identity = Identity::new(9999, "tok");
        let action = Action::from("action-1");
        let a = engine.derive_with_tick(39_352, &action, &identity);
        let b = engine.derive_with_tick(39_352, &action, &identity);
        assert_eq!(a, b);
        assert_eq!(engine.create_token("action-1"), engine.create_token("action-1"));
    }

    #[test]
    fn test_concrete_scenario() {
        let context = scenario_context();
        let engine = engine_at(Arc::clone(&context), NOW);

        let token = engine.create_token("action-1");
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Fresh);
        assert_eq!(engine.verify_token(token.as_str(), "action-2"), Verification::Invalid);

        context.set_user_id(7777);
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Invalid);
    }

    #[test]
    fn test_session_sensitivity() {
        let context = scenario_context();
        let engine = engine_at(Arc::clone(&context), NOW);
        let token = engine.create_token("action-1");

        context.set_session_token("another-session");
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Invalid);
    }

    #[test]
    fn test_secret_sensitivity() {
        let engine = engine_at(scenario_context(), NOW);
        let other = engine_at(Arc::new(StaticContext::new(9999, "tok", "other")), NOW);

        let token = engine.create_token("action-1");
        assert_eq!(other.verify_token(token.as_str(), "action-1"), Verification::Invalid);
    }

    #[test]
    fn test_staleness_window() {
        let engine = engine_at(scenario_context(), NOW);
        let identity = Identity::new(9999, "tok");
        let action = Action::from("action-1");
        let tick = engine.tick();

        let previous = engine.derive_with_tick(tick - 1, &action, &identity);
        assert_eq!(engine.verify_token(previous.as_str(), "action-1"), Verification::Stale);

        let older = engine.derive_with_tick(tick - 2, &action, &identity);
        assert_eq!(engine.verify_token(older.as_str(), "action-1"), Verification::Invalid);

        let future = engine.derive_with_tick(tick + 1, &action, &identity);
        assert_eq!(engine.verify_token(future.as_str(), "action-1"), Verification::Invalid);
    }

    #[test]
    fn test_token_ages_across_ticks() {
        let clock = Arc::new(AtomicU64::new(NOW));
        let clock_reader = Arc::clone(&clock);
        let engine = NonceEngine::builder(scenario_context())
            .with_lifetime(Duration::from_secs(86_400))
            .with_time_provider(move || clock_reader.load(Ordering::SeqCst))
            .build()
            .unwrap();

        let token = engine.create_token("action-1");
        let issued_tick = engine.tick();

        clock.store(tick_start(issued_tick + 1, 86_400), Ordering::SeqCst);
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Stale);

        let expiry = engine.expires_at(issued_tick);
        clock.store(expiry - 1, Ordering::SeqCst);
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Stale);

        clock.store(expiry, Ordering::SeqCst);
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Invalid);
    }

    #[test]
    fn test_boundary_token_turns_stale_immediately() {
        // Issued in the last second of a tick, stale one second later.
        let clock = Arc::new(AtomicU64::new(0));
        let clock_reader = Arc::clone(&clock);
        let engine = NonceEngine::builder(scenario_context())
            .with_lifetime(Duration::from_secs(86_400))
            .with_time_provider(move || clock_reader.load(Ordering::SeqCst))
            .build()
            .unwrap();

        let next_start = tick_start(39_353, 86_400);
        clock.store(next_start - 1, Ordering::SeqCst);
        let token = engine.create_token("action-1");

        clock.store(next_start, Ordering::SeqCst);
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Stale);
    }

    #[test]
    fn test_empty_token_is_invalid() {
        let engine = engine_at(scenario_context(), NOW);
        assert_eq!(engine.verify_token("", "action-1"), Verification::Invalid);
        assert_eq!(engine.verify_token("", Action::default()), Verification::Invalid);
    }

    #[test]
    fn test_default_action_round_trip() {
        let engine = engine_at(scenario_context(), NOW);
        let token = engine.create_token(Action::default());
        assert_eq!(engine.verify_token(token.as_str(), -1), Verification::Fresh);
        assert_eq!(engine.verify_token(token.as_str(), "-1"), Verification::Fresh);
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Invalid);
    }

    #[test]
    fn test_truncated_or_padded_tokens_are_invalid() {
        let engine = engine_at(scenario_context(), NOW);
        let token = engine.create_token("action-1");
        let short = &token.as_str()[..9];
        let long = format!("{token}0");
        assert_eq!(engine.verify_token(short, "action-1"), Verification::Invalid);
        assert_eq!(engine.verify_token(&long, "action-1"), Verification::Invalid);
    }

    #[test]
    fn test_empty_secret_still_deterministic() {
        let context = Arc::new(StaticContext::new(1, "tok", ""));
        let engine = engine_at(context, NOW);
        let token = engine.create_token("action-1");
        assert_eq!(token.as_str().len(), crate::TOKEN_LENGTH);
        assert_eq!(engine.verify_token(token.as_str(), "action-1"), Verification::Fresh);
    }

    #[test]
    fn test_expires_at_is_one_lifetime_after_tick_start() {
        let engine = engine_at(scenario_context(), NOW);
        let tick = engine.tick();
        assert_eq!(engine.expires_at(tick), tick_start(tick, 86_400) + 86_400);
    }

    #[test]
    fn test_debug_hides_secret() {
        let engine = engine_at(scenario_context(), NOW);
        let debug = format!("{engine:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("lifetime_secs: 86400"));
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NonceEngine>();
    }
}
