use crate::nonce::config::NonceConfig;
use crate::nonce::context::ContextProvider;
use crate::nonce::engine::NonceEngine;
use crate::nonce::error::NonceError;
use crate::nonce::signature::{DigestAlgorithm, TokenHasher};
use crate::nonce::time_utils::current_timestamp;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::nonce::metrics::MetricsCollector;

/// A function that provides Unix timestamps in seconds.
pub type TimeProviderFn = Box<dyn Fn() -> u64 + Send + Sync>;

/// Builder for a [`NonceEngine`].
///
/// Defaults: configuration from [`NonceConfig::default`] (24 hours unless
/// `NONCE_LIFETIME` says otherwise), the default [`DigestAlgorithm`], and the
/// system clock.
///
/// # Example
///
/// ```rust
/// use action_nonce::{ConfigPreset, NonceConfig, NonceEngine, StaticContext};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), action_nonce::NonceError> {
/// let engine = NonceEngine::builder(Arc::new(StaticContext::new(7, "session", "salt")))
///     .with_config(NonceConfig::from(ConfigPreset::ShortLived))
///     .with_time_provider(|| 1_700_000_000)
///     .build()?;
/// assert_eq!(engine.lifetime().as_secs(), 3600);
/// # Ok(())
/// # }
/// ```
#[must_use = "The builder does nothing unless `.build()` is called."]
pub struct NonceEngineBuilder {
    provider: Arc<dyn ContextProvider>,
    config: Option<NonceConfig>,
    algorithm: DigestAlgorithm,
    hasher: Option<Box<dyn TokenHasher>>,
    time_provider: Option<TimeProviderFn>,
    #[cfg(feature = "metrics")]
    metrics: Option<Arc<dyn MetricsCollector>>,
}

impl NonceEngineBuilder {
    pub(crate) fn new(provider: Arc<dyn ContextProvider>) -> Self {
        Self {
            provider,
            config: None,
            algorithm: DigestAlgorithm::default(),
            hasher: None,
            time_provider: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Uses an explicit configuration instead of the environment default.
    pub fn with_config(mut self, config: NonceConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shorthand for `with_config(NonceConfig::with_lifetime(lifetime))`.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.config = Some(NonceConfig::with_lifetime(lifetime));
        self
    }

    /// Selects a built-in digest algorithm keyed with the provider's salt.
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Uses a pre-keyed custom hasher. The provider's salt is then ignored.
    pub fn with_hasher<H: TokenHasher + 'static>(mut self, hasher: H) -> Self {
        self.hasher = Some(Box::new(hasher));
        self
    }

    /// Sets a custom time provider returning Unix seconds.
    ///
    /// The default provider reads the system clock.
    pub fn with_time_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        self.time_provider = Some(Box::new(provider));
        self
    }

    /// Attaches a metrics collector.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(collector);
        self
    }

    /// Validates the configuration, keys the hasher and returns the engine.
    ///
    /// # Errors
    ///
    /// - [`NonceError::InvalidConfig`] if the lifetime is under one second
    /// - [`NonceError::CryptoError`] if the salt cannot key the hash
    pub fn build(self) -> Result<NonceEngine, NonceError> {
        let config = self.config.unwrap_or_default();
        let lifetime_secs = config.lifetime_secs();
        if lifetime_secs == 0 {
            return Err(NonceError::InvalidConfig(
                "lifetime must be at least one second".to_string(),
            ));
        }
        for warning in config.validate() {
            tracing::warn!(lifetime_secs, "{warning}");
        }

        let hasher = match self.hasher {
            Some(hasher) => hasher,
            None => {
                let salt = self.provider.secret_salt();
                if salt.is_empty() {
                    tracing::warn!("Secret salt is empty; tokens will be predictable");
                }
                self.algorithm.keyed(salt.as_bytes())?
            }
        };

        tracing::debug!(
            algorithm = hasher.name(),
            summary = %config.summary(),
            "built nonce engine"
        );

        Ok(NonceEngine {
            provider: self.provider,
            hasher,
            lifetime_secs,
            time_provider: self
                .time_provider
                .unwrap_or_else(|| Box::new(current_timestamp) as TimeProviderFn),
            #[cfg(feature = "metrics")]
            metrics: self.metrics,
        })
    }
}
