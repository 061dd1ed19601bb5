use std::time::Duration;

/// Default token lifetime in seconds (24 hours).
pub const DEFAULT_LIFETIME_SECS: u64 = 86_400;

/// Environment variable consulted by [`NonceConfig::default`].
pub const LIFETIME_ENV_VAR: &str = "NONCE_LIFETIME";

/// Predefined configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Standard configuration.
    ///
    /// - Lifetime: 24 hours, ticks every 12 hours
    Standard,

    /// Tokens meant to live for a working session.
    ///
    /// - Lifetime: 12 hours, ticks every 6 hours
    Session,

    /// Short-lived tokens for sensitive actions.
    ///
    /// - Lifetime: 1 hour, ticks every 30 minutes
    ShortLived,

    /// Load configuration from environment variables.
    ///
    /// Reads `NONCE_LIFETIME` (seconds, default: 86400).
    FromEnv,
}

/// Configuration for a nonce engine.
///
/// The lifetime is the longest a token can stay acceptable. Tokens are
/// bucketed into ticks of `lifetime / 2`, and a token verifies while it was
/// derived from the current or the previous tick.
///
/// # Environment Variables
///
/// - `NONCE_LIFETIME`: Lifetime in seconds (default: 86400)
///
/// # Example
///
/// ```rust
/// use action_nonce::NonceConfig;
/// use std::time::Duration;
///
/// let config = NonceConfig {
///     lifetime: Duration::from_secs(3600),
/// };
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceConfig {
    /// Maximum acceptance window for a token.
    pub lifetime: Duration,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs(
                std::env::var(LIFETIME_ENV_VAR)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_LIFETIME_SECS),
            ),
        }
    }
}

impl NonceConfig {
    /// Creates a configuration with the given lifetime.
    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self { lifetime }
    }

    /// Lifetime in whole seconds; sub-second precision is ignored.
    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime.as_secs()
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// Warnings are advisory. A zero lifetime is rejected outright by the
    /// engine builder and is not reported here.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let secs = self.lifetime_secs();

        if secs == 0 {
            return warnings;
        }
        if secs < 600 {
            warnings.push(
                "Very short lifetime (< 10 minutes) may expire tokens before forms are submitted"
                    .to_string(),
            );
        }
        if secs > 7 * DEFAULT_LIFETIME_SECS {
            warnings.push("Long lifetime (> 7 days) widens the replay window".to_string());
        }
        if secs % 2 != 0 {
            warnings.push(
                "Odd lifetime gives a fractional tick width; ticks will not align to whole seconds"
                    .to_string(),
            );
        }

        warnings
    }

    /// Returns a summary of the current configuration.
    pub fn summary(&self) -> String {
        format!(
            "NonceConfig {{ Lifetime: {}s, Tick Width: {}s }}",
            self.lifetime_secs(),
            self.lifetime.as_secs_f64() / 2.0,
        )
    }
}

impl From<ConfigPreset> for NonceConfig {
    fn from(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Standard => Self::with_lifetime(Duration::from_secs(DEFAULT_LIFETIME_SECS)),
            ConfigPreset::Session => Self::with_lifetime(Duration::from_secs(43_200)),
            ConfigPreset::ShortLived => Self::with_lifetime(Duration::from_secs(3_600)),
            ConfigPreset::FromEnv => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env_vars() {
        unsafe {
            std::env::remove_var(LIFETIME_ENV_VAR);
        }
    }

    #[test]
    fn test_standard_preset() {
        let config = NonceConfig::from(ConfigPreset::Standard);
        assert_eq!(config.lifetime_secs(), 86_400);
    }

    #[test]
    fn test_session_preset() {
        let config = NonceConfig::from(ConfigPreset::Session);
        assert_eq!(config.lifetime_secs(), 43_200);
    }

    #[test]
    fn test_short_lived_preset() {
        let config = NonceConfig::from(ConfigPreset::ShortLived);
        assert_eq!(config.lifetime_secs(), 3_600);
    }

    #[test]
    #[serial]
    fn test_default_without_env() {
        clear_env_vars();
        let config = NonceConfig::default();
        assert_eq!(config.lifetime_secs(), DEFAULT_LIFETIME_SECS);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env_vars();
        unsafe {
            std::env::set_var(LIFETIME_ENV_VAR, "7200");
        }

        let config = NonceConfig::from(ConfigPreset::FromEnv);
        assert_eq!(config.lifetime_secs(), 7200);

        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        clear_env_vars();
        unsafe {
            std::env::set_var(LIFETIME_ENV_VAR, "a day");
        }

        let config = NonceConfig::from(ConfigPreset::FromEnv);
        assert_eq!(config.lifetime_secs(), DEFAULT_LIFETIME_SECS);

        clear_env_vars();
    }

    #[test]
    fn test_validation_valid_config() {
        let config = NonceConfig::from(ConfigPreset::Standard);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validation_warnings() {
        let short = NonceConfig::with_lifetime(Duration::from_secs(120));
        assert!(
            short
                .validate()
                .iter()
                .any(|w| w.contains("Very short lifetime"))
        );

        let long = NonceConfig::with_lifetime(Duration::from_secs(30 * 86_400));
        assert!(long.validate().iter().any(|w| w.contains("Long lifetime")));

        let odd = NonceConfig::with_lifetime(Duration::from_secs(3_601));
        assert!(odd.validate().iter().any(|w| w.contains("Odd lifetime")));
    }

    #[test]
    fn test_summary() {
        let config = NonceConfig::from(ConfigPreset::ShortLived);
        assert_eq!(
            config.summary(),
            "NonceConfig { Lifetime: 3600s, Tick Width: 1800s }"
        );
    }
}
