// Core architecture components
mod compare;
mod config;
mod context;
mod engine;
mod engine_builder;
mod error;
mod time_utils;
mod token;

// Request parameter checks
pub mod request;

// Digest algorithms
pub mod signature;

// Metrics (optional feature)
#[cfg(feature = "metrics")]
pub mod metrics;

// Core components exports
pub use compare::constant_time_eq;
pub use config::{ConfigPreset, DEFAULT_LIFETIME_SECS, LIFETIME_ENV_VAR, NonceConfig};
pub use context::{ContextProvider, StaticContext};
pub use engine::NonceEngine;
pub use engine_builder::{NonceEngineBuilder, TimeProviderFn};
pub use error::NonceError;
pub use token::{Action, DEFAULT_ACTION, Identity, TOKEN_LENGTH, Token, Verification};

// Request check exports
pub use request::{AJAX_QUERY_ARG, DEFAULT_QUERY_ARG, RequestParams};

// Digest algorithm exports
pub use signature::{DigestAlgorithm, TokenHasher};

// Metrics exports (optional feature)
#[cfg(feature = "metrics")]
pub use metrics::{
    InMemoryMetricsCollector, MetricEvent, MetricsCollector, MetricsTimer, NoOpMetricsCollector,
    NonceMetrics,
};
