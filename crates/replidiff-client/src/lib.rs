//! replidiff client - the endpoint seam
//!
//! `TargetClient` is the trait the runner fans out through; the one real
//! implementation is the reqwest-backed [`HttpEndpointClient`]. Failure is
//! never an `Err` at this seam: an unreachable target yields an
//! [`EndpointResult`] carrying a transport error, so one dead replica
//! cannot abort comparison of the others.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod http;

pub use http::HttpEndpointClient;

use async_trait::async_trait;
use replidiff_core::{EndpointResult, RequestPayload, ScenarioId, Target};
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default header carrying the API key
pub const DEFAULT_API_KEY_HEADER: &str = "apikey";

/// Client configuration
///
/// Explicit object handed to the client at construction; never ambient
/// process state, so clients stay testable in isolation.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key attached to every request, when present
    pub api_key: Option<String>,
    /// Header name the API key is sent under
    pub api_key_header: String,
    /// Fixed per-request timeout; expiry surfaces as a transport error
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With per-request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// With a non-default API key header
    #[inline]
    #[must_use]
    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.api_key_header = header.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// One request to one target
///
/// Implementations must encode every failure mode into the returned
/// [`EndpointResult`]; callers branch on the outcome instead of relying on
/// error propagation.
#[async_trait]
pub trait TargetClient: Send + Sync {
    /// Send the scenario's request payload to the target
    async fn send(
        &self,
        target: &Target,
        scenario_id: ScenarioId,
        request: &RequestPayload,
    ) -> EndpointResult;
}
