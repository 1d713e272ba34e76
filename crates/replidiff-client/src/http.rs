//! HTTP endpoint client
//!
//! POSTs the request payload as JSON, attaches the configured API key
//! header, and maps every failure mode (connect, timeout, non-2xx) to a
//! transport error carried inside the result.

use crate::{ClientConfig, TargetClient};
use async_trait::async_trait;
use replidiff_core::{
    EndpointResult, RequestPayload, ResponseOutcome, ScenarioId, Target, TransportError,
};
use std::time::Instant;

/// reqwest-backed target client
#[derive(Debug, Clone)]
pub struct HttpEndpointClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpEndpointClient {
    /// Build a client with the per-request timeout baked in
    ///
    /// # Errors
    /// Returns the underlying builder error when the TLS backend cannot
    /// be initialized.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Client configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl TargetClient for HttpEndpointClient {
    async fn send(
        &self,
        target: &Target,
        scenario_id: ScenarioId,
        request: &RequestPayload,
    ) -> EndpointResult {
        let started = Instant::now();

        let mut req = self.http.post(&target.url).json(request.as_value());
        if let Some(key) = &self.config.api_key {
            req = req.header(self.config.api_key_header.as_str(), key);
        }

        let response = match req.send().await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    match resp.text().await {
                        Ok(body) => ResponseOutcome::Body(body),
                        Err(err) => ResponseOutcome::Transport(TransportError::connect(format!(
                            "reading body: {err}"
                        ))),
                    }
                } else {
                    let body = resp.text().await.unwrap_or_default();
                    ResponseOutcome::Transport(TransportError::status(status.as_u16(), body))
                }
            }
            Err(err) if err.is_timeout() => {
                ResponseOutcome::Transport(TransportError::timeout(self.config.timeout))
            }
            Err(err) => ResponseOutcome::Transport(TransportError::connect(err.to_string())),
        };

        tracing::debug!(
            target = %target.name,
            scenario = %scenario_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = matches!(response, ResponseOutcome::Body(_)),
            "request finished"
        );

        EndpointResult {
            target: target.name.clone(),
            scenario_id,
            response,
        }
    }
}
