//! Core types for replidiff
//!
//! Defines the fundamental types for the verifier:
//! - Scenario and run identifiers
//! - Targets under comparison
//! - Request payloads drawn from the corpus
//! - Per-target endpoint results

use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

/// Scenario identifier: the ordinal position of the record in the corpus.
///
/// Skipped records still consume their ordinal, so ids always line up with
/// corpus line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioId(pub u64);

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique run identifier (ULID for sortability and cross-run uniqueness)
///
/// Embedded in every artifact filename so that repeated invocations never
/// overwrite each other's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(pub Ulid);

impl RunId {
    /// Generate new run ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string().to_lowercase())
    }
}

/// One endpoint under comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Short identifier used in filenames, diffs and logs
    pub name: String,
    /// Endpoint URL the request payload is POSTed to
    pub url: String,
}

impl Target {
    /// Create target with an explicit name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Create target with a filename-safe name derived from the URL
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let trimmed = url
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let name: String = trimmed
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let name = name.trim_matches('-').to_string();
        Self { name, url }
    }
}

/// Opaque structured request payload (query + variables)
///
/// The verifier never interprets the payload; it is POSTed to each target
/// exactly as read from the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestPayload(Value);

impl RequestPayload {
    /// Wrap a payload value
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the payload as a JSON value
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// One request/comparison unit drawn from the corpus
///
/// Immutable once read; consumed exactly once by the runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Ordinal position in the corpus
    pub id: ScenarioId,
    /// Request payload sent to every target
    pub request: RequestPayload,
}

/// What came back from one target for one scenario
#[derive(Debug, Clone)]
pub enum ResponseOutcome {
    /// Response body as received (interpretation deferred to canonicalization)
    Body(String),
    /// The request never produced a usable body
    Transport(TransportError),
}

impl ResponseOutcome {
    /// Artifact form of this outcome: pretty-printed JSON when the body
    /// parses, the verbatim body otherwise, a marker document for
    /// transport failures.
    #[must_use]
    pub fn artifact_document(&self) -> String {
        match self {
            Self::Body(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(value) => {
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.clone())
                }
                Err(_) => raw.clone(),
            },
            Self::Transport(err) => {
                let marker = serde_json::json!({
                    "transport_error": {
                        "kind": err.kind.to_string(),
                        "message": err.message,
                    }
                });
                serde_json::to_string_pretty(&marker).unwrap_or_else(|_| err.to_string())
            }
        }
    }
}

/// Result of sending one scenario to one target
#[derive(Debug, Clone)]
pub struct EndpointResult {
    /// Target name
    pub target: String,
    /// Scenario this result belongs to
    pub scenario_id: ScenarioId,
    /// Body or transport failure
    pub response: ResponseOutcome,
}
