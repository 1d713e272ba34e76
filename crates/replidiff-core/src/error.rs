//! Error types for replidiff
//!
//! The taxonomy follows the propagation rules of the verifier:
//! - `CorpusReadError::Open` is the only error fatal to a run
//! - per-line corpus errors are logged and skip the scenario
//! - per-target transport failures are data, compared like any response
//! - sink failures abort the affected report, never the run

use std::path::PathBuf;
use std::time::Duration;

/// Top-level run error
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Corpus could not be read
    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusReadError),

    /// Report artifact could not be persisted
    #[error("report sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Corpus reading errors
#[derive(Debug, thiserror::Error)]
pub enum CorpusReadError {
    /// Corpus file cannot be opened (fatal to the run)
    #[error("cannot open corpus {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A corpus line could not be read
    #[error("corpus read failed at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    /// A corpus line is not a structured record
    #[error("corpus line {line} is not a valid record: {source}")]
    Parse {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
}

impl CorpusReadError {
    /// Check if this error aborts the whole run
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Per-target transport failure, carried as data through the pipeline
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure classification; the only part that takes part in
    /// canonical equality
    pub kind: TransportErrorKind,
    /// Human-readable detail (addresses, elapsed times); excluded from
    /// equality
    pub message: String,
}

impl TransportError {
    /// Connection-level failure (DNS, refused, reset, bad body read)
    #[inline]
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self {
            kind: TransportErrorKind::Connect,
            message: message.into(),
        }
    }

    /// Per-request timeout expired
    #[inline]
    #[must_use]
    pub fn timeout(limit: Duration) -> Self {
        Self {
            kind: TransportErrorKind::Timeout,
            message: format!("no response within {}s", limit.as_secs()),
        }
    }

    /// Non-2xx HTTP status
    #[must_use]
    pub fn status(code: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut message: String = body.chars().take(200).collect();
        if message.len() < body.len() {
            message.push_str("...");
        }
        Self {
            kind: TransportErrorKind::Status(code),
            message,
        }
    }
}

/// Transport failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Could not reach the target or read its response
    Connect,
    /// Per-request timeout expired
    Timeout,
    /// Target answered with a non-2xx status
    Status(u16),
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connect => write!(f, "connect failed"),
            Self::Timeout => write!(f, "timed out"),
            Self::Status(code) => write!(f, "http status {code}"),
        }
    }
}

/// Report sink errors
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Artifact directory cannot be created
    #[error("cannot create artifact directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact file cannot be written
    #[error("cannot write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
