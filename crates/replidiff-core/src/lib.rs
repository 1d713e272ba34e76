//! replidiff core - data model and divergence detection
//!
//! The pieces that turn N raw endpoint responses into a deterministic
//! verdict:
//! - Corpus reading (lazy, restartable scenario sequence)
//! - Response canonicalization (order-independent structural form)
//! - Chain comparison with line-oriented diffs
//! - The error taxonomy shared by every crate in the workspace
//!
//! # Example
//!
//! ```rust
//! use replidiff_core::{canonicalize, compare, ResponseOutcome, ScenarioId};
//!
//! let a = ResponseOutcome::Body(r#"{"a":1,"b":2}"#.to_string());
//! let b = ResponseOutcome::Body(r#"{"b":2,"a":1}"#.to_string());
//!
//! // Key order is incidental serialization detail, not divergence.
//! assert_eq!(canonicalize(&a), canonicalize(&b));
//!
//! let results = vec![
//!     ("one".to_string(), canonicalize(&a)),
//!     ("two".to_string(), canonicalize(&b)),
//! ];
//! assert!(compare(ScenarioId(0), &results, &[]).is_none());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod canonical;
pub mod corpus;
pub mod detect;
pub mod diff;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use canonical::{canonicalize, pretty, CanonicalResponse};
pub use corpus::{CorpusReader, ScenarioIter};
pub use detect::{compare, DivergenceReport, PairwiseDiff};
pub use diff::diff_lines;
pub use error::{
    CorpusReadError, RunError, SinkError, TransportError, TransportErrorKind,
};
pub use types::{
    EndpointResult, RequestPayload, ResponseOutcome, RunId, Scenario, ScenarioId, Target,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with replidiff core
    pub use crate::{
        canonicalize, compare, CanonicalResponse, CorpusReader, DivergenceReport, EndpointResult,
        RequestPayload, ResponseOutcome, RunId, Scenario, ScenarioId, Target, TransportError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
