//! Response canonicalization
//!
//! Normalizes raw responses into a form where structural equality means
//! semantic equivalence:
//! - mapping keys are rebuilt in sorted order at every depth, so key
//!   insertion order never causes false divergence
//! - arrays keep their order; an explicitly ordered list of updates that
//!   gets reordered IS a divergence
//! - transport failures and unparseable bodies canonicalize to distinct
//!   sentinels, so "both targets failed" never reads as "both targets
//!   returned empty"

use crate::error::TransportErrorKind;
use crate::types::ResponseOutcome;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Canonical form of one target's response
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalResponse {
    /// Valid structured body, normalized
    Body(Value),
    /// Body was not valid JSON; compared by raw text
    Malformed {
        /// The body as received
        raw: String,
    },
    /// Transport failure sentinel; compared by kind only
    Transport {
        /// Failure classification
        kind: TransportErrorKind,
    },
}

/// Canonicalize one response outcome
///
/// Idempotent: canonicalizing an already-canonical body changes nothing.
#[must_use]
pub fn canonicalize(outcome: &ResponseOutcome) -> CanonicalResponse {
    match outcome {
        ResponseOutcome::Body(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => CanonicalResponse::Body(normalize(value)),
            Err(_) => CanonicalResponse::Malformed { raw: raw.clone() },
        },
        ResponseOutcome::Transport(err) => CanonicalResponse::Transport { kind: err.kind },
    }
}

/// Rebuild objects in sorted-key order at every depth; arrays keep order.
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, normalize(value)))
                .collect();
            let mut out = Map::new();
            for (key, value) in sorted {
                out.insert(key, value);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

/// Stable pretty-printed form of a canonical response, used for diffing
///
/// Deterministic: equal canonical responses always render to identical
/// text, and the sentinel variants render to fixed single-line markers
/// that cannot collide with a valid JSON document.
#[must_use]
pub fn pretty(response: &CanonicalResponse) -> String {
    match response {
        CanonicalResponse::Body(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        CanonicalResponse::Malformed { raw } => {
            format!("<malformed response body: {} bytes>", raw.len())
        }
        CanonicalResponse::Transport { kind } => format!("<transport error: {kind}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use pretty_assertions::assert_eq;

    fn body(raw: &str) -> ResponseOutcome {
        ResponseOutcome::Body(raw.to_string())
    }

    #[test]
    fn key_order_is_irrelevant() {
        let left = canonicalize(&body(r#"{"a":1,"b":2}"#));
        let right = canonicalize(&body(r#"{"b":2,"a":1}"#));
        assert_eq!(left, right);
    }

    #[test]
    fn nested_key_order_is_irrelevant() {
        let left = canonicalize(&body(r#"{"outer":{"x":[{"k":1,"j":2}],"y":true}}"#));
        let right = canonicalize(&body(r#"{"outer":{"y":true,"x":[{"j":2,"k":1}]}}"#));
        assert_eq!(left, right);
    }

    #[test]
    fn array_order_is_significant() {
        let left = canonicalize(&body(r#"{"updates":[1,2,3]}"#));
        let right = canonicalize(&body(r#"{"updates":[3,2,1]}"#));
        assert_ne!(left, right);
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let once = canonicalize(&body(r#"{"b":{"d":4,"c":3},"a":[2,1]}"#));
        let CanonicalResponse::Body(value) = &once else {
            panic!("expected body");
        };
        let again = canonicalize(&body(&value.to_string()));
        assert_eq!(once, again);
    }

    #[test]
    fn transport_sentinel_differs_from_empty_body() {
        let failed = canonicalize(&ResponseOutcome::Transport(TransportError::connect(
            "refused",
        )));
        let empty = canonicalize(&body("{}"));
        assert_ne!(failed, empty);
        assert_ne!(failed, canonicalize(&body("null")));
    }

    #[test]
    fn transport_sentinels_compare_by_kind_not_message() {
        let a = canonicalize(&ResponseOutcome::Transport(TransportError::connect(
            "refused by 10.0.0.1",
        )));
        let b = canonicalize(&ResponseOutcome::Transport(TransportError::connect(
            "refused by 10.0.0.2",
        )));
        assert_eq!(a, b);

        let timeout = canonicalize(&ResponseOutcome::Transport(TransportError::timeout(
            std::time::Duration::from_secs(5),
        )));
        assert_ne!(a, timeout);
    }

    #[test]
    fn malformed_body_is_a_distinct_sentinel() {
        let malformed = canonicalize(&body("<html>oops</html>"));
        assert!(matches!(malformed, CanonicalResponse::Malformed { .. }));
        assert_ne!(malformed, canonicalize(&body("{}")));
        let transport =
            canonicalize(&ResponseOutcome::Transport(TransportError::connect("down")));
        assert_ne!(malformed, transport);
    }

    #[test]
    fn pretty_is_stable_across_key_order() {
        let left = canonicalize(&body(r#"{"b":2,"a":{"d":4,"c":3}}"#));
        let right = canonicalize(&body(r#"{"a":{"c":3,"d":4},"b":2}"#));
        assert_eq!(pretty(&left), pretty(&right));
        assert!(pretty(&left).contains("\"a\""));
    }
}
