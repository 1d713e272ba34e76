//! Divergence detection
//!
//! Chain comparison: each target's canonical response is compared against
//! its immediate predecessor in target order. With the baseline first on
//! the command line this catches any single outlier in O(N) and reports
//! the minimal set of adjacent divergent pairs.

use crate::canonical::{pretty, CanonicalResponse};
use crate::diff::diff_lines;
use crate::types::ScenarioId;

/// One adjacent pair that compared unequal
#[derive(Debug, Clone)]
pub struct PairwiseDiff {
    /// Predecessor target name
    pub left: String,
    /// Successor target name
    pub right: String,
    /// Line-oriented diff of the pretty canonical forms
    pub diff: String,
}

/// Everything needed to persist and explain one divergent scenario
///
/// Created only when at least one adjacent pair compared unequal;
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct DivergenceReport {
    /// Scenario the divergence belongs to
    pub scenario_id: ScenarioId,
    /// All target names in comparison order
    pub targets: Vec<String>,
    /// Adjacent pairs that compared unequal
    pub pairwise_diffs: Vec<PairwiseDiff>,
    /// Raw response documents keyed by target, in target order
    pub raw_responses: Vec<(String, String)>,
}

/// Compare canonical responses in target order
///
/// `canonical` holds (target name, canonical response) in comparison
/// order; `raw` holds the matching raw artifact documents. Transport and
/// malformed sentinels are ordinary canonical values here: one target
/// timing out while its neighbor answers is a reportable divergence.
///
/// Returns `None` iff every adjacent pair is equal (including the
/// degenerate zero- and one-target cases, which have no pairs).
#[must_use]
pub fn compare(
    scenario_id: ScenarioId,
    canonical: &[(String, CanonicalResponse)],
    raw: &[(String, String)],
) -> Option<DivergenceReport> {
    let mut pairwise_diffs = Vec::new();

    for pair in canonical.windows(2) {
        let (left_name, left) = &pair[0];
        let (right_name, right) = &pair[1];
        if left != right {
            pairwise_diffs.push(PairwiseDiff {
                left: left_name.clone(),
                right: right_name.clone(),
                diff: diff_lines(&pretty(left), &pretty(right)),
            });
        }
    }

    if pairwise_diffs.is_empty() {
        return None;
    }

    Some(DivergenceReport {
        scenario_id,
        targets: canonical.iter().map(|(name, _)| name.clone()).collect(),
        pairwise_diffs,
        raw_responses: raw.to_vec(),
    })
}
