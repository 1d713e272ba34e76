//! Scenario runner
//!
//! Fans each scenario out to every configured target, buffers all N
//! results, canonicalizes, runs chain comparison and hands divergent
//! scenarios to the report sink. Scenario failures (unparseable corpus
//! lines) skip that scenario only; the run aborts solely when the corpus
//! cannot be opened.

use crate::sink::ReportSink;
use futures::stream::{self, StreamExt};
use replidiff_core::{
    canonicalize, compare, CanonicalResponse, CorpusReadError, CorpusReader, DivergenceReport,
    RunError, RunId, Scenario, Target,
};
use replidiff_client::TargetClient;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Targets in comparison order, baseline first
    pub targets: Vec<Target>,
    /// Bound on concurrently processed scenarios
    pub max_in_flight: usize,
}

impl RunnerConfig {
    /// Create configuration for a target list
    #[inline]
    #[must_use]
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            max_in_flight: 4,
        }
    }

    /// With scenario concurrency bound
    #[inline]
    #[must_use]
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max.max(1);
        self
    }
}

/// Best-effort cancellation handle
///
/// Once cancelled, no new scenario is dispatched; in-flight requests are
/// left to drain.
#[derive(Debug, Clone, Default)]
pub struct RunHandle {
    cancelled: Arc<AtomicBool>,
}

impl RunHandle {
    /// Create new handle
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop dispatching new scenarios
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check cancellation state
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of one verification run
#[derive(Debug)]
pub struct RunSummary {
    /// Run identifier embedded in every artifact name
    pub run_id: RunId,
    /// Corpus entries seen (including skips)
    pub scenarios_total: u64,
    /// Scenarios where every adjacent pair compared equal
    pub clean: u64,
    /// Scenarios with at least one divergent pair
    pub divergent: u64,
    /// Entries without a usable request, plus unparseable lines
    pub skipped: u64,
    /// All divergence reports, in completion order
    pub reports: Vec<DivergenceReport>,
}

impl RunSummary {
    /// True when no divergence was detected
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.divergent == 0
    }
}

/// Shared mutable state of a run: the append-only report collection and
/// the outcome counters
#[derive(Debug, Default)]
struct SummaryCells {
    scenarios_total: u64,
    clean: u64,
    divergent: u64,
    skipped: u64,
    reports: Vec<DivergenceReport>,
}

/// Orchestrates corpus -> clients -> canonicalizer -> detector -> sink
pub struct ScenarioRunner {
    config: RunnerConfig,
    client: Arc<dyn TargetClient>,
    sink: Arc<dyn ReportSink>,
}

impl ScenarioRunner {
    /// Create runner over a client and a sink
    #[inline]
    #[must_use]
    pub fn new(
        config: RunnerConfig,
        client: Arc<dyn TargetClient>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            config,
            client,
            sink,
        }
    }

    /// Runner configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run the full corpus against all targets
    ///
    /// # Errors
    /// Only `CorpusReadError::Open` is fatal; everything else is captured
    /// in the summary.
    pub async fn run(
        &self,
        corpus: &CorpusReader,
        handle: &RunHandle,
    ) -> Result<RunSummary, RunError> {
        let run_id = RunId::new();
        tracing::info!(
            run_id = %run_id,
            corpus = %corpus.path().display(),
            targets = self.config.targets.len(),
            "starting verification run"
        );

        let scenarios = corpus.scenarios()?;
        let cells = Mutex::new(SummaryCells::default());

        stream::iter(scenarios)
            .take_while(|_| futures::future::ready(!handle.is_cancelled()))
            .map(|entry| self.process_entry(run_id, entry, &cells))
            .buffered(self.config.max_in_flight.max(1))
            .for_each(|()| futures::future::ready(()))
            .await;

        if handle.is_cancelled() {
            tracing::warn!(run_id = %run_id, "run cancelled, remaining scenarios not dispatched");
        }

        let cells = cells.into_inner();
        let summary = RunSummary {
            run_id,
            scenarios_total: cells.scenarios_total,
            clean: cells.clean,
            divergent: cells.divergent,
            skipped: cells.skipped,
            reports: cells.reports,
        };
        tracing::info!(
            run_id = %run_id,
            total = summary.scenarios_total,
            clean = summary.clean,
            divergent = summary.divergent,
            skipped = summary.skipped,
            "run finished"
        );
        Ok(summary)
    }

    /// Process one corpus entry end to end and record its outcome
    async fn process_entry(
        &self,
        run_id: RunId,
        entry: Result<Option<Scenario>, CorpusReadError>,
        cells: &Mutex<SummaryCells>,
    ) {
        let scenario = match entry {
            Ok(Some(scenario)) => scenario,
            Ok(None) => {
                let mut cells = cells.lock().await;
                cells.scenarios_total += 1;
                cells.skipped += 1;
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping unusable corpus entry");
                let mut cells = cells.lock().await;
                cells.scenarios_total += 1;
                cells.skipped += 1;
                return;
            }
        };

        let report = self.run_scenario(run_id, scenario).await;

        let mut cells = cells.lock().await;
        cells.scenarios_total += 1;
        match report {
            Some(report) => {
                cells.divergent += 1;
                cells.reports.push(report);
            }
            None => cells.clean += 1,
        }
    }

    /// Dispatch one scenario to every target and compare the results
    ///
    /// All N requests run concurrently; results are buffered in target
    /// order before canonicalization, so a scenario is never judged on
    /// partial results and diff output is deterministic.
    async fn run_scenario(&self, run_id: RunId, scenario: Scenario) -> Option<DivergenceReport> {
        let Scenario { id, request } = scenario;
        tracing::debug!(scenario = %id, "dispatching to all targets");

        // join_all preserves target order regardless of completion order.
        let results = futures::future::join_all(
            self.config
                .targets
                .iter()
                .map(|target| self.client.send(target, id, &request)),
        )
        .await;

        let canonical: Vec<(String, CanonicalResponse)> = results
            .iter()
            .map(|r| (r.target.clone(), canonicalize(&r.response)))
            .collect();
        let raw: Vec<(String, String)> = results
            .iter()
            .map(|r| (r.target.clone(), r.response.artifact_document()))
            .collect();

        match compare(id, &canonical, &raw) {
            Some(report) => {
                tracing::info!(
                    scenario = %id,
                    pairs = report.pairwise_diffs.len(),
                    "divergence detected"
                );
                if let Err(err) = self.sink.record(run_id, &report) {
                    tracing::error!(scenario = %id, error = %err, "failed to persist report");
                }
                Some(report)
            }
            None => {
                tracing::debug!(scenario = %id, "clean");
                None
            }
        }
    }
}
