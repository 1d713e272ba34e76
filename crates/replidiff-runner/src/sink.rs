//! Report sink
//!
//! Persists one artifact per (run, scenario, target) and emits the diff
//! text on the run's log stream. The run id is a ULID, so artifacts from
//! repeated invocations never collide, unlike a bare scenario counter.

use replidiff_core::{DivergenceReport, RunId, ScenarioId, SinkError};
use std::fs;
use std::path::{Path, PathBuf};

/// Persists divergence reports
pub trait ReportSink: Send + Sync {
    /// Record one divergent scenario
    ///
    /// # Errors
    /// `SinkError` when an artifact cannot be written; the affected
    /// report is lost but the run continues.
    fn record(&self, run_id: RunId, report: &DivergenceReport) -> Result<(), SinkError>;
}

/// Filesystem sink writing `q-result-{run}-{scenario}-{index}-{target}.json`
#[derive(Debug, Clone)]
pub struct FsReportSink {
    out_dir: PathBuf,
    echo_diffs: bool,
}

impl FsReportSink {
    /// Create sink writing artifacts under `out_dir`
    #[inline]
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            echo_diffs: true,
        }
    }

    /// Control whether diffs are echoed to stdout as they are recorded
    #[inline]
    #[must_use]
    pub fn with_echo_diffs(mut self, echo: bool) -> Self {
        self.echo_diffs = echo;
        self
    }

    /// Artifact directory
    #[inline]
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Artifact location for one (run, scenario, target) triple
    ///
    /// The target's position is part of the name so that two targets with
    /// identical derived names cannot clobber each other.
    fn artifact_path(
        &self,
        run_id: RunId,
        scenario_id: ScenarioId,
        index: usize,
        target: &str,
    ) -> PathBuf {
        self.out_dir
            .join(format!("q-result-{run_id}-{scenario_id}-{index}-{target}.json"))
    }
}

impl ReportSink for FsReportSink {
    fn record(&self, run_id: RunId, report: &DivergenceReport) -> Result<(), SinkError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| SinkError::CreateDir {
            path: self.out_dir.clone(),
            source,
        })?;

        for (index, (target, raw)) in report.raw_responses.iter().enumerate() {
            let path = self.artifact_path(run_id, report.scenario_id, index, target);
            fs::write(&path, raw).map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "wrote response artifact");
        }

        for pair in &report.pairwise_diffs {
            tracing::info!(
                run_id = %run_id,
                scenario = %report.scenario_id,
                left = %pair.left,
                right = %pair.right,
                "divergence:\n{}",
                pair.diff
            );
            if self.echo_diffs {
                println!(
                    "scenario {}: {} vs {}",
                    report.scenario_id, pair.left, pair.right
                );
                println!("{}", pair.diff);
            }
        }

        Ok(())
    }
}
