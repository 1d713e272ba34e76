//! replidiff runner - scenario orchestration and report persistence
//!
//! Drives the full pipeline: corpus -> per-scenario fan-out to every
//! target -> canonicalization -> chain comparison -> report sink. Each
//! scenario moves through PENDING -> DISPATCHED -> CANONICALIZED ->
//! {CLEAN, DIVERGENT}; corpus lines that cannot be used end as SKIPPED.
//!
//! Scenarios run with bounded parallelism and are independent of each
//! other; within a scenario all targets are queried concurrently and all
//! results are buffered before any diff is emitted, so report output is
//! deterministic regardless of network timing.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod runner;
pub mod sink;

pub use runner::{RunHandle, RunSummary, RunnerConfig, ScenarioRunner};
pub use sink::{FsReportSink, ReportSink};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
