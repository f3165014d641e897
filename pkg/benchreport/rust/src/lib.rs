// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::undocumented_unsafe_blocks)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

//! Benchmark report generation for rosbag2 recording sessions.
//!
//! A run directory holds the bag metadata written by the recorder plus the
//! CPU, disk and memory samples collected while it ran. The declared worker
//! set tells how many messages each topic should have received; the report
//! compares that with what was actually captured and summarizes resource
//! usage.

pub mod capture;
pub mod config;
mod errors;
pub mod expectation;
pub mod layout;
pub mod plot;
pub mod reconcile;
pub mod report;
pub mod resources;
pub mod samples;
pub mod sink;

use std::path::{Path, PathBuf};

use log::{debug, info};

pub use config::{BenchmarkDescription, BenchmarkInfo, WorkerConfig, WorkerKind};
pub use errors::{Error, Result};
pub use layout::BenchmarkLayout;
pub use report::{Report, ReportDocument};
pub use sink::{ReportSink, default_sinks, write_artifacts};

/// Loads every input of one benchmark run and assembles its report.
///
/// Nothing is written to disk; see [`run`] for the full pipeline.
pub fn generate_report(report_dir: &Path, description: &BenchmarkDescription) -> Result<Report> {
    let layout = BenchmarkLayout::new(report_dir, &description.benchmark);
    info!("generating report for {}", layout.root().display());

    let expectations = expectation::build(&description.workers)?;
    debug!(
        "{} worker(s) declare {} topic(s)",
        description.workers.len(),
        expectations.len()
    );

    let metadata = capture::CaptureMetadata::load(&layout.bag_metadata())?;
    let reconciliation = reconcile::reconcile(&expectations, &metadata.records)?;

    let resources = resources::ResourceSet::load(
        &layout.cpu_samples(),
        &layout.disk_samples(),
        &layout.memory_samples(),
    )?;

    Ok(Report::assemble(
        description.benchmark.name.clone(),
        layout.root(),
        metadata.start_time,
        reconciliation,
        &expectations,
        resources,
    ))
}

/// Generates the report and writes it through the given sinks.
///
/// Returns the report together with the paths of the written artifacts.
pub fn run(
    report_dir: &Path,
    description: &BenchmarkDescription,
    sinks: &[Box<dyn ReportSink>],
) -> Result<(Report, Vec<PathBuf>)> {
    let report = generate_report(report_dir, description)?;
    let written = write_artifacts(&report, sinks)?;
    Ok((report, written))
}
