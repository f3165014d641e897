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

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bench_report::{BenchmarkDescription, default_sinks};
use clap::Parser;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "bench-report")]
#[command(about = "Generate a capture and resource usage report for a rosbag2 benchmark run")]
struct Args {
    /// Directory holding the `{id}-{tag}` run directories
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// Benchmark description (benchmark section and worker declarations)
    #[arg(long)]
    description: PathBuf,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, default_value = "info")]
    log_level: log::Level,
}

fn run(args: &Args) -> Result<()> {
    let description = BenchmarkDescription::load(&args.description).with_context(|| {
        format!(
            "Failed to load benchmark description {}",
            args.description.display()
        )
    })?;

    let (report, written) = bench_report::run(&args.report_dir, &description, &default_sinks())
        .with_context(|| {
            format!(
                "Failed to generate report for benchmark '{}'",
                description.benchmark.name
            )
        })?;

    info!("\n{report}");
    info!("{} artifact(s) written", written.len());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if simple_logger::init_with_level(args.log_level).is_err() {
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
