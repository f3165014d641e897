// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

mod helpers;

use std::path::Path;
use std::process::{Command, Output};

use helpers::RunFixture;

fn bench_report(report_dir: &Path, description: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bench-report"))
        .arg("--report-dir")
        .arg(report_dir)
        .arg("--description")
        .arg(description)
        .output()
        .expect("failed to run bench-report")
}

/// simple_logger writes INFO to stdout, WARN/ERROR to stderr.
fn logs(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn test_cli_generates_artifacts() {
    let fixture = RunFixture::new();
    let output = bench_report(fixture.report_dir(), &fixture.description);
    let logs = logs(&output);

    assert!(output.status.success(), "bench-report failed:\n{logs}");
    assert!(fixture.run_dir().join("report.yaml").is_file());
    assert!(fixture.run_dir().join("plots.svg").is_file());
    assert!(logs.contains("Report: Smoke benchmark"), "{logs}");
    assert!(logs.contains("'/cam': 180/200 (90.0000%)"), "{logs}");
}

#[test]
fn test_cli_missing_metadata_fails() {
    let fixture = RunFixture::new();
    fixture.remove("bag/metadata.yaml");

    let output = bench_report(fixture.report_dir(), &fixture.description);
    let logs = logs(&output);

    assert!(!output.status.success());
    assert!(logs.contains("input not found"), "{logs}");
    assert!(!fixture.run_dir().join("report.yaml").exists());
}

#[test]
fn test_cli_zero_expected_count_fails() {
    let fixture = RunFixture::with_description(
        "benchmark: {id: 7, tag: smoke, name: Zero}\n\
         workers:\n  - image: {name: cam0, topic: cam, frequency: 10, \
         instances: 2, max_count: 0}\n",
    );

    let output = bench_report(fixture.report_dir(), &fixture.description);
    let logs = logs(&output);

    assert!(!output.status.success());
    assert!(logs.contains("expected message count is zero"), "{logs}");
    assert!(!fixture.run_dir().join("report.yaml").exists());
}

#[test]
fn test_cli_missing_worker_field_fails() {
    let fixture = RunFixture::with_description(
        "benchmark: {id: 7, tag: smoke, name: Broken}\n\
         workers:\n  - image: {name: cam0, topic: cam, frequency: 10, instances: 2}\n",
    );

    let output = bench_report(fixture.report_dir(), &fixture.description);
    let logs = logs(&output);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(logs.contains("worker #0"), "{logs}");
    assert_eq!(logs.matches("missing 'max_count'").count(), 1, "{logs}");
    assert!(!logs.contains("Caused by"), "{logs}");
    assert!(!fixture.run_dir().join("report.yaml").exists());
}

#[test]
fn test_cli_missing_description_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = bench_report(dir.path(), &dir.path().join("absent.yaml"));

    assert!(!output.status.success());
    assert!(logs(&output).contains("absent.yaml"));
}

#[test]
fn test_cli_requires_description() {
    let output = Command::new(env!("CARGO_BIN_EXE_bench-report"))
        .output()
        .expect("failed to run bench-report");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--description"));
}
