// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::expectation::{Expectations, WorkerDescriptor};
use crate::reconcile::{CaptureOutcome, CaptureTotals, Reconciliation};
use crate::resources::{ResourceSet, Summary};

const RULE: &str = "==================================";

/// Everything known about one benchmark run, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub output_dir: PathBuf,
    /// Recording start in nanoseconds since the Unix epoch; plot time axes
    /// are relative to it.
    pub base_time: i64,
    pub outcomes: BTreeMap<String, CaptureOutcome>,
    pub totals: CaptureTotals,
    pub workers: BTreeMap<String, WorkerDescriptor>,
    pub resources: ResourceSet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportSummary {
    pub totals: CaptureTotals,
    pub disk_read: Summary,
    pub disk_write: Summary,
    pub cpu: Summary,
    pub cpu_average: Summary,
    pub memory: Summary,
}

/// Serialized form of a report (`report.yaml`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub benchmark: BenchmarkSection,
    pub messages: MessagesSection,
    pub disk: DiskSection,
    pub cpu: StatsSection,
    pub memory: MemorySection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSection {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesSection {
    pub captured: u64,
    pub expected: u64,
    pub percent: f64,
    #[serde(default)]
    pub topics: BTreeMap<String, TopicSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSection {
    pub captured: u64,
    pub expected: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskSection {
    pub write: StatsSection,
    pub read: StatsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSection {
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySection {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl From<Summary> for StatsSection {
    fn from(summary: Summary) -> Self {
        StatsSection {
            mean: summary.mean,
            std: summary.std,
        }
    }
}

impl Report {
    pub fn assemble(
        title: impl Into<String>,
        output_dir: impl Into<PathBuf>,
        base_time: i64,
        reconciliation: Reconciliation,
        expectations: &Expectations,
        resources: ResourceSet,
    ) -> Self {
        let workers = expectations
            .iter()
            .map(|(topic, expectation)| (topic.clone(), expectation.descriptor.clone()))
            .collect();
        Report {
            title: title.into(),
            output_dir: output_dir.into(),
            base_time,
            outcomes: reconciliation.outcomes,
            totals: reconciliation.totals,
            workers,
            resources,
        }
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            totals: self.totals,
            disk_read: self.resources.disk.read_summary(),
            disk_write: self.resources.disk.write_summary(),
            cpu: self.resources.cpu.summary(),
            cpu_average: self.resources.cpu.average_summary(),
            memory: self.resources.memory.summary(),
        }
    }

    pub fn document(&self) -> ReportDocument {
        let summary = self.summary();
        ReportDocument {
            benchmark: BenchmarkSection {
                title: self.title.clone(),
            },
            messages: MessagesSection {
                captured: summary.totals.captured,
                expected: summary.totals.expected,
                percent: summary.totals.percent,
                topics: self
                    .outcomes
                    .iter()
                    .map(|(topic, outcome)| {
                        (
                            topic.clone(),
                            TopicSection {
                                captured: outcome.captured,
                                expected: outcome.expected,
                                percent: outcome.percent,
                            },
                        )
                    })
                    .collect(),
            },
            disk: DiskSection {
                write: summary.disk_write.into(),
                read: summary.disk_read.into(),
            },
            cpu: summary.cpu.into(),
            memory: MemorySection {
                mean: summary.memory.mean,
                std: summary.memory.std,
                min: summary.memory.min,
                max: summary.memory.max,
            },
        }
    }

    /// Milliseconds between the recording start and `timestamp` (nanoseconds).
    pub fn relative_ms(&self, timestamp: i64) -> f64 {
        (i128::from(timestamp) - i128::from(self.base_time)) as f64 / 1_000_000.0
    }

    pub fn start_time_display(&self) -> String {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(self.base_time))
            .ok()
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| format!("{} ns since epoch", self.base_time))
    }

    fn fmt_workers(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (topic, worker) in &self.workers {
            writeln!(
                f,
                "{}:{} - {} instance(s) on '{}' at {}Hz",
                worker.worker_type,
                worker.worker_name,
                worker.instance_count,
                topic,
                worker.frequency
            )?;
        }
        Ok(())
    }

    fn fmt_messages(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (topic, outcome) in &self.outcomes {
            writeln!(
                f,
                "'{}': {}/{} ({:.4}%)",
                topic, outcome.captured, outcome.expected, outcome.percent
            )?;
        }
        writeln!(f)?;
        writeln!(f, " Total:")?;
        writeln!(
            f,
            " {}/{} ({:.4}%)",
            self.totals.captured, self.totals.expected, self.totals.percent
        )
    }

    fn fmt_resources(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();
        let rows = [
            ("CPU per core [%]", summary.cpu),
            ("CPU average [%]", summary.cpu_average),
            ("Disk read [MB/s]", summary.disk_read),
            ("Disk write [MB/s]", summary.disk_write),
            ("Memory used [MB]", summary.memory),
        ];
        for (label, stats) in rows {
            writeln!(
                f,
                "{label}: mean {:.2}, std {:.2}, min {:.2}, max {:.2}",
                stats.mean, stats.std, stats.min, stats.max
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "----------------------------------")?;
        writeln!(f, "Report: {}", self.title)?;
        writeln!(f, "Recording started: {}", self.start_time_display())?;
        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Workers:")?;
        self.fmt_workers(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Messages captured:")?;
        self.fmt_messages(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Resources:")?;
        self.fmt_resources(f)?;
        writeln!(f, "{RULE}")
    }
}
