// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use serde_yaml::Value;

use crate::errors::{Error, Result, read_input};

/// Producer types a benchmark worker can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerKind {
    Image,
    PointCloud2,
    ByteArray,
}

impl WorkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerKind::Image => "image",
            WorkerKind::PointCloud2 => "pointcloud2",
            WorkerKind::ByteArray => "bytearray",
        }
    }
}

impl fmt::Display for WorkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validated worker declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    pub kind: WorkerKind,
    pub name: String,
    pub topic_base: String,
    /// Publishing rate in Hz.
    pub frequency: f64,
    pub instances: u64,
    /// Messages emitted by each instance over the run.
    pub max_count: u64,
    pub same_topic: bool,
}

/// The `benchmark` section of a description file.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkInfo {
    pub id: String,
    pub tag: String,
    pub name: String,
}

impl BenchmarkInfo {
    /// Name of the directory holding this run's artifacts: `{id}-{tag}`.
    pub fn run_dir_name(&self) -> String {
        format!("{}-{}", self.id, self.tag)
    }
}

/// A parsed and validated benchmark description.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkDescription {
    pub benchmark: BenchmarkInfo,
    /// Workers in declaration order.
    pub workers: Vec<WorkerConfig>,
}

#[derive(Debug, Deserialize)]
struct RawDescription {
    benchmark: Option<RawBenchmark>,
    workers: Option<Vec<RawWorkerEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawBenchmark {
    id: Option<Value>,
    tag: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWorkerEntry {
    image: Option<RawWorker>,
    pointcloud2: Option<RawWorker>,
    bytearray: Option<RawWorker>,
}

// Producer-specific knobs (dimensions, point counts, ...) are not needed for
// the report and are left to serde's default of ignoring unknown fields.
#[derive(Debug, Deserialize)]
struct RawWorker {
    name: Option<String>,
    topic: Option<String>,
    frequency: Option<f64>,
    instances: Option<i64>,
    max_count: Option<i64>,
    same_topic: Option<bool>,
}

impl BenchmarkDescription {
    /// Load and validate a description file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_input(path)?;
        let description = Self::parse(&contents, &path.display().to_string())?;
        debug!(
            "loaded {} worker(s) from {}",
            description.workers.len(),
            path.display()
        );
        Ok(description)
    }

    /// Parse a description from YAML text. `source` names the input in errors.
    pub fn parse(contents: &str, source: &str) -> Result<Self> {
        let raw: RawDescription = serde_yaml::from_str(contents)
            .map_err(|e| Error::malformed(source, format!("invalid YAML: {e}")))?;

        let benchmark = raw
            .benchmark
            .ok_or_else(|| Error::configuration("missing 'benchmark' section"))
            .and_then(validate_benchmark)?;

        let entries = raw
            .workers
            .ok_or_else(|| Error::configuration("missing 'workers' section"))?;

        let mut workers = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let kinds = [
                (WorkerKind::Image, entry.image),
                (WorkerKind::PointCloud2, entry.pointcloud2),
                (WorkerKind::ByteArray, entry.bytearray),
            ];
            let before = workers.len();
            for (kind, raw_worker) in kinds {
                if let Some(raw_worker) = raw_worker {
                    workers.push(validate_worker(index, kind, raw_worker)?);
                }
            }
            if workers.len() == before {
                return Err(Error::configuration(format!(
                    "worker #{index} has no known kind \
                     (expected one of image, pointcloud2, bytearray)"
                )));
            }
        }

        Ok(BenchmarkDescription { benchmark, workers })
    }
}

fn validate_benchmark(raw: RawBenchmark) -> Result<BenchmarkInfo> {
    let id = match raw.id {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(Error::configuration(format!(
                "benchmark.id must be a number or a string, got {other:?}"
            )));
        }
        None => return Err(Error::configuration("missing benchmark.id")),
    };
    let tag = raw
        .tag
        .ok_or_else(|| Error::configuration("missing benchmark.tag"))?;
    let name = raw
        .name
        .ok_or_else(|| Error::configuration("missing benchmark.name"))?;
    Ok(BenchmarkInfo { id, tag, name })
}

fn validate_worker(index: usize, kind: WorkerKind, raw: RawWorker) -> Result<WorkerConfig> {
    let label = match &raw.name {
        Some(name) => format!("worker #{index} ({kind} '{name}')"),
        None => format!("worker #{index} ({kind})"),
    };
    let missing = |field: &str| Error::configuration(format!("{label}: missing '{field}'"));

    let name = raw.name.clone().ok_or_else(|| missing("name"))?;
    let topic_base = raw.topic.ok_or_else(|| missing("topic"))?;
    let frequency = raw.frequency.ok_or_else(|| missing("frequency"))?;
    let instances = raw.instances.ok_or_else(|| missing("instances"))?;
    let max_count = raw.max_count.ok_or_else(|| missing("max_count"))?;

    if !frequency.is_finite() || frequency < 0.0 {
        return Err(Error::configuration(format!(
            "{label}: 'frequency' must be a non-negative number, got {frequency}"
        )));
    }
    let instances = u64::try_from(instances)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| {
            Error::configuration(format!(
                "{label}: 'instances' must be at least 1, got {instances}"
            ))
        })?;
    let max_count = u64::try_from(max_count).map_err(|_| {
        Error::configuration(format!(
            "{label}: 'max_count' must not be negative, got {max_count}"
        ))
    })?;

    Ok(WorkerConfig {
        kind,
        name,
        topic_base,
        frequency,
        instances,
        max_count,
        same_topic: raw.same_topic.unwrap_or(true),
    })
}
