// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::{Path, PathBuf};

use crate::config::BenchmarkInfo;

/// Files making up one benchmark run directory (`{report_dir}/{id}-{tag}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkLayout {
    root: PathBuf,
}

impl BenchmarkLayout {
    pub fn new(report_dir: &Path, benchmark: &BenchmarkInfo) -> Self {
        Self {
            root: report_dir.join(benchmark.run_dir_name()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bag_metadata(&self) -> PathBuf {
        self.root.join("bag").join("metadata.yaml")
    }

    pub fn cpu_samples(&self) -> PathBuf {
        self.root.join("system_cpu.csv")
    }

    pub fn disk_samples(&self) -> PathBuf {
        self.root.join("system_disk.csv")
    }

    pub fn memory_samples(&self) -> PathBuf {
        self.root.join("system_mem.csv")
    }
}
