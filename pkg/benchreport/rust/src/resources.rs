// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! System resource time series sampled during a benchmark run.

use std::path::Path;

use crate::errors::{Error, Result};
use crate::samples::{SampleRow, read_rows};

/// Disk counters are exported in a unit that maps to MB/s with this divisor.
pub const DISK_RATE_DIVISOR: f64 = 1000.0;
/// Memory counters are exported in bytes.
pub const MEMORY_DIVISOR: f64 = 1_000_000.0;

/// Population statistics of a value set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Returns `None` for an empty set.
    pub fn of<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let values: Vec<f64> = values.into_iter().copied().collect();
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Rounding can push the mean of a constant set just past its bounds.
        let mean = if min <= max { mean.clamp(min, max) } else { mean };
        Some(Summary {
            mean,
            std: variance.sqrt(),
            min,
            max,
        })
    }
}

fn summarize<'a>(input: &str, values: impl IntoIterator<Item = &'a f64>) -> Result<Summary> {
    Summary::of(values).ok_or_else(|| Error::malformed(input, "no samples"))
}

/// Replace the generic input label of a malformed-input error with a path.
fn with_source(path: &Path, err: Error) -> Error {
    match err {
        Error::MalformedInput { context, .. } => Error::MalformedInput {
            input: path.display().to_string(),
            context,
        },
        other => other,
    }
}

fn check_columns(input: &str, index: usize, row: &SampleRow, expected: usize) -> Result<()> {
    if row.columns() != expected {
        return Err(Error::malformed(
            input,
            format!(
                "row {}: expected {expected} columns, found {}",
                index + 1,
                row.columns()
            ),
        ));
    }
    Ok(())
}

/// The three resource series of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSet {
    pub cpu: CpuSeries,
    pub disk: DiskSeries,
    pub memory: MemorySeries,
}

impl ResourceSet {
    pub fn load(cpu: &Path, disk: &Path, memory: &Path) -> Result<Self> {
        Ok(ResourceSet {
            cpu: CpuSeries::load(cpu)?,
            disk: DiskSeries::load(disk)?,
            memory: MemorySeries::load(memory)?,
        })
    }
}

/// CPU utilization: `timestamp;average;core0;core1;...`, all in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuSeries {
    timestamps: Vec<i64>,
    average: Vec<f64>,
    per_core: Vec<Vec<f64>>,
    summary: Summary,
    average_summary: Summary,
}

impl CpuSeries {
    const INPUT: &'static str = "cpu samples";

    pub fn load(path: &Path) -> Result<Self> {
        let rows = read_rows(path)?;
        Self::from_rows(&rows).map_err(|e| with_source(path, e))
    }

    /// The first row fixes the core count; every other row must match it.
    pub fn from_rows(rows: &[SampleRow]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| Error::malformed(Self::INPUT, "no samples"))?;
        let columns = first.columns();
        if columns < 3 {
            return Err(Error::malformed(
                Self::INPUT,
                format!(
                    "row 1: expected timestamp, average and at least one core, \
                     found {columns} columns"
                ),
            ));
        }
        let cores = columns - 2;

        let mut timestamps = Vec::with_capacity(rows.len());
        let mut average = Vec::with_capacity(rows.len());
        let mut per_core = vec![Vec::with_capacity(rows.len()); cores];
        for (index, row) in rows.iter().enumerate() {
            check_columns(Self::INPUT, index, row, columns)?;
            let mut values = row.values.iter().copied();
            timestamps.push(row.timestamp);
            average.extend(values.next());
            for (core, value) in per_core.iter_mut().zip(values) {
                core.push(value);
            }
        }

        let summary = summarize(Self::INPUT, per_core.iter().flatten())?;
        let average_summary = summarize(Self::INPUT, &average)?;
        Ok(CpuSeries {
            timestamps,
            average,
            per_core,
            summary,
            average_summary,
        })
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Average utilization as reported by the exporter.
    pub fn average(&self) -> &[f64] {
        &self.average
    }

    pub fn per_core(&self) -> &[Vec<f64>] {
        &self.per_core
    }

    pub fn core_count(&self) -> usize {
        self.per_core.len()
    }

    /// Statistics over every (core, timestamp) value as one flat set.
    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Statistics of the exporter's average column.
    pub fn average_summary(&self) -> Summary {
        self.average_summary
    }
}

/// Disk throughput: `timestamp;read;write`, converted to MB/s.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskSeries {
    timestamps: Vec<i64>,
    read: Vec<f64>,
    write: Vec<f64>,
    read_summary: Summary,
    write_summary: Summary,
}

impl DiskSeries {
    const INPUT: &'static str = "disk samples";

    pub fn load(path: &Path) -> Result<Self> {
        let rows = read_rows(path)?;
        Self::from_rows(&rows).map_err(|e| with_source(path, e))
    }

    pub fn from_rows(rows: &[SampleRow]) -> Result<Self> {
        let mut timestamps = Vec::with_capacity(rows.len());
        let mut read = Vec::with_capacity(rows.len());
        let mut write = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            check_columns(Self::INPUT, index, row, 3)?;
            if let [r, w] = row.values.as_slice() {
                timestamps.push(row.timestamp);
                read.push(r / DISK_RATE_DIVISOR);
                write.push(w / DISK_RATE_DIVISOR);
            }
        }

        let read_summary = summarize(Self::INPUT, &read)?;
        let write_summary = summarize(Self::INPUT, &write)?;
        Ok(DiskSeries {
            timestamps,
            read,
            write,
            read_summary,
            write_summary,
        })
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn read(&self) -> &[f64] {
        &self.read
    }

    pub fn write(&self) -> &[f64] {
        &self.write
    }

    pub fn read_summary(&self) -> Summary {
        self.read_summary
    }

    pub fn write_summary(&self) -> Summary {
        self.write_summary
    }
}

/// Memory usage: `timestamp;used`, converted to MB.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySeries {
    timestamps: Vec<i64>,
    used: Vec<f64>,
    summary: Summary,
}

impl MemorySeries {
    const INPUT: &'static str = "memory samples";

    pub fn load(path: &Path) -> Result<Self> {
        let rows = read_rows(path)?;
        Self::from_rows(&rows).map_err(|e| with_source(path, e))
    }

    pub fn from_rows(rows: &[SampleRow]) -> Result<Self> {
        let mut timestamps = Vec::with_capacity(rows.len());
        let mut used = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            check_columns(Self::INPUT, index, row, 2)?;
            if let [bytes] = row.values.as_slice() {
                timestamps.push(row.timestamp);
                used.push(bytes / MEMORY_DIVISOR);
            }
        }

        let summary = summarize(Self::INPUT, &used)?;
        Ok(MemorySeries {
            timestamps,
            used,
            summary,
        })
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn used(&self) -> &[f64] {
        &self.used
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::parse_rows;

    fn rows(text: &str) -> Vec<SampleRow> {
        parse_rows(text, "test").unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{actual} != {expected}"
        );
    }

    #[test]
    fn test_summary_population_statistics() {
        let summary = Summary::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.mean, 5.0);
        // Population std; the Bessel-corrected value would be ~2.138.
        assert_eq!(summary.std, 2.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(Summary::of(&[]).is_none());
    }

    #[test]
    fn test_summary_bounds_hold() {
        let sets: [&[f64]; 5] = [
            &[0.1; 7],
            &[1e300, 1e300, 1e300],
            &[-3.5],
            &[0.0, 100.0, 33.3, 66.6],
            &[1e-12, 5e-13, 7e-12, 1e-13],
        ];
        for values in sets {
            let summary = Summary::of(values).unwrap();
            assert!(summary.std >= 0.0, "{values:?}");
            assert!(summary.min <= summary.mean && summary.mean <= summary.max, "{values:?}");
        }
    }

    #[test]
    fn test_cpu_series_splits_cores() {
        let cpu =
            CpuSeries::from_rows(&rows("1000;50.0;40.0;60.0\n2000;55.0;45.0;65.0\n")).unwrap();
        assert_eq!(cpu.timestamps(), &[1000, 2000]);
        assert_eq!(cpu.core_count(), 2);
        assert_eq!(cpu.per_core(), &[vec![40.0, 45.0], vec![60.0, 65.0]]);
        assert_eq!(cpu.average(), &[50.0, 55.0]);
        assert_eq!(cpu.summary().mean, 52.5);
        assert_eq!(cpu.summary().min, 40.0);
        assert_eq!(cpu.summary().max, 65.0);
    }

    #[test]
    fn test_cpu_average_column_is_not_recomputed() {
        // The exporter's average disagrees with the mean of the per-core values.
        let cpu = CpuSeries::from_rows(&rows("1;10.0;80.0;90.0\n2;20.0;70.0;100.0\n")).unwrap();
        assert_eq!(cpu.average(), &[10.0, 20.0]);
        assert_eq!(cpu.average_summary().mean, 15.0);
        assert_eq!(cpu.average_summary().std, 5.0);
        assert_eq!(cpu.summary().mean, 85.0);
        assert_close(cpu.summary().std, 125.0_f64.sqrt());
    }

    #[test]
    fn test_cpu_flattened_std() {
        let cpu =
            CpuSeries::from_rows(&rows("1000;50.0;40.0;60.0\n2000;55.0;45.0;65.0\n")).unwrap();
        // Values 40, 45, 60, 65 around 52.5: squared deviations 156.25, 56.25, 56.25, 156.25.
        assert_close(cpu.summary().std, 106.25_f64.sqrt());
    }

    #[test]
    fn test_cpu_shape_mismatch() {
        match CpuSeries::from_rows(&rows("1;50;40;60\n2;55;45\n")) {
            Err(Error::MalformedInput { context, .. }) => {
                assert!(context.contains("row 2"), "{context}");
                assert!(context.contains("expected 4 columns, found 3"), "{context}");
            }
            other => panic!("expected malformed input, got {other:?}"),
        }
        assert!(CpuSeries::from_rows(&rows("1;50;40;60\n2;55;45;65;70\n")).is_err());
    }

    #[test]
    fn test_cpu_needs_a_core() {
        assert!(CpuSeries::from_rows(&rows("1;50\n")).is_err());
        assert!(CpuSeries::from_rows(&[]).is_err());
    }

    #[test]
    fn test_disk_series_converts_units() {
        let disk = DiskSeries::from_rows(&rows("1;2000;4000\n2;6000;8000\n")).unwrap();
        assert_eq!(disk.timestamps(), &[1, 2]);
        assert_eq!(disk.read(), &[2.0, 6.0]);
        assert_eq!(disk.write(), &[4.0, 8.0]);
        assert_eq!(disk.read_summary().mean, 4.0);
        assert_eq!(disk.read_summary().std, 2.0);
        assert_eq!(disk.write_summary().mean, 6.0);
        assert_eq!(disk.write_summary().std, 2.0);
    }

    #[test]
    fn test_disk_wrong_columns() {
        assert!(matches!(
            DiskSeries::from_rows(&rows("1;2000\n")),
            Err(Error::MalformedInput { .. })
        ));
        assert!(DiskSeries::from_rows(&[]).is_err());
    }

    #[test]
    fn test_memory_series_converts_units() {
        let memory = MemorySeries::from_rows(&rows("1;1000000\n2;3000000\n3;2000000\n")).unwrap();
        assert_eq!(memory.used(), &[1.0, 3.0, 2.0]);
        let summary = memory.summary();
        assert_eq!(summary.mean, 2.0);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 3.0);
        assert_close(summary.std, (2.0_f64 / 3.0).sqrt());
    }

    #[test]
    fn test_memory_wrong_columns() {
        assert!(MemorySeries::from_rows(&rows("1;2;3\n")).is_err());
        assert!(MemorySeries::from_rows(&[]).is_err());
    }

    #[test]
    fn test_load_labels_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("system_cpu.csv");
        std::fs::write(&path, "1;50;40\n2;55\n").unwrap();
        match CpuSeries::load(&path) {
            Err(Error::MalformedInput { input, .. }) => assert!(input.ends_with("system_cpu.csv")),
            other => panic!("expected malformed input, got {other:?}"),
        }
    }
}
