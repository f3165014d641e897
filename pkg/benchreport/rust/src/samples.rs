// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::errors::{Error, Result, read_input};

const DELIMITER: u8 = b';';

/// One line of a resource CSV: a timestamp followed by measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    pub values: Vec<f64>,
}

impl SampleRow {
    /// Number of columns in the source line, timestamp included.
    pub fn columns(&self) -> usize {
        self.values.len() + 1
    }
}

pub fn read_rows(path: &Path) -> Result<Vec<SampleRow>> {
    let contents = read_input(path)?;
    parse_rows(&contents, &path.display().to_string())
}

/// Parse semicolon-delimited, header-less sample lines.
///
/// Blank lines are skipped. The resource exporter terminates lines with a
/// delimiter, so a single empty trailing field is dropped.
pub fn parse_rows(contents: &str, source: &str) -> Result<Vec<SampleRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(contents.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::malformed(source, format!("invalid CSV: {e}")))?;
        let line_no = record.position().map_or(0, |p| p.line());
        if is_blank(&record) {
            continue;
        }

        let mut fields = record.iter();
        if record.iter().next_back() == Some("") {
            fields.next_back();
        }
        let timestamp = fields
            .next()
            .ok_or_else(|| Error::malformed(source, format!("line {line_no}: empty row")))
            .and_then(|field| parse_timestamp(field, source, line_no))?;
        let values = fields
            .enumerate()
            .map(|(column, field)| parse_value(field, source, line_no, column + 2))
            .collect::<Result<Vec<f64>>>()?;

        rows.push(SampleRow { timestamp, values });
    }
    Ok(rows)
}

/// Whitespace-only lines come through as a single empty field.
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0) == Some("")
}

fn parse_timestamp(field: &str, source: &str, line_no: u64) -> Result<i64> {
    if let Ok(ts) = field.parse::<i64>() {
        return Ok(ts);
    }
    // Some exporters write timestamps as floats ("1600000000000.0").
    match field.parse::<f64>() {
        Ok(ts) if ts.is_finite() && ts.fract() == 0.0 && ts.abs() < i64::MAX as f64 => {
            Ok(ts as i64)
        }
        _ => Err(Error::malformed(
            source,
            format!("line {line_no}: invalid timestamp '{field}'"),
        )),
    }
}

fn parse_value(field: &str, source: &str, line_no: u64, column: usize) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::malformed(
            source,
            format!("line {line_no}, column {column}: '{field}' is not a number"),
        )),
    }
}
