// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::BTreeMap;

use log::debug;

use crate::capture::CaptureRecord;
use crate::errors::{Error, Result};
use crate::expectation::Expectations;

/// How much of a topic's expected traffic made it into the recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOutcome {
    pub captured: u64,
    pub expected: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureTotals {
    pub captured: u64,
    pub expected: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub outcomes: BTreeMap<String, CaptureOutcome>,
    pub totals: CaptureTotals,
}

/// `captured / expected * 100`. A zero `expected` has no meaningful ratio and
/// is rejected.
pub fn capture_percent(topic: &str, captured: u64, expected: u64) -> Result<f64> {
    if expected == 0 {
        return Err(Error::reconciliation(
            topic,
            format!("expected message count is zero ({captured} captured)"),
        ));
    }
    Ok(captured as f64 / expected as f64 * 100.0)
}

/// Join expectations with what the recorder captured.
///
/// Every expected topic must appear in `actual`; recorded topics nobody
/// declared are ignored.
pub fn reconcile(
    expectations: &Expectations,
    actual: &BTreeMap<String, CaptureRecord>,
) -> Result<Reconciliation> {
    let mut outcomes = BTreeMap::new();
    let mut total_captured: u64 = 0;
    let mut total_expected: u64 = 0;

    for (topic, expectation) in expectations {
        let record = actual.get(topic).ok_or_else(|| {
            Error::reconciliation(
                topic.as_str(),
                format!(
                    "no capture record in bag metadata ({} message(s) expected)",
                    expectation.expected_count
                ),
            )
        })?;
        let captured = record.message_count;
        let expected = expectation.expected_count;
        let percent = capture_percent(topic, captured, expected)?;

        total_captured = total_captured
            .checked_add(captured)
            .ok_or_else(|| Error::reconciliation(topic.as_str(), "captured total overflows"))?;
        total_expected = total_expected
            .checked_add(expected)
            .ok_or_else(|| Error::reconciliation(topic.as_str(), "expected total overflows"))?;

        outcomes.insert(
            topic.clone(),
            CaptureOutcome {
                captured,
                expected,
                percent,
            },
        );
    }

    for topic in actual.keys().filter(|t| !expectations.contains_key(*t)) {
        debug!("ignoring recorded topic '{topic}': no worker publishes on it");
    }

    let percent = capture_percent("<total>", total_captured, total_expected)?;
    Ok(Reconciliation {
        outcomes,
        totals: CaptureTotals {
            captured: total_captured,
            expected: total_expected,
            percent,
        },
    })
}
