// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use crate::errors::{Error, Result, read_input};

/// Ground truth for one recorded topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub topic_name: String,
    pub message_type: String,
    pub message_count: u64,
    pub serialization_format: String,
}

/// What the recorder saw during the session, keyed by topic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMetadata {
    /// Recording start in nanoseconds since the Unix epoch.
    pub start_time: i64,
    pub records: BTreeMap<String, CaptureRecord>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    rosbag2_bagfile_information: Option<RawBagInfo>,
}

#[derive(Debug, Deserialize)]
struct RawBagInfo {
    starting_time: Option<RawTime>,
    #[serde(default)]
    topics_with_message_count: Vec<RawTopicCount>,
}

#[derive(Debug, Deserialize)]
struct RawTime {
    nanoseconds_since_epoch: i64,
}

#[derive(Debug, Deserialize)]
struct RawTopicCount {
    topic_metadata: RawTopicMetadata,
    message_count: u64,
}

#[derive(Debug, Deserialize)]
struct RawTopicMetadata {
    name: String,
    #[serde(rename = "type", default)]
    message_type: String,
    #[serde(default)]
    serialization_format: String,
}

impl CaptureMetadata {
    /// Load a bag `metadata.yaml`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_input(path)?;
        Self::parse(&contents, &path.display().to_string())
    }

    pub fn parse(contents: &str, source: &str) -> Result<Self> {
        let raw: RawMetadata = serde_yaml::from_str(contents)
            .map_err(|e| Error::malformed(source, format!("invalid bag metadata: {e}")))?;
        let info = raw.rosbag2_bagfile_information.ok_or_else(|| {
            Error::malformed(source, "missing 'rosbag2_bagfile_information' section")
        })?;
        let start_time = info
            .starting_time
            .ok_or_else(|| Error::malformed(source, "missing 'starting_time'"))?
            .nanoseconds_since_epoch;

        let mut records = BTreeMap::new();
        for entry in info.topics_with_message_count {
            let record = CaptureRecord {
                topic_name: entry.topic_metadata.name,
                message_type: entry.topic_metadata.message_type,
                message_count: entry.message_count,
                serialization_format: entry.topic_metadata.serialization_format,
            };
            debug!(
                "bag topic '{}' ({}): {} message(s)",
                record.topic_name, record.message_type, record.message_count
            );
            if let Some(previous) = records.insert(record.topic_name.clone(), record) {
                warn!(
                    "{source}: topic '{}' listed more than once, keeping the last entry",
                    previous.topic_name
                );
            }
        }

        Ok(CaptureMetadata {
            start_time,
            records,
        })
    }
}
