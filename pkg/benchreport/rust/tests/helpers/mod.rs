// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const BASE_TIME: i64 = 1_600_000_000_000_000_000;

/// A camera publishing twice on `/cam` and three lidars on `/lidar{0,1,2}`.
pub const DESCRIPTION: &str = r#"
benchmark:
  id: 7
  tag: smoke
  name: Smoke benchmark
workers:
  - image:
      name: cam0
      topic: cam
      frequency: 10
      instances: 2
      max_count: 100
      same_topic: true
      dimensions: 1920x1080
  - pointcloud2:
      name: lidar
      topic: lidar
      frequency: 5
      instances: 3
      max_count: 50
      same_topic: false
"#;

/// A benchmark run directory laid out the way the recorder leaves it.
pub struct RunFixture {
    pub report_dir: tempfile::TempDir,
    pub description: PathBuf,
}

impl RunFixture {
    /// Writes the description plus a complete, consistent run directory.
    pub fn new() -> Self {
        Self::with_description(DESCRIPTION)
    }

    pub fn with_description(description: &str) -> Self {
        let report_dir = tempfile::tempdir().unwrap();
        let path = report_dir.path().join("description.yaml");
        fs::write(&path, description).unwrap();
        let fixture = Self {
            report_dir,
            description: path,
        };
        fixture.write_metadata(&[
            ("/cam", 180),
            ("/lidar0", 50),
            ("/lidar1", 40),
            ("/lidar2", 50),
            ("/rosout", 12),
        ]);
        fixture.write_samples(
            "system_cpu.csv",
            &format!(
                "{};50.0;40.0;60.0;\n{};55.0;45.0;65.0;\n",
                BASE_TIME,
                BASE_TIME + 1_000_000_000
            ),
        );
        fixture.write_samples(
            "system_disk.csv",
            &format!(
                "{};2000;4000\n{};6000;8000\n",
                BASE_TIME,
                BASE_TIME + 1_000_000_000
            ),
        );
        fixture.write_samples(
            "system_mem.csv",
            &format!(
                "{};1000000\n\n{};3000000\n",
                BASE_TIME,
                BASE_TIME + 1_000_000_000
            ),
        );
        fixture
    }

    pub fn run_dir(&self) -> PathBuf {
        self.report_dir.path().join("7-smoke")
    }

    pub fn report_dir(&self) -> &Path {
        self.report_dir.path()
    }

    pub fn write_metadata(&self, topics: &[(&str, u64)]) {
        let mut yaml = format!(
            "rosbag2_bagfile_information:\n  version: 4\n  storage_identifier: sqlite3\n  \
             starting_time:\n    nanoseconds_since_epoch: {BASE_TIME}\n  \
             topics_with_message_count:\n"
        );
        for (name, count) in topics {
            yaml.push_str(&format!(
                "    - topic_metadata:\n        name: {name}\n        \
                 type: sensor_msgs/msg/Image\n        serialization_format: cdr\n      \
                 message_count: {count}\n"
            ));
        }
        let bag = self.run_dir().join("bag");
        fs::create_dir_all(&bag).unwrap();
        fs::write(bag.join("metadata.yaml"), yaml).unwrap();
    }

    pub fn write_samples(&self, file_name: &str, contents: &str) {
        fs::create_dir_all(self.run_dir()).unwrap();
        fs::write(self.run_dir().join(file_name), contents).unwrap();
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.run_dir().join(relative)).unwrap();
    }
}
