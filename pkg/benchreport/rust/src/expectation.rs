// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Expected message counts per topic, derived from the worker declarations.
//!
//! A worker publishing on a shared topic (`same_topic: true`, the default)
//! contributes `max_count * instances` messages to `/<topic>`. Otherwise each
//! instance `i` publishes `max_count` messages to its own `/<topic><i>`.
//! Contributions from different workers that land on the same topic add up.
//!
//! When several workers share a topic, the descriptor of the last one in
//! declaration order is the one kept for display.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use log::debug;

use crate::config::{WorkerConfig, WorkerKind};
use crate::errors::{Error, Result};

/// Display metadata about the worker publishing on a topic.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerDescriptor {
    pub worker_name: String,
    pub worker_type: WorkerKind,
    pub frequency: f64,
    pub instance_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicExpectation {
    pub expected_count: u64,
    pub descriptor: WorkerDescriptor,
}

pub type Expectations = BTreeMap<String, TopicExpectation>;

/// Accumulates worker contributions. Consumed by [`ExpectationBuilder::finish`].
#[derive(Debug, Default)]
pub struct ExpectationBuilder {
    topics: Expectations,
}

impl ExpectationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_worker(&mut self, worker: &WorkerConfig) -> Result<()> {
        if worker.same_topic {
            let expected = worker.max_count.checked_mul(worker.instances).ok_or_else(|| {
                Error::configuration(format!(
                    "worker '{}': max_count * instances overflows",
                    worker.name
                ))
            })?;
            let topic = format!("/{}", worker.topic_base);
            self.contribute(topic, expected, descriptor(worker, worker.instances))
        } else {
            for i in 0..worker.instances {
                let topic = format!("/{}{}", worker.topic_base, i);
                self.contribute(topic, worker.max_count, descriptor(worker, 1))?;
            }
            Ok(())
        }
    }

    fn contribute(
        &mut self,
        topic: String,
        count: u64,
        descriptor: WorkerDescriptor,
    ) -> Result<()> {
        debug!(
            "topic '{topic}': +{count} expected from {} '{}'",
            descriptor.worker_type, descriptor.worker_name
        );
        match self.topics.entry(topic) {
            Entry::Occupied(mut entry) => {
                let total = entry.get().expected_count.checked_add(count).ok_or_else(|| {
                    Error::configuration(format!(
                        "expected message count for topic '{}' overflows",
                        entry.key()
                    ))
                })?;
                let existing = entry.get_mut();
                existing.expected_count = total;
                existing.descriptor = descriptor;
            }
            Entry::Vacant(entry) => {
                entry.insert(TopicExpectation {
                    expected_count: count,
                    descriptor,
                });
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Expectations {
        self.topics
    }
}

fn descriptor(worker: &WorkerConfig, instance_count: u64) -> WorkerDescriptor {
    WorkerDescriptor {
        worker_name: worker.name.clone(),
        worker_type: worker.kind,
        frequency: worker.frequency,
        instance_count,
    }
}

/// Build per-topic expectations from workers in declaration order.
pub fn build(workers: &[WorkerConfig]) -> Result<Expectations> {
    let mut builder = ExpectationBuilder::new();
    for worker in workers {
        builder.add_worker(worker)?;
    }
    Ok(builder.finish())
}
