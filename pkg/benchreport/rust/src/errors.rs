// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort report generation for a benchmark run.
///
/// None of them are retried: the inputs describe a finished recording session
/// and will not change between attempts.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {context}")]
    Configuration { context: String },

    #[error("input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("malformed input in {input}: {context}")]
    MalformedInput { input: String, context: String },

    #[error("reconciliation failed for topic '{topic}': {context}")]
    Reconciliation { topic: String, context: String },

    #[error("could not render {artifact}: {context}")]
    Render { artifact: String, context: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn configuration(context: impl Into<String>) -> Self {
        Error::Configuration {
            context: context.into(),
        }
    }

    pub(crate) fn malformed(input: impl Into<String>, context: impl Into<String>) -> Self {
        Error::MalformedInput {
            input: input.into(),
            context: context.into(),
        }
    }

    pub(crate) fn reconciliation(topic: impl Into<String>, context: impl Into<String>) -> Self {
        Error::Reconciliation {
            topic: topic.into(),
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reads a whole input file, mapping a missing file to `InputNotFound`.
pub(crate) fn read_input(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
