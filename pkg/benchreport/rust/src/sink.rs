// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fs;
use std::path::PathBuf;

use log::{debug, info};

use crate::errors::{Error, Result};
use crate::plot::SvgPlotRenderer;
use crate::report::Report;

pub const REPORT_FILE: &str = "report.yaml";

/// A rendered file, not yet written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Turns a finished [`Report`] into an output file.
pub trait ReportSink {
    fn name(&self) -> &str;
    fn render(&self, report: &Report) -> Result<Artifact>;
}

/// Writes the structured summary as `report.yaml`.
#[derive(Debug, Default)]
pub struct YamlReportWriter;

impl ReportSink for YamlReportWriter {
    fn name(&self) -> &str {
        "yaml report"
    }

    fn render(&self, report: &Report) -> Result<Artifact> {
        let yaml = serde_yaml::to_string(&report.document()).map_err(|e| Error::Render {
            artifact: REPORT_FILE.to_string(),
            context: e.to_string(),
        })?;
        Ok(Artifact {
            file_name: REPORT_FILE.to_string(),
            bytes: yaml.into_bytes(),
        })
    }
}

pub fn default_sinks() -> Vec<Box<dyn ReportSink>> {
    vec![Box::new(YamlReportWriter), Box::new(SvgPlotRenderer::default())]
}

/// Render every sink, then write the results into the report's output
/// directory. Nothing is written unless all sinks rendered successfully.
pub fn write_artifacts(report: &Report, sinks: &[Box<dyn ReportSink>]) -> Result<Vec<PathBuf>> {
    let artifacts = sinks
        .iter()
        .map(|sink| {
            debug!("rendering {}", sink.name());
            sink.render(report)
        })
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(&report.output_dir).map_err(|source| Error::Io {
        path: report.output_dir.clone(),
        source,
    })?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = report.output_dir.join(&artifact.file_name);
        fs::write(&path, &artifact.bytes).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportDocument;
    use crate::report::tests::sample_report;

    struct FailingSink;

    impl ReportSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn render(&self, _report: &Report) -> Result<Artifact> {
            Err(Error::Render {
                artifact: "broken.bin".to_string(),
                context: "refusing to render".to_string(),
            })
        }
    }

    #[test]
    fn test_yaml_writer_renders_document() {
        let report = sample_report();
        let artifact = YamlReportWriter.render(&report).unwrap();
        assert_eq!(artifact.file_name, "report.yaml");

        let text = String::from_utf8(artifact.bytes).unwrap();
        let parsed: ReportDocument = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed, report.document());
    }

    #[test]
    fn test_write_artifacts_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = sample_report();
        report.output_dir = dir.path().join("7-smoke");

        let written = write_artifacts(&report, &default_sinks()).unwrap();
        assert_eq!(
            written,
            vec![
                report.output_dir.join("report.yaml"),
                report.output_dir.join("plots.svg")
            ]
        );
        for path in written {
            assert!(path.is_file(), "{} missing", path.display());
        }
    }

    #[test]
    fn test_failed_sink_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = sample_report();
        report.output_dir = dir.path().join("out");

        let sinks: Vec<Box<dyn ReportSink>> =
            vec![Box::new(YamlReportWriter), Box::new(FailingSink)];
        assert!(matches!(
            write_artifacts(&report, &sinks),
            Err(Error::Render { .. })
        ));
        assert!(!report.output_dir.join("report.yaml").exists());
    }

    #[test]
    fn test_sink_names() {
        let names: Vec<String> = default_sinks().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["yaml report", "svg plots"]);
    }
}
