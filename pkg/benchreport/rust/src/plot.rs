// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Resource utilization plots as a single SVG image.
//!
//! Six panels on a 2x3 grid:
//!
//! | | col 0 | col 1 | col 2 |
//! |---|---|---|---|
//! | row 0 | CPU per core | disk read | memory used |
//! | row 1 | CPU average | disk write | (empty) |
//!
//! The time axis is in milliseconds since the recording started.

use std::fmt::Display;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::errors::{Error, Result};
use crate::report::Report;
use crate::sink::{Artifact, ReportSink};

pub const PLOT_FILE: &str = "plots.svg";

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const HEADER_HEIGHT: f64 = 50.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgPlotRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgPlotRenderer {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 600,
        }
    }
}

struct Line {
    points: Vec<(f64, f64)>,
}

struct Panel {
    row: u32,
    col: u32,
    title: &'static str,
    lines: Vec<Line>,
}

/// A rectangle in SVG user units.
#[derive(Debug, Clone, Copy)]
struct Area {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc: Option<Range>, v| match acc {
            None => Some(Range { min: v, max: v }),
            Some(r) => Some(Range {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    /// Flat ranges are widened so that scaling never divides by zero.
    fn widened(self) -> Self {
        if self.max > self.min {
            self
        } else {
            Range {
                min: self.min - 1.0,
                max: self.max + 1.0,
            }
        }
    }

    fn fraction(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }
}

fn render_error(e: impl Display) -> Error {
    Error::Render {
        artifact: PLOT_FILE.to_string(),
        context: e.to_string(),
    }
}

struct Svg {
    writer: Writer<Vec<u8>>,
}

impl Svg {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(render_error)
    }

    fn element<'a>(name: &'a str, attrs: &[(&str, String)]) -> BytesStart<'a> {
        let mut start = BytesStart::new(name);
        for (key, value) in attrs {
            start.push_attribute((*key, value.as_str()));
        }
        start
    }

    fn open(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        self.emit(Event::Start(Self::element(name, attrs)))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        self.emit(Event::Empty(Self::element(name, attrs)))
    }

    fn text(&mut self, attrs: &[(&str, String)], content: &str) -> Result<()> {
        self.open("text", attrs)?;
        self.emit(Event::Text(BytesText::new(content)))?;
        self.close("text")
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

impl SvgPlotRenderer {
    fn panels(report: &Report) -> Vec<Panel> {
        let resources = &report.resources;
        let series = |timestamps: &[i64], values: &[f64]| Line {
            points: timestamps
                .iter()
                .zip(values)
                .map(|(&t, &v)| (report.relative_ms(t), v))
                .collect(),
        };

        vec![
            Panel {
                row: 0,
                col: 0,
                title: "CPU utilization per core [%]",
                lines: resources
                    .cpu
                    .per_core()
                    .iter()
                    .map(|core| series(resources.cpu.timestamps(), core))
                    .collect(),
            },
            Panel {
                row: 1,
                col: 0,
                title: "CPU utilization average [%]",
                lines: vec![series(resources.cpu.timestamps(), resources.cpu.average())],
            },
            Panel {
                row: 0,
                col: 1,
                title: "Disk read [MB/s]",
                lines: vec![series(resources.disk.timestamps(), resources.disk.read())],
            },
            Panel {
                row: 1,
                col: 1,
                title: "Disk write [MB/s]",
                lines: vec![series(resources.disk.timestamps(), resources.disk.write())],
            },
            Panel {
                row: 0,
                col: 2,
                title: "Memory used [MB]",
                lines: vec![series(resources.memory.timestamps(), resources.memory.used())],
            },
            Panel {
                row: 1,
                col: 2,
                title: "",
                lines: Vec::new(),
            },
        ]
    }

    fn cell(&self, row: u32, col: u32) -> Area {
        let width = f64::from(self.width) / 3.0;
        let height = (f64::from(self.height) - HEADER_HEIGHT) / 2.0;
        Area {
            x: f64::from(col) * width,
            y: HEADER_HEIGHT + f64::from(row) * height,
            width,
            height,
        }
    }

    fn draw_panel(&self, svg: &mut Svg, panel: &Panel) -> Result<()> {
        let cell = self.cell(panel.row, panel.col);
        let plot = Area {
            x: cell.x + MARGIN_LEFT,
            y: cell.y + MARGIN_TOP,
            width: (cell.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (cell.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        };

        svg.open("g", &[("class", "panel".to_string())])?;
        svg.empty(
            "rect",
            &[
                ("x", fmt_coord(plot.x)),
                ("y", fmt_coord(plot.y)),
                ("width", fmt_coord(plot.width)),
                ("height", fmt_coord(plot.height)),
                ("fill", "none".to_string()),
                ("stroke", "#333333".to_string()),
            ],
        )?;
        if !panel.title.is_empty() {
            svg.text(
                &[
                    ("x", fmt_coord(plot.x + plot.width / 2.0)),
                    ("y", fmt_coord(plot.y - 10.0)),
                    ("text-anchor", "middle".to_string()),
                    ("font-size", "14".to_string()),
                ],
                panel.title,
            )?;
        }

        let xs = Range::of(panel.lines.iter().flat_map(|l| l.points.iter().map(|p| p.0)));
        let ys = Range::of(panel.lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)));
        if let (Some(xs), Some(ys)) = (xs, ys) {
            let (xs, ys) = (xs.widened(), ys.widened());
            self.draw_ticks(svg, plot, xs, ys)?;
            for (line, color) in panel.lines.iter().zip(PALETTE.iter().cycle()) {
                let points = line
                    .points
                    .iter()
                    .map(|&(x, y)| {
                        format!(
                            "{},{}",
                            fmt_coord(plot.x + xs.fraction(x) * plot.width),
                            fmt_coord(plot.y + plot.height - ys.fraction(y) * plot.height)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                svg.empty(
                    "polyline",
                    &[
                        ("points", points),
                        ("fill", "none".to_string()),
                        ("stroke", (*color).to_string()),
                        ("stroke-width", "1.5".to_string()),
                    ],
                )?;
            }
        }
        svg.close("g")
    }

    /// Min/max labels on both axes.
    fn draw_ticks(&self, svg: &mut Svg, plot: Area, xs: Range, ys: Range) -> Result<()> {
        let small = ("font-size", "11".to_string());
        let bottom = plot.y + plot.height;
        svg.text(
            &[
                ("x", fmt_coord(plot.x)),
                ("y", fmt_coord(bottom + 15.0)),
                ("text-anchor", "start".to_string()),
                small.clone(),
            ],
            &fmt_value(xs.min),
        )?;
        svg.text(
            &[
                ("x", fmt_coord(plot.x + plot.width)),
                ("y", fmt_coord(bottom + 15.0)),
                ("text-anchor", "end".to_string()),
                small.clone(),
            ],
            &fmt_value(xs.max),
        )?;
        svg.text(
            &[
                ("x", fmt_coord(plot.x - 5.0)),
                ("y", fmt_coord(bottom)),
                ("text-anchor", "end".to_string()),
                small.clone(),
            ],
            &fmt_value(ys.min),
        )?;
        svg.text(
            &[
                ("x", fmt_coord(plot.x - 5.0)),
                ("y", fmt_coord(plot.y + 10.0)),
                ("text-anchor", "end".to_string()),
                small,
            ],
            &fmt_value(ys.max),
        )
    }
}

fn fmt_coord(v: f64) -> String {
    format!("{v:.2}")
}

fn fmt_value(v: f64) -> String {
    if v.abs() >= 1000.0 || v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

impl ReportSink for SvgPlotRenderer {
    fn name(&self) -> &str {
        "svg plots"
    }

    fn render(&self, report: &Report) -> Result<Artifact> {
        let mut svg = Svg::new();
        svg.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        svg.open(
            "svg",
            &[
                ("xmlns", "http://www.w3.org/2000/svg".to_string()),
                ("width", self.width.to_string()),
                ("height", self.height.to_string()),
                ("viewBox", format!("0 0 {} {}", self.width, self.height)),
                ("font-family", "sans-serif".to_string()),
            ],
        )?;
        svg.empty(
            "rect",
            &[
                ("width", "100%".to_string()),
                ("height", "100%".to_string()),
                ("fill", "white".to_string()),
            ],
        )?;
        svg.text(
            &[
                ("x", fmt_coord(f64::from(self.width) / 2.0)),
                ("y", "32".to_string()),
                ("text-anchor", "middle".to_string()),
                ("font-size", "20".to_string()),
            ],
            &report.title,
        )?;
        for panel in Self::panels(report) {
            self.draw_panel(&mut svg, &panel)?;
        }
        svg.close("svg")?;

        Ok(Artifact {
            file_name: PLOT_FILE.to_string(),
            bytes: svg.finish(),
        })
    }
}
