//! Exporters - pure renderings of the case collection
//!
//! Every export kind reads the collection and produces bytes plus the fixed
//! file name the artifact is saved under. Exporters share no state.

pub mod graph;
pub mod outline;
pub mod render;
pub mod report;
pub mod table;

use clap::ValueEnum;
use thiserror::Error;
use tracing::debug;

use crate::entities::TestCase;

pub use graph::{build_graph, EdgeKind, FlowEdge, FlowGraph, FlowNode};
pub use outline::{build_outline, Topic};
pub use render::{DiagramRenderer, ImageFormat, MermaidCli, RenderError};
pub use report::{ReportOptions, ReportRenderer, UNKNOWN_STEP};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export buffer error: {0}")]
    Buffer(String),

    #[error("Outline export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Embedded template not found: {0}")]
    MissingTemplate(String),
}

/// The artifact kinds the toolkit produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Spreadsheet (CSV), one row per case
    Table,
    /// Mind-map topic tree (JSON)
    Outline,
    /// Self-contained HTML report
    Report,
    /// Flow diagram description (Mermaid), one per case
    Graph,
}

impl std::fmt::Display for ExportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportKind::Table => write!(f, "table"),
            ExportKind::Outline => write!(f, "outline"),
            ExportKind::Report => write!(f, "report"),
            ExportKind::Graph => write!(f, "graph"),
        }
    }
}

/// One exported file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File name of a per-case flow diagram
pub fn graph_file_name(case: &TestCase, extension: &str) -> String {
    format!("{}_flow.{}", case.id, extension)
}

impl ExportKind {
    /// Fixed file name of collection-level exports
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            ExportKind::Table => Some("test_cases.csv"),
            ExportKind::Outline => Some("test_cases_outline.json"),
            ExportKind::Report => Some("test_cases_report.html"),
            ExportKind::Graph => None,
        }
    }

    /// Produce the artifacts of this kind for `cases`
    ///
    /// Graph exports yield one artifact per case; the others yield exactly
    /// one artifact for the whole collection.
    pub fn export(&self, cases: &[TestCase]) -> Result<Vec<Artifact>, ExportError> {
        debug!("exporting {} case(s) as {}", cases.len(), self);
        let single = |bytes: Vec<u8>| {
            vec![Artifact {
                file_name: self.file_name().unwrap_or_default().to_string(),
                bytes,
            }]
        };

        Ok(match self {
            ExportKind::Table => single(table::export_csv(cases)?),
            ExportKind::Outline => single(outline::export_outline(cases)?),
            ExportKind::Report => single(report::export_report(cases, &ReportOptions::default())?),
            ExportKind::Graph => cases
                .iter()
                .map(|case| Artifact {
                    file_name: graph_file_name(case, "mmd"),
                    bytes: build_graph(case).to_mermaid().into_bytes(),
                })
                .collect(),
        })
    }
}
