//! Diagram image export through an external renderer
//!
//! The graph DSL is handed to a command-line renderer (mermaid-cli by
//! default). The toolkit never inspects the produced image.

use clap::ValueEnum;
use std::fs;
use std::io::ErrorKind;
use std::process::Command;
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;

use crate::entities::TestCase;
use crate::export::{build_graph, graph_file_name, Artifact};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Diagram renderer '{0}' not found; install mermaid-cli or set TCF_RENDERER")]
    RendererUnavailable(String),

    #[error("Diagram renderer '{command}' failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("Diagram renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Image formats the renderer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Turns a graph description into image bytes
pub trait DiagramRenderer {
    fn render(&self, dsl: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError>;
}

/// Renderer that shells out to mermaid-cli (`mmdc -i in.mmd -o out.<ext>`)
#[derive(Debug, Clone)]
pub struct MermaidCli {
    command: String,
}

impl MermaidCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl DiagramRenderer for MermaidCli {
    fn render(&self, dsl: &str, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        let dir = TempDir::new()?;
        let input = dir.path().join("flow.mmd");
        let output = dir.path().join(format!("flow.{}", format.extension()));
        fs::write(&input, dsl)?;

        debug!("running {} for {}", self.command, output.display());
        let result = Command::new(&self.command)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RenderError::RendererUnavailable(self.command.clone()),
                _ => RenderError::Io(e),
            })?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                command: self.command.clone(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(fs::read(&output)?)
    }
}

/// Render the flow diagram of one case to an image artifact
pub fn graph_image(
    case: &TestCase,
    renderer: &dyn DiagramRenderer,
    format: ImageFormat,
) -> Result<Artifact, RenderError> {
    let bytes = renderer.render(&build_graph(case).to_mermaid(), format)?;
    Ok(Artifact {
        file_name: graph_file_name(case, format.extension()),
        bytes,
    })
}
