//! `tcf export` command - Write exported artifacts

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::cli::helpers::{find_case, open_store};
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::entities::TestCase;
use crate::export::{
    render::graph_image, Artifact, DiagramRenderer, ExportKind, ImageFormat, MermaidCli,
};

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// What to export
    pub kind: ExportKind,

    /// Only export these test cases (repeatable)
    #[arg(long = "case", short = 'c', value_name = "ID")]
    pub cases: Vec<String>,

    /// Directory to write into (default: TCF_OUTPUT_DIR, config, or current dir)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write to stdout instead of files
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Render graph exports to images with the external renderer
    #[arg(long, value_name = "FORMAT", conflicts_with = "stdout")]
    pub image: Option<ImageFormat>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config);

    let selected: Vec<TestCase> = if args.cases.is_empty() {
        store.cases().to_vec()
    } else {
        args.cases
            .iter()
            .map(|id| find_case(&store, id).cloned())
            .collect::<Result<_>>()?
    };

    let artifacts = match (args.kind, args.image) {
        (ExportKind::Graph, Some(format)) => {
            let renderer = MermaidCli::new(config.renderer());
            render_images(&selected, &renderer, format)?
        }
        (_, Some(_)) => return Err(miette::miette!("--image only applies to graph exports")),
        (kind, None) => kind
            .export(&selected)
            .map_err(|e| miette::miette!("{}", e))?,
    };

    if args.stdout {
        let mut out = std::io::stdout().lock();
        for artifact in &artifacts {
            out.write_all(&artifact.bytes).into_diagnostic()?;
        }
        return Ok(());
    }

    if artifacts.is_empty() {
        println!("{} No test cases to export", style("!").yellow());
        return Ok(());
    }

    let dir = args.output.unwrap_or_else(|| config.output_dir());
    fs::create_dir_all(&dir).into_diagnostic()?;
    for artifact in &artifacts {
        let path = dir.join(&artifact.file_name);
        fs::write(&path, &artifact.bytes).into_diagnostic()?;
        println!(
            "{} Wrote {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let dangling: usize = selected.iter().map(TestCase::dangling_references).sum();
    if dangling > 0 {
        eprintln!(
            "{} {} reference(s) point at steps that do not exist",
            style("!").yellow(),
            dangling
        );
    }

    Ok(())
}

fn render_images(
    cases: &[TestCase],
    renderer: &dyn DiagramRenderer,
    format: ImageFormat,
) -> Result<Vec<Artifact>> {
    cases
        .iter()
        .map(|case| graph_image(case, renderer, format).map_err(|e| miette::miette!("{}", e)))
        .collect()
}

