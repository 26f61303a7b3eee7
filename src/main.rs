use clap::Parser;
use miette::Result;
use tcf::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    // Logs go to stderr so exports on stdout stay clean
    let default_level = match cli.global.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_env("TCF_LOG")
                .unwrap_or_else(|_| EnvFilter::new(format!("tcf={}", default_level))),
        )
        .init();

    let global = &cli.global;
    match cli.command {
        Commands::Case(cmd) => tcf::cli::commands::case::run(cmd, global),
        Commands::Step(cmd) => tcf::cli::commands::step::run(cmd, global),
        Commands::Branch(cmd) => tcf::cli::commands::branch::run(cmd, global),
        Commands::Export(args) => tcf::cli::commands::export::run(args, global),
        Commands::Graph(args) => tcf::cli::commands::graph::run(args, global),
        Commands::Completions(args) => tcf::cli::commands::completions::run(args),
    }
}
