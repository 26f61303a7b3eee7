//! `tcf graph` command - Print the flow graph of a test case

use miette::Result;

use crate::cli::helpers::{find_case, open_store};
use crate::cli::output::serialized;
use crate::cli::GlobalOpts;
use crate::core::Config;
use crate::export::build_graph;

#[derive(clap::Args, Debug)]
pub struct GraphArgs {
    /// Test case ID (TC-1 or 1)
    pub id: String,
}

/// Prints the Mermaid description, or the graph structure with `--format json|yaml`
pub fn run(args: GraphArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let store = open_store(global, &config);
    let graph = build_graph(find_case(&store, &args.id)?);

    match serialized(&graph, global.format)? {
        Some(text) => print!("{}", text),
        None => print!("{}", graph.to_mermaid()),
    }
    Ok(())
}
