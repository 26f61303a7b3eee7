//! `tcf branch` command - Conditional jumps between steps

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{find_case, open_store, to_index};
use crate::cli::GlobalOpts;
use crate::core::{CaseDraft, Config};
use crate::entities::Branch;

#[derive(Subcommand, Debug)]
pub enum BranchCommands {
    /// Add a branch from one step to another
    Add(AddArgs),

    /// Remove a branch from a step
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Test case ID (TC-1 or 1)
    pub case: String,

    /// Step number the branch leaves from
    pub step: usize,

    /// Condition under which the branch is taken
    #[arg(long, short = 'c')]
    pub condition: String,

    /// Step number the branch jumps to
    #[arg(long, short = 'n', value_name = "STEP")]
    pub next: usize,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Test case ID (TC-1 or 1)
    pub case: String,

    /// Step number
    pub step: usize,

    /// Branch number within the step
    pub branch: usize,
}

pub fn run(cmd: BranchCommands, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut store = open_store(global, &config);

    match cmd {
        BranchCommands::Add(args) => {
            let mut draft = CaseDraft::from_case(find_case(&store, &args.case)?);
            let branch = Branch::new(args.condition, to_index(args.next, "Step")?);
            draft
                .add_branch(to_index(args.step, "Step")?, branch)
                .map_err(|e| miette::miette!("{}", e))?;
            let case = draft.commit(&mut store).map_err(|e| miette::miette!("{}", e))?;

            println!(
                "{} Added branch Step {} -> Step {} in {}",
                style("✓").green(),
                args.step,
                args.next,
                style(case.id).cyan()
            );
        }
        BranchCommands::Rm(args) => {
            let mut draft = CaseDraft::from_case(find_case(&store, &args.case)?);
            let removed = draft
                .remove_branch(
                    to_index(args.step, "Step")?,
                    to_index(args.branch, "Branch")?,
                )
                .map_err(|e| miette::miette!("{}", e))?;
            let case = draft.commit(&mut store).map_err(|e| miette::miette!("{}", e))?;

            println!(
                "{} Removed branch '{}' from step {} in {}",
                style("✓").green(),
                removed.condition,
                args.step,
                style(case.id).cyan()
            );
        }
    }

    Ok(())
}
